use std::fmt;

use super::Gfx;
use crate::device::Device;
use crate::graphics::glcdfont::{self, CELL_HEIGHT, CELL_WIDTH, CLASSIC_SHIFT_START};
use crate::graphics::{Charset, Color565, Wrapping};
use crate::layout::{Coord, Position, Rect};

/// Running ink bounds of a character stream, inclusive on every side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InkExtent {
    pub min_x: Coord,
    pub min_y: Coord,
    pub max_x: Coord,
    pub max_y: Coord,
}
impl InkExtent {
    /// Contains nothing; the first `include` defines it
    pub const fn empty() -> Self {
        Self {
            min_x: Coord::MAX,
            min_y: Coord::MAX,
            max_x: Coord::MIN,
            max_y: Coord::MIN,
        }
    }

    fn spanning(x0: Coord, y0: Coord, x1: Coord, y1: Coord) -> Self {
        Self {
            min_x: x0,
            min_y: y0,
            max_x: x1,
            max_y: y1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    pub fn include(&mut self, other: InkExtent) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// An empty extent becomes a zero-sized rect at `origin`
    pub fn to_rect(&self, origin: Position) -> Rect {
        match self.is_empty() {
            true => Rect::new(origin.x, origin.y, 0, 0),
            false => Rect::new(
                self.min_x,
                self.min_y,
                self.max_x.saturating_sub(self.min_x).saturating_add(1),
                self.max_y.saturating_sub(self.min_y).saturating_add(1),
            ),
        }
    }
}
impl Default for InkExtent {
    fn default() -> Self {
        Self::empty()
    }
}

/// Glyph index in the built-in table for character code `c`
fn builtin_index(c: u8, charset: Charset) -> u8 {
    match charset {
        Charset::Classic if c >= CLASSIC_SHIFT_START => c.wrapping_add(1),
        _ => c,
    }
}

impl<'f, D: Device> Gfx<'f, D> {
    /// Line height at the current font and magnification
    fn line_height(&self) -> Coord {
        let unscaled = match self.font {
            Some(font) => font.y_advance as Coord,
            None => CELL_HEIGHT,
        };
        unscaled * self.style.size_y as Coord
    }

    /// Moves `cursor` to the start of the next line if something reaching
    /// `reach` pixels right of it would cross the right edge.
    fn wrap_before(&self, cursor: &mut Position, reach: Coord) {
        if self.style.wrapping == Wrapping::Character
            && cursor.x.saturating_add(reach) > self.width()
        {
            cursor.x = 0;
            cursor.y = cursor.y.saturating_add(self.line_height());
        }
    }

    /// Applies one byte of the character stream to `cursor`.
    ///
    /// Returns where the glyph is drawn and its ink extent, or `None` for
    /// control bytes, glyph misses and glyphs with no bitmap. Both drawing
    /// and measuring go through here.
    fn advance(&self, c: u8, cursor: &mut Position) -> Option<(Position, InkExtent)> {
        let (sx, sy) = (self.style.size_x as Coord, self.style.size_y as Coord);
        match c {
            b'\n' => {
                cursor.x = 0;
                cursor.y = cursor.y.saturating_add(self.line_height());
                return None;
            }
            b'\r' => return None,
            _ => {}
        }

        let Some(font) = self.font else {
            self.wrap_before(cursor, CELL_WIDTH * sx);
            let origin = *cursor;
            cursor.x = cursor.x.saturating_add(CELL_WIDTH * sx);
            let extent = InkExtent::spanning(
                origin.x,
                origin.y,
                origin.x.saturating_add(CELL_WIDTH * sx - 1),
                origin.y.saturating_add(CELL_HEIGHT * sy - 1),
            );
            return Some((origin, extent));
        };

        let Some(glyph) = font.glyph(c) else {
            log::trace!("no glyph for {c:#04x} in {}..={}", font.first, font.last);
            return None;
        };
        let mut placed = None;
        if glyph.has_bitmap() {
            let (xo, yo) = (glyph.x_offset as Coord, glyph.y_offset as Coord);
            let (w, h) = (glyph.width as Coord, glyph.height as Coord);
            self.wrap_before(cursor, (xo + w) * sx);
            let x1 = cursor.x.saturating_add(xo * sx);
            let y1 = cursor.y.saturating_add(yo * sy);
            let extent = InkExtent::spanning(
                x1,
                y1,
                x1.saturating_add(w * sx - 1),
                y1.saturating_add(h * sy - 1),
            );
            placed = Some((*cursor, extent));
        }
        cursor.x = cursor.x.saturating_add(glyph.x_advance as Coord * sx);
        placed
    }

    /// Draws one glyph with its cursor origin at `(x, y)`: the cell's top left
    /// for the built-in font, a point on the baseline for a custom font.
    ///
    /// `background` is only painted by the built-in font, and only when it
    /// differs from `color`.
    pub fn draw_char(
        &mut self,
        x: Coord,
        y: Coord,
        c: u8,
        color: Color565,
        background: Color565,
        size_x: u8,
        size_y: u8,
    ) {
        let (sx, sy) = (size_x.max(1) as Coord, size_y.max(1) as Coord);
        match self.font {
            None => self.draw_builtin_char(x, y, c, color, background, sx, sy),
            Some(font) => {
                let Some(glyph) = font.glyph(c) else {
                    log::trace!("no glyph for {c:#04x}; skipped");
                    return;
                };
                let (xo, yo) = (glyph.x_offset as Coord, glyph.y_offset as Coord);
                let w = glyph.width as usize;
                let left = i64::from(x) + i64::from(xo * sx);
                let top = i64::from(y) + i64::from(yo * sy);
                let right = left + i64::from(glyph.width as Coord * sx) - 1;
                let bottom = top + i64::from(glyph.height as Coord * sy) - 1;
                if w == 0 || self.misses(left, top, right, bottom) {
                    return;
                }
                self.batch(|gfx| {
                    for (i, set) in font.glyph_bits(glyph).enumerate() {
                        if !set {
                            continue;
                        }
                        let (xx, yy) = ((i % w) as Coord, (i / w) as Coord);
                        match (sx, sy) {
                            (1, 1) => gfx.write_pixel(x + xo + xx, y + yo + yy, color),
                            _ => gfx.write_fill_rect(
                                x + (xo + xx) * sx,
                                y + (yo + yy) * sy,
                                sx,
                                sy,
                                color,
                            ),
                        }
                    }
                });
            }
        }
    }

    fn draw_builtin_char(
        &mut self,
        x: Coord,
        y: Coord,
        c: u8,
        color: Color565,
        background: Color565,
        sx: Coord,
        sy: Coord,
    ) {
        if x >= self.width()
            || y >= self.height()
            || x + CELL_WIDTH * sx - 1 < 0
            || y + CELL_HEIGHT * sy - 1 < 0
        {
            return;
        }
        let columns = glcdfont::columns(builtin_index(c, self.style.charset));
        let opaque = background != color;

        self.batch(|gfx| {
            for (i, &column) in columns.iter().enumerate() {
                let i = i as Coord;
                for j in 0..CELL_HEIGHT {
                    let paint = match column & (1 << j) != 0 {
                        true => color,
                        false if opaque => background,
                        false => continue,
                    };
                    match (sx, sy) {
                        (1, 1) => gfx.write_pixel(x + i, y + j, paint),
                        _ => gfx.write_fill_rect(x + i * sx, y + j * sy, sx, sy, paint),
                    }
                }
            }
            // Spacing column
            if opaque {
                match (sx, sy) {
                    (1, 1) => gfx.write_fast_vline(x + 5, y, CELL_HEIGHT, background),
                    _ => gfx.write_fill_rect(x + 5 * sx, y, sx, CELL_HEIGHT * sy, background),
                }
            }
        });
    }

    /// Feeds one byte to the character stream at the cursor.
    pub fn write(&mut self, c: u8) {
        let mut cursor = self.cursor;
        let placed = self.advance(c, &mut cursor);
        self.cursor = cursor;
        if let Some((origin, _)) = placed {
            let style = self.style;
            self.draw_char(
                origin.x,
                origin.y,
                c,
                style.color,
                style.background,
                style.size_x,
                style.size_y,
            );
        }
    }

    /// Writes every byte of `text`. Multi-byte UTF-8 sequences are not
    /// decoded; each byte is looked up on its own.
    pub fn print(&mut self, text: &str) {
        self.batch(|gfx| text.bytes().for_each(|c| gfx.write(c)));
    }

    /// Advances `cursor` over `c` exactly as [`Gfx::write`] would and grows
    /// `extent` by the ink it would produce. Nothing is drawn.
    pub fn char_bounds(&self, c: u8, cursor: &mut Position, extent: &mut InkExtent) {
        if let Some((_, ink)) = self.advance(c, cursor) {
            extent.include(ink);
        }
    }

    /// The box `text` would cover if printed with the cursor at `(x, y)`
    /// under the current font, style and wrap setting.
    pub fn text_bounds(&self, text: &str, x: Coord, y: Coord) -> Rect {
        let origin = Position::new(x, y);
        let mut cursor = origin;
        let mut extent = InkExtent::empty();
        for c in text.bytes() {
            self.char_bounds(c, &mut cursor, &mut extent);
        }
        extent.to_rect(origin)
    }
}

impl<D: Device> fmt::Write for Gfx<'_, D> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.print(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use super::*;
    use crate::device::FrameBuffer;
    use crate::graphics::{GfxFont, GfxGlyph};
    use crate::layout::Size;
    use test_log::test;

    fn gfx(width: Coord, height: Coord) -> Gfx<'static, FrameBuffer> {
        Gfx::new(FrameBuffer::new(Size::new(width, height)))
    }

    const TINY_GLYPHS: [GfxGlyph; 2] = [
        // 'A': 2x2, bits 1 0 / 1 1, sitting on the baseline
        GfxGlyph {
            bitmap_offset: 0,
            width: 2,
            height: 2,
            x_advance: 3,
            x_offset: 0,
            y_offset: -2,
        },
        // 'B': blank, advance only
        GfxGlyph {
            bitmap_offset: 1,
            width: 0,
            height: 0,
            x_advance: 4,
            x_offset: 0,
            y_offset: 0,
        },
    ];

    fn tiny_font() -> GfxFont<'static> {
        GfxFont {
            bitmap: &[0b1011_0000],
            glyphs: &TINY_GLYPHS,
            first: b'A',
            last: b'B',
            y_advance: 4,
        }
    }

    #[test]
    fn newline_resets_column_and_carriage_return_is_ignored() {
        let mut gfx = gfx(40, 40);
        gfx.set_cursor(10, 2);
        gfx.print("\r\n");
        assert_eq!((gfx.cursor_x(), gfx.cursor_y()), (0, 10));

        gfx.set_text_size(2);
        gfx.write(b'\n');
        assert_eq!(gfx.cursor_y(), 26);
    }

    #[test]
    fn wrapping_breaks_before_the_glyph_that_would_cross_the_edge() {
        let mut gfx = gfx(20, 16);
        gfx.print("abcd");
        assert_eq!((gfx.cursor_x(), gfx.cursor_y()), (6, 8));

        let mut gfx = self::gfx(20, 16);
        gfx.set_text_wrap(false);
        gfx.print("abcd");
        assert_eq!((gfx.cursor_x(), gfx.cursor_y()), (24, 0));
    }

    #[test]
    fn classic_charset_is_shifted_from_176_up() {
        assert_eq!(builtin_index(175, Charset::Classic), 175);
        assert_eq!(builtin_index(176, Charset::Classic), 177);
        assert_eq!(builtin_index(255, Charset::Classic), 0);
        assert_eq!(builtin_index(176, Charset::Cp437), 176);

        let mut classic = gfx(6, 8);
        classic.set_text_color(Color565::WHITE);
        classic.write(176);
        let mut cp437 = gfx(6, 8);
        cp437.cp437(true);
        cp437.write(176);

        let classic = classic.into_device();
        let cp437 = cp437.into_device();
        // light shade starts on row 0, medium shade on row 1
        assert_eq!(cp437.pixel(0, 0), Some(Color565::WHITE));
        assert_eq!(classic.pixel(0, 0), Some(Color565::BLACK));
        assert_eq!(classic.pixel(0, 1), Some(Color565::WHITE));
    }

    #[test]
    fn opaque_builtin_glyph_paints_its_whole_cell() {
        let mut gfx = gfx(12, 16);
        gfx.fill_screen(Color565::RED);
        gfx.set_text_color_bg(Color565::WHITE, Color565::BLACK);
        gfx.set_text_size(2);
        gfx.write(b' ');
        let fb = gfx.into_device();
        for y in 0..16 {
            for x in 0..12 {
                assert_eq!(fb.pixel(x, y), Some(Color565::BLACK), "({x}, {y})");
            }
        }
    }

    #[test]
    fn custom_font_draws_relative_to_baseline_without_background() {
        let font_glyphs = tiny_font();
        let mut gfx = gfx(8, 8);
        gfx.set_font(Some(font_glyphs));
        gfx.set_text_color_bg(Color565::RED, Color565::BLUE);
        gfx.set_cursor(1, 3);
        gfx.write(b'A');
        assert_eq!(gfx.cursor_x(), 4);

        let fb = gfx.into_device();
        assert_eq!(fb.pixel(1, 1), Some(Color565::RED));
        assert_eq!(fb.pixel(2, 1), Some(Color565::BLACK));
        assert_eq!(fb.pixel(1, 2), Some(Color565::RED));
        assert_eq!(fb.pixel(2, 2), Some(Color565::RED));
        assert_eq!(fb.pixel(0, 0), Some(Color565::BLACK));
    }

    #[test]
    fn custom_font_misses_and_blank_glyphs() {
        let mut gfx = gfx(8, 8);
        gfx.set_font(Some(tiny_font()));
        gfx.set_cursor(6, 4);

        // out of range: nothing happens at all
        gfx.write(b'Z');
        assert_eq!((gfx.cursor_x(), gfx.cursor_y()), (6, 4));

        // blank glyph advances past the edge without wrapping
        gfx.write(b'B');
        assert_eq!((gfx.cursor_x(), gfx.cursor_y()), (10, 4));
        assert_eq!(gfx.text_bounds("B", 0, 0), Rect::new(0, 0, 0, 0));

        // inked glyph does wrap
        gfx.write(b'A');
        assert_eq!((gfx.cursor_x(), gfx.cursor_y()), (3, 8));
    }

    #[test]
    fn text_bounds_follow_the_same_layout_as_write() {
        let mut gfx = gfx(20, 40);
        gfx.set_text_size_xy(1, 2);
        let bounds = gfx.text_bounds("abcd", 0, 0);
        assert_eq!(bounds, Rect::new(0, 0, 18, 32));

        write!(gfx, "abcd").unwrap();
        assert_eq!((gfx.cursor_x(), gfx.cursor_y()), (6, 16));

        assert_eq!(gfx.text_bounds("", 5, 7), Rect::new(5, 7, 0, 0));
        assert_eq!(gfx.text_bounds("\n", 5, 7), Rect::new(5, 7, 0, 0));
    }

    #[test]
    fn glyphs_entirely_off_surface_are_rejected_early() {
        let mut gfx = gfx(8, 8);
        gfx.set_text_color_bg(Color565::WHITE, Color565::BLUE);
        gfx.draw_char(-6, 0, b'A', Color565::WHITE, Color565::BLUE, 1, 1);
        gfx.draw_char(0, 8, b'A', Color565::WHITE, Color565::BLUE, 1, 1);
        assert!(gfx.into_device().as_slice().iter().all(|&p| p == 0));
    }
}
