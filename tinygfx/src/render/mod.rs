/// Line, circle, triangle and rounded-rectangle decomposition
pub mod shapes;

/// Blitting caller-owned pixel arrays in the supported encodings
pub mod bitmap;

/// Everything involving glyph rasterization and the text cursor lives here.
pub mod text;

use crate::device::Device;
use crate::graphics::{Charset, Color565, GfxFont, TextStyle, Wrapping};
use crate::layout::{Coord, Position, Rotation, Surface};

pub use bitmap::Drawable;
pub use text::InkExtent;

/// The drawing context: a device plus the logical surface and text state that
/// go with it.
///
/// Methods come in two layers. The `write_*` transaction API clips and
/// forwards to the device but leaves batching to the caller; the `draw_*` /
/// `fill_*` API brackets every call in its own batch.
///
/// Not reentrant and not synchronized; callers sharing one across threads
/// must serialize access themselves.
pub struct Gfx<'f, D: Device> {
    device: D,
    surface: Surface,
    cursor: Position,
    style: TextStyle,
    font: Option<GfxFont<'f>>,
    batch_depth: u32,
}

impl<'f, D: Device> Gfx<'f, D> {
    pub fn new(device: D) -> Self {
        let surface = Surface::new(device.physical_size());
        Self {
            device,
            surface,
            cursor: Position::default(),
            style: TextStyle::default(),
            font: None,
            batch_depth: 0,
        }
    }

    pub fn begin(&mut self, speed: Option<u32>) -> Result<(), D::Error> {
        log::debug!(
            "initializing {}x{} device (speed hint {speed:?})",
            self.surface.physical_size().width,
            self.surface.physical_size().height
        );
        self.device.begin(speed)
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Width accounting for the current rotation
    pub fn width(&self) -> Coord {
        self.surface.width()
    }

    /// Height accounting for the current rotation
    pub fn height(&self) -> Coord {
        self.surface.height()
    }

    pub fn rotation(&self) -> Rotation {
        self.surface.rotation()
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        if self.batch_depth > 0 {
            log::warn!(
                "rotation changed to {rotation:?} inside an open write batch (depth {})",
                self.batch_depth
            );
        }
        self.surface.set_rotation(rotation);
        self.device.set_rotation(rotation);
        log::debug!(
            "rotation {rotation:?}: logical surface {}x{}",
            self.surface.width(),
            self.surface.height()
        );
    }

    pub fn invert_display(&mut self, invert: bool) {
        log::debug!("display inversion {invert}");
        self.device.invert_display(invert);
    }

    /// Opens a batch. Brackets nest; only the outermost one reaches the device.
    pub fn start_write(&mut self) {
        if self.batch_depth == 0 {
            self.device.start_write();
        }
        self.batch_depth += 1;
    }

    pub fn end_write(&mut self) {
        match self.batch_depth {
            0 => log::warn!("end_write without a matching start_write"),
            1 => {
                self.batch_depth = 0;
                self.device.end_write();
            }
            _ => self.batch_depth -= 1,
        }
    }

    /// Asks the device to commit anything it has buffered
    pub fn flush(&mut self) -> Result<(), D::Error> {
        self.device.flush()
    }

    /// Runs `body` inside one batch bracket
    fn batch(&mut self, body: impl FnOnce(&mut Self)) {
        self.start_write();
        body(self);
        self.end_write();
    }

    /// `true` when the inclusive box `left..=right` × `top..=bottom` lies
    /// entirely off the surface.
    fn misses(&self, left: i64, top: i64, right: i64, bottom: i64) -> bool {
        right < 0
            || bottom < 0
            || left >= i64::from(self.width())
            || top >= i64::from(self.height())
    }

    /// Clipped plot in wide coordinates. Shape code computes offsets from
    /// caller coordinates in `i64`, where sums can't overflow, and only
    /// narrows back once a position is known to be on the surface.
    fn plot(&mut self, x: i64, y: i64, color: Color565) {
        if let (Ok(x), Ok(y)) = (Coord::try_from(x), Coord::try_from(y)) {
            self.write_pixel(x, y, color);
        }
    }

    /// Clipped horizontal run over the inclusive columns `left..=right`
    fn write_hspan(&mut self, left: i64, right: i64, y: i64, color: Color565) {
        if self.misses(left, y, right, y) || left > right {
            return;
        }
        let x0 = left.max(0) as Coord;
        let x1 = right.min(i64::from(self.width()) - 1) as Coord;
        self.device
            .write_fast_hline_preclipped(x0, y as Coord, x1 - x0 + 1, color);
    }

    /// Clipped vertical run over the inclusive rows `top..=bottom`
    fn write_vspan(&mut self, x: i64, top: i64, bottom: i64, color: Color565) {
        if self.misses(x, top, x, bottom) || top > bottom {
            return;
        }
        let y0 = top.max(0) as Coord;
        let y1 = bottom.min(i64::from(self.height()) - 1) as Coord;
        self.device
            .write_fast_vline_preclipped(x as Coord, y0, y1 - y0 + 1, color);
    }

    /// Clipped fill of the inclusive box `left..=right` × `top..=bottom`
    fn write_box(&mut self, left: i64, top: i64, right: i64, bottom: i64, color: Color565) {
        if self.misses(left, top, right, bottom) || left > right || top > bottom {
            return;
        }
        let x0 = left.max(0) as Coord;
        let y0 = top.max(0) as Coord;
        let x1 = right.min(i64::from(self.width()) - 1) as Coord;
        let y1 = bottom.min(i64::from(self.height()) - 1) as Coord;
        self.device
            .write_fill_rect_preclipped(x0, y0, x1 - x0 + 1, y1 - y0 + 1, color);
    }

    pub fn write_pixel(&mut self, x: Coord, y: Coord, color: Color565) {
        if self.surface.contains(x, y) {
            self.device.write_pixel_preclipped(x, y, color);
        }
    }

    pub fn write_fast_hline(&mut self, x: Coord, y: Coord, w: Coord, color: Color565) {
        let left = i64::from(x);
        self.write_hspan(left, left + i64::from(w) - 1, i64::from(y), color);
    }

    pub fn write_fast_vline(&mut self, x: Coord, y: Coord, h: Coord, color: Color565) {
        let top = i64::from(y);
        self.write_vspan(i64::from(x), top, top + i64::from(h) - 1, color);
    }

    pub fn write_fill_rect(&mut self, x: Coord, y: Coord, w: Coord, h: Coord, color: Color565) {
        let (left, top) = (i64::from(x), i64::from(y));
        self.write_box(
            left,
            top,
            left + i64::from(w) - 1,
            top + i64::from(h) - 1,
            color,
        );
    }

    /// Axis-aligned lines go out as fast lines; anything else through Bresenham.
    pub fn write_line(&mut self, x0: Coord, y0: Coord, x1: Coord, y1: Coord, color: Color565) {
        if x0 == x1 {
            let (top, bottom) = (y0.min(y1), y0.max(y1));
            self.write_vspan(i64::from(x0), i64::from(top), i64::from(bottom), color);
        } else if y0 == y1 {
            let (left, right) = (x0.min(x1), x0.max(x1));
            self.write_hspan(i64::from(left), i64::from(right), i64::from(y0), color);
        } else if self.surface.contains(x0, y0) && self.surface.contains(x1, y1) {
            self.device.write_line_preclipped(x0, y0, x1, y1, color);
        } else {
            self.write_slash_line(x0, y0, x1, y1, color);
        }
    }

    pub fn draw_pixel(&mut self, x: Coord, y: Coord, color: Color565) {
        self.batch(|gfx| gfx.write_pixel(x, y, color));
    }

    pub fn draw_fast_hline(&mut self, x: Coord, y: Coord, w: Coord, color: Color565) {
        self.batch(|gfx| gfx.write_fast_hline(x, y, w, color));
    }

    pub fn draw_fast_vline(&mut self, x: Coord, y: Coord, h: Coord, color: Color565) {
        self.batch(|gfx| gfx.write_fast_vline(x, y, h, color));
    }

    pub fn fill_rect(&mut self, x: Coord, y: Coord, w: Coord, h: Coord, color: Color565) {
        self.batch(|gfx| gfx.write_fill_rect(x, y, w, h, color));
    }

    pub fn fill_screen(&mut self, color: Color565) {
        let (w, h) = (self.width(), self.height());
        self.fill_rect(0, 0, w, h, color);
    }

    pub fn draw_line(&mut self, x0: Coord, y0: Coord, x1: Coord, y1: Coord, color: Color565) {
        self.batch(|gfx| gfx.write_line(x0, y0, x1, y1, color));
    }

    /// Outline only; each perimeter pixel is written once.
    pub fn draw_rect(&mut self, x: Coord, y: Coord, w: Coord, h: Coord, color: Color565) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (left, top) = (i64::from(x), i64::from(y));
        let (right, bottom) = (left + i64::from(w) - 1, top + i64::from(h) - 1);
        self.batch(|gfx| {
            gfx.write_hspan(left, right, top, color);
            if h > 1 {
                gfx.write_hspan(left, right, bottom, color);
            }
            gfx.write_vspan(left, top + 1, bottom - 1, color);
            if w > 1 {
                gfx.write_vspan(right, top + 1, bottom - 1, color);
            }
        });
    }

    pub fn set_cursor(&mut self, x: Coord, y: Coord) {
        self.cursor = Position::new(x, y);
    }

    pub fn cursor_x(&self) -> Coord {
        self.cursor.x
    }

    pub fn cursor_y(&self) -> Coord {
        self.cursor.y
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.style
    }

    pub fn set_text_style(&mut self, style: TextStyle) {
        self.style = TextStyle {
            size_x: style.size_x.max(1),
            size_y: style.size_y.max(1),
            ..style
        };
    }

    /// Foreground only; the background is transparent
    pub fn set_text_color(&mut self, color: Color565) {
        self.style.color = color;
        self.style.background = color;
    }

    pub fn set_text_color_bg(&mut self, color: Color565, background: Color565) {
        self.style.color = color;
        self.style.background = background;
    }

    pub fn set_text_size(&mut self, size: u8) {
        self.set_text_size_xy(size, size);
    }

    pub fn set_text_size_xy(&mut self, size_x: u8, size_y: u8) {
        self.style.size_x = size_x.max(1);
        self.style.size_y = size_y.max(1);
    }

    pub fn set_text_wrap(&mut self, wrap: bool) {
        self.style.wrapping = match wrap {
            true => Wrapping::Character,
            false => Wrapping::Clip,
        };
    }

    /// Switches the built-in font between the corrected Code Page 437 mapping
    /// (`true`) and the historical off-by-one mapping (`false`, the default).
    pub fn cp437(&mut self, enable: bool) {
        self.style.charset = match enable {
            true => Charset::Cp437,
            false => Charset::Classic,
        };
    }

    /// `None` selects the built-in 5×7 font.
    pub fn set_font(&mut self, font: Option<GfxFont<'f>>) {
        match font {
            Some(f) => log::debug!("custom font {}..={} selected", f.first, f.last),
            None => log::debug!("built-in font selected"),
        }
        self.font = font;
    }

    pub fn font(&self) -> Option<GfxFont<'f>> {
        self.font
    }
}
