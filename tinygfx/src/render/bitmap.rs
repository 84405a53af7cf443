use super::Gfx;
use crate::device::Device;
use crate::graphics::{color565, Color565};
use crate::layout::{Coord, Position, Rect};

/// Anything that can be blitted onto a [`Gfx`] at a position.
pub trait Drawable {
    fn draw_at<D: Device>(&self, gfx: &mut Gfx<'_, D>, position: Position);
}

/// Bit order within each byte of a 1-bit source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BitOrder {
    /// Leftmost pixel in bit 7
    #[default]
    MsbFirst,
    /// Leftmost pixel in bit 0, as in XBM files
    LsbFirst,
}

/// A 1-bit plane with every row padded to a whole number of bytes.
/// Used both for two-color bitmaps and for transparency masks.
#[derive(Clone, Copy, Debug)]
pub struct BitPlane<'a> {
    pub data: &'a [u8],
    pub width: Coord,
    pub order: BitOrder,
}
impl<'a> BitPlane<'a> {
    pub fn new(data: &'a [u8], width: Coord) -> Self {
        Self {
            data,
            width,
            order: BitOrder::MsbFirst,
        }
    }

    fn stride(&self) -> usize {
        (self.width.max(0) as usize + 7) / 8
    }

    /// Bytes past the end of `data` read as unset
    pub fn get(&self, col: usize, row: usize) -> bool {
        let Some(&byte) = self.data.get(row * self.stride() + col / 8) else {
            return false;
        };
        let bit = match self.order {
            BitOrder::MsbFirst => 0x80 >> (col % 8),
            BitOrder::LsbFirst => 0x01 << (col % 8),
        };
        byte & bit != 0
    }
}

/// A two-color bitmap. Without a background, unset bits are left untouched.
#[derive(Clone, Copy, Debug)]
pub struct MonoBitmap<'a> {
    pub plane: BitPlane<'a>,
    pub height: Coord,
    pub color: Color565,
    pub background: Option<Color565>,
}
impl<'a> MonoBitmap<'a> {
    pub fn new(data: &'a [u8], width: Coord, height: Coord, color: Color565) -> Self {
        Self {
            plane: BitPlane::new(data, width),
            height,
            color,
            background: None,
        }
    }

    /// Same layout as [`MonoBitmap::new`] but LSB-first, the XBM convention
    pub fn xbm(data: &'a [u8], width: Coord, height: Coord, color: Color565) -> Self {
        let mut bitmap = Self::new(data, width, height, color);
        bitmap.plane.order = BitOrder::LsbFirst;
        bitmap
    }

    pub fn with_background(self, background: Color565) -> Self {
        Self {
            background: Some(background),
            ..self
        }
    }
}
impl Drawable for MonoBitmap<'_> {
    fn draw_at<D: Device>(&self, gfx: &mut Gfx<'_, D>, position: Position) {
        let bounds = Rect::new(position.x, position.y, self.plane.width, self.height);
        gfx.blit(bounds, |col, row| match self.plane.get(col, row) {
            true => Some(self.color),
            false => self.background,
        });
    }
}

/// 8-bit grayscale, one byte per pixel, drawn as `color565(v, v, v)`
#[derive(Clone, Copy, Debug)]
pub struct GrayscaleBitmap<'a> {
    pub data: &'a [u8],
    pub width: Coord,
    pub height: Coord,
    pub mask: Option<&'a [u8]>,
}
impl<'a> GrayscaleBitmap<'a> {
    pub fn new(data: &'a [u8], width: Coord, height: Coord) -> Self {
        Self {
            data,
            width,
            height,
            mask: None,
        }
    }

    /// Only pixels whose mask bit is set are drawn
    pub fn with_mask(self, mask: &'a [u8]) -> Self {
        Self {
            mask: Some(mask),
            ..self
        }
    }
}
impl Drawable for GrayscaleBitmap<'_> {
    fn draw_at<D: Device>(&self, gfx: &mut Gfx<'_, D>, position: Position) {
        let bounds = Rect::new(position.x, position.y, self.width, self.height);
        let mask = self.mask.map(|m| BitPlane::new(m, self.width));
        let stride = self.width as usize;
        gfx.blit(bounds, |col, row| {
            if !mask.map_or(true, |m| m.get(col, row)) {
                return None;
            }
            let v = *self.data.get(row * stride + col)?;
            Some(color565(v, v, v))
        });
    }
}

/// Native RGB565 pixels
#[derive(Clone, Copy, Debug)]
pub struct Rgb565Bitmap<'a> {
    pub data: &'a [u16],
    pub width: Coord,
    pub height: Coord,
    pub mask: Option<&'a [u8]>,
}
impl<'a> Rgb565Bitmap<'a> {
    pub fn new(data: &'a [u16], width: Coord, height: Coord) -> Self {
        Self {
            data,
            width,
            height,
            mask: None,
        }
    }

    pub fn with_mask(self, mask: &'a [u8]) -> Self {
        Self {
            mask: Some(mask),
            ..self
        }
    }
}
impl Drawable for Rgb565Bitmap<'_> {
    fn draw_at<D: Device>(&self, gfx: &mut Gfx<'_, D>, position: Position) {
        let bounds = Rect::new(position.x, position.y, self.width, self.height);
        let mask = self.mask.map(|m| BitPlane::new(m, self.width));
        let stride = self.width as usize;
        gfx.blit(bounds, |col, row| {
            if !mask.map_or(true, |m| m.get(col, row)) {
                return None;
            }
            self.data.get(row * stride + col).map(|&raw| Color565(raw))
        });
    }
}

/// Packed `r, g, b` byte triples
#[derive(Clone, Copy, Debug)]
pub struct Rgb888Bitmap<'a> {
    pub data: &'a [u8],
    pub width: Coord,
    pub height: Coord,
    pub mask: Option<&'a [u8]>,
}
impl<'a> Rgb888Bitmap<'a> {
    pub fn new(data: &'a [u8], width: Coord, height: Coord) -> Self {
        Self {
            data,
            width,
            height,
            mask: None,
        }
    }

    pub fn with_mask(self, mask: &'a [u8]) -> Self {
        Self {
            mask: Some(mask),
            ..self
        }
    }
}
impl Drawable for Rgb888Bitmap<'_> {
    fn draw_at<D: Device>(&self, gfx: &mut Gfx<'_, D>, position: Position) {
        let bounds = Rect::new(position.x, position.y, self.width, self.height);
        let mask = self.mask.map(|m| BitPlane::new(m, self.width));
        let stride = self.width as usize;
        gfx.blit(bounds, |col, row| {
            if !mask.map_or(true, |m| m.get(col, row)) {
                return None;
            }
            let start = (row * stride + col) * 3;
            match self.data.get(start..start + 3)? {
                &[r, g, b] => Some(color565(r, g, b)),
                _ => None,
            }
        });
    }
}

/// 8-bit indices substituted through a caller palette.
/// Indices past the end of the palette are skipped.
#[derive(Clone, Copy, Debug)]
pub struct IndexedBitmap<'a> {
    pub data: &'a [u8],
    pub palette: &'a [Color565],
    pub width: Coord,
    pub height: Coord,
    pub mask: Option<&'a [u8]>,
}
impl<'a> IndexedBitmap<'a> {
    pub fn new(data: &'a [u8], palette: &'a [Color565], width: Coord, height: Coord) -> Self {
        Self {
            data,
            palette,
            width,
            height,
            mask: None,
        }
    }

    pub fn with_mask(self, mask: &'a [u8]) -> Self {
        Self {
            mask: Some(mask),
            ..self
        }
    }
}
impl Drawable for IndexedBitmap<'_> {
    fn draw_at<D: Device>(&self, gfx: &mut Gfx<'_, D>, position: Position) {
        let bounds = Rect::new(position.x, position.y, self.width, self.height);
        let mask = self.mask.map(|m| BitPlane::new(m, self.width));
        let stride = self.width as usize;
        gfx.blit(bounds, |col, row| {
            if !mask.map_or(true, |m| m.get(col, row)) {
                return None;
            }
            let index = *self.data.get(row * stride + col)?;
            self.palette.get(index as usize).copied()
        });
    }
}

impl<'f, D: Device> Gfx<'f, D> {
    /// Walks the visible part of `bounds` row-major, asking `pixel` for the
    /// color at each source `(col, row)`. `None` leaves the pixel untouched.
    fn blit(&mut self, bounds: Rect, mut pixel: impl FnMut(usize, usize) -> Option<Color565>) {
        let Some(visible) = self.surface.clip_rect(bounds) else {
            return;
        };
        self.start_write();
        for y in visible.y..=visible.max_y() {
            let row = (i64::from(y) - i64::from(bounds.y)) as usize;
            for x in visible.x..=visible.max_x() {
                let col = (i64::from(x) - i64::from(bounds.x)) as usize;
                if let Some(color) = pixel(col, row) {
                    self.device.write_pixel_preclipped(x, y, color);
                }
            }
        }
        self.end_write();
    }

    pub fn draw<T: Drawable>(&mut self, item: &T, position: Position) {
        item.draw_at(self, position);
    }

    /// 1-bit MSB-first bitmap; unset bits are transparent
    pub fn draw_bitmap(
        &mut self,
        x: Coord,
        y: Coord,
        bitmap: &[u8],
        w: Coord,
        h: Coord,
        color: Color565,
    ) {
        self.draw(&MonoBitmap::new(bitmap, w, h, color), Position::new(x, y));
    }

    /// 1-bit MSB-first bitmap; unset bits are painted `background`
    pub fn draw_bitmap_bg(
        &mut self,
        x: Coord,
        y: Coord,
        bitmap: &[u8],
        w: Coord,
        h: Coord,
        color: Color565,
        background: Color565,
    ) {
        let bitmap = MonoBitmap::new(bitmap, w, h, color).with_background(background);
        self.draw(&bitmap, Position::new(x, y));
    }

    pub fn draw_xbitmap(
        &mut self,
        x: Coord,
        y: Coord,
        bitmap: &[u8],
        w: Coord,
        h: Coord,
        color: Color565,
    ) {
        self.draw(&MonoBitmap::xbm(bitmap, w, h, color), Position::new(x, y));
    }

    pub fn draw_grayscale_bitmap(
        &mut self,
        x: Coord,
        y: Coord,
        bitmap: &[u8],
        mask: Option<&[u8]>,
        w: Coord,
        h: Coord,
    ) {
        let bitmap = GrayscaleBitmap {
            mask,
            ..GrayscaleBitmap::new(bitmap, w, h)
        };
        self.draw(&bitmap, Position::new(x, y));
    }

    pub fn draw_16bit_rgb_bitmap(
        &mut self,
        x: Coord,
        y: Coord,
        bitmap: &[u16],
        mask: Option<&[u8]>,
        w: Coord,
        h: Coord,
    ) {
        let bitmap = Rgb565Bitmap {
            mask,
            ..Rgb565Bitmap::new(bitmap, w, h)
        };
        self.draw(&bitmap, Position::new(x, y));
    }

    pub fn draw_24bit_rgb_bitmap(
        &mut self,
        x: Coord,
        y: Coord,
        bitmap: &[u8],
        mask: Option<&[u8]>,
        w: Coord,
        h: Coord,
    ) {
        let bitmap = Rgb888Bitmap {
            mask,
            ..Rgb888Bitmap::new(bitmap, w, h)
        };
        self.draw(&bitmap, Position::new(x, y));
    }

    pub fn draw_indexed_bitmap(
        &mut self,
        x: Coord,
        y: Coord,
        bitmap: &[u8],
        palette: &[Color565],
        mask: Option<&[u8]>,
        w: Coord,
        h: Coord,
    ) {
        let bitmap = IndexedBitmap {
            mask,
            ..IndexedBitmap::new(bitmap, palette, w, h)
        };
        self.draw(&bitmap, Position::new(x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn bit_plane_honours_order_and_row_padding() {
        // 10 pixels wide: two bytes per row
        let data = [0b1000_0000, 0b0100_0000, 0b0000_0001, 0b0000_0000];
        let msb = BitPlane::new(&data, 10);
        assert!(msb.get(0, 0));
        assert!(msb.get(9, 0));
        assert!(!msb.get(8, 0));
        assert!(msb.get(7, 1));

        let lsb = BitPlane {
            order: BitOrder::LsbFirst,
            ..msb
        };
        assert!(lsb.get(7, 0));
        assert!(lsb.get(14, 0));
        assert!(!lsb.get(9, 0));
        assert!(lsb.get(0, 1));
    }

    #[test]
    fn bit_plane_reads_past_the_end_as_unset() {
        let plane = BitPlane::new(&[0xFF], 8);
        assert!(plane.get(3, 0));
        assert!(!plane.get(3, 1));
    }
}
