//! The contract between the engine and a concrete display driver.
//!
//! A driver only has to know how to put one pixel on the panel. Everything
//! else has a generic fallback built on [`Device::write_pixel_preclipped`],
//! which drivers with a faster path (block fills, address windows, DMA
//! bursts) can override.
//!
//! Coordinates handed to a device are logical (post-rotation) and already
//! clipped to the surface; a device never sees an out-of-bounds position.

pub mod framebuffer;

pub use framebuffer::FrameBuffer;

use crate::graphics::Color565;
use crate::layout::{Coord, Rect, Rotation, Size};
use crate::render::shapes::{line_spans, Span};

pub trait Device {
    /// Transport-level failure. The engine never inspects it.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Size of the panel at rotation 0
    fn physical_size(&self) -> Size;

    /// One-time setup. `speed` is an optional transport rate hint.
    fn begin(&mut self, speed: Option<u32>) -> Result<(), Self::Error>;

    fn write_pixel_preclipped(&mut self, x: Coord, y: Coord, color: Color565);

    fn write_fast_hline_preclipped(&mut self, x: Coord, y: Coord, w: Coord, color: Color565) {
        for i in x..x + w {
            self.write_pixel_preclipped(i, y, color);
        }
    }

    fn write_fast_vline_preclipped(&mut self, x: Coord, y: Coord, h: Coord, color: Color565) {
        for i in y..y + h {
            self.write_pixel_preclipped(x, i, color);
        }
    }

    fn write_fill_rect_preclipped(
        &mut self,
        x: Coord,
        y: Coord,
        w: Coord,
        h: Coord,
        color: Color565,
    ) {
        for row in y..y + h {
            self.write_fast_hline_preclipped(x, row, w, color);
        }
    }

    /// Only called when both endpoints lie on the surface, so every
    /// intermediate pixel does too.
    fn write_line_preclipped(
        &mut self,
        x0: Coord,
        y0: Coord,
        x1: Coord,
        y1: Coord,
        color: Color565,
    ) {
        // Preclipped coordinates are never negative
        let everywhere = Rect::new(0, 0, Coord::MAX, Coord::MAX);
        line_spans(x0, y0, x1, y1, everywhere, |span| match span {
            Span::Horizontal { x, y, len } => self.write_fast_hline_preclipped(x, y, len, color),
            Span::Vertical { x, y, len } => self.write_fast_vline_preclipped(x, y, len, color),
        });
    }

    /// Opens a batch of writes. The engine balances calls and never nests them.
    fn start_write(&mut self) {}

    fn end_write(&mut self) {}

    /// Commits anything buffered.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn invert_display(&mut self, _invert: bool) {}

    /// Notification that logical coordinates now map through `rotation`.
    fn set_rotation(&mut self, _rotation: Rotation) {}
}
