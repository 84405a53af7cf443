//! An in-memory RGB565 panel.
//!
//! Used by the simulator as the thing being drawn on, and handy for tests
//! that care about the final image rather than the call sequence.

use std::convert::Infallible;

use super::Device;
use crate::graphics::Color565;
use crate::layout::{Coord, Position, Rotation, Size};

pub struct FrameBuffer {
    size: Size,
    rotation: Rotation,
    inverted: bool,
    buffer: Vec<u16>,
}

impl FrameBuffer {
    /// A black panel of `size` at rotation 0
    pub fn new(size: Size) -> Self {
        let len = size.width.max(0) as usize * size.height.max(0) as usize;
        Self {
            size,
            rotation: Rotation::Deg0,
            inverted: false,
            buffer: vec![0; len],
        }
    }

    #[inline]
    fn index(&self, position: Position) -> usize {
        position.y as usize * self.size.width as usize + position.x as usize
    }

    /// Reads back a pixel in logical coordinates under the current rotation
    pub fn pixel(&self, x: Coord, y: Coord) -> Option<Color565> {
        let logical = match self.rotation.is_transposed() {
            true => self.size.transposed(),
            false => self.size,
        };
        if !(0..logical.width).contains(&x) || !(0..logical.height).contains(&y) {
            return None;
        }
        let physical = self.rotation.to_physical(Position::new(x, y), self.size);
        Some(Color565(self.buffer[self.index(physical)]))
    }

    /// The panel contents in physical row-major order, as the display would show them
    pub fn physical_pixels(&self) -> impl Iterator<Item = Color565> + '_ {
        let inverted = self.inverted;
        self.buffer.iter().map(move |&raw| match inverted {
            true => Color565(raw).inverted(),
            false => Color565(raw),
        })
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.buffer
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }
}

impl Device for FrameBuffer {
    type Error = Infallible;

    fn physical_size(&self) -> Size {
        self.size
    }

    fn begin(&mut self, _speed: Option<u32>) -> Result<(), Self::Error> {
        self.buffer.fill(0);
        Ok(())
    }

    fn write_pixel_preclipped(&mut self, x: Coord, y: Coord, color: Color565) {
        let physical = self.rotation.to_physical(Position::new(x, y), self.size);
        let index = self.index(physical);
        self.buffer[index] = color.0;
    }

    fn write_fast_hline_preclipped(&mut self, x: Coord, y: Coord, w: Coord, color: Color565) {
        match self.rotation {
            // Rows are contiguous only when the panel is upright
            Rotation::Deg0 => {
                let start = self.index(Position::new(x, y));
                self.buffer[start..start + w as usize].fill(color.0);
            }
            _ => (x..x + w).for_each(|i| self.write_pixel_preclipped(i, y, color)),
        }
    }

    fn invert_display(&mut self, invert: bool) {
        self.inverted = invert;
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }
}
