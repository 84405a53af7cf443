//! A device that records what reaches it, for asserting on call traffic
//! rather than on the final image.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;

use tinygfx::graphics::Color565;
use tinygfx::layout::{Coord, Rotation, Size};
use tinygfx::{Device, Gfx};

pub struct RecordingDevice {
    size: Size,
    rotation: Rotation,
    /// Last color written at each logical position
    pub pixels: BTreeMap<(Coord, Coord), Color565>,
    /// Number of writes at each logical position
    pub writes: BTreeMap<(Coord, Coord), usize>,
    pub fill_rects: Vec<(Coord, Coord, Coord, Coord)>,
    pub starts: usize,
    pub ends: usize,
    open: bool,
}

impl RecordingDevice {
    pub fn new(width: Coord, height: Coord) -> Self {
        Self {
            size: Size::new(width, height),
            rotation: Rotation::Deg0,
            pixels: BTreeMap::new(),
            writes: BTreeMap::new(),
            fill_rects: Vec::new(),
            starts: 0,
            ends: 0,
            open: false,
        }
    }

    fn logical_size(&self) -> Size {
        match self.rotation.is_transposed() {
            true => self.size.transposed(),
            false => self.size,
        }
    }

    pub fn clear(&mut self) {
        self.pixels.clear();
        self.writes.clear();
        self.fill_rects.clear();
    }

    pub fn total_writes(&self) -> usize {
        self.writes.values().sum()
    }

    /// Every position written, regardless of color
    pub fn positions(&self) -> BTreeSet<(Coord, Coord)> {
        self.pixels.keys().copied().collect()
    }

    /// Positions whose last write was `color`
    pub fn painted(&self, color: Color565) -> BTreeSet<(Coord, Coord)> {
        self.pixels
            .iter()
            .filter(|&(_, &c)| c == color)
            .map(|(&p, _)| p)
            .collect()
    }

    pub fn is_batch_open(&self) -> bool {
        self.open
    }
}

impl Device for RecordingDevice {
    type Error = Infallible;

    fn physical_size(&self) -> Size {
        self.size
    }

    fn begin(&mut self, _speed: Option<u32>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn write_pixel_preclipped(&mut self, x: Coord, y: Coord, color: Color565) {
        let size = self.logical_size();
        assert!(
            (0..size.width).contains(&x) && (0..size.height).contains(&y),
            "({x}, {y}) reached the device outside {}x{}",
            size.width,
            size.height
        );
        *self.writes.entry((x, y)).or_default() += 1;
        self.pixels.insert((x, y), color);
    }

    fn write_fill_rect_preclipped(
        &mut self,
        x: Coord,
        y: Coord,
        w: Coord,
        h: Coord,
        color: Color565,
    ) {
        assert!(w > 0 && h > 0, "empty fill {w}x{h} reached the device");
        self.fill_rects.push((x, y, w, h));
        for row in y..y + h {
            for col in x..x + w {
                self.write_pixel_preclipped(col, row, color);
            }
        }
    }

    fn start_write(&mut self) {
        assert!(!self.open, "start_write reached the device twice");
        self.open = true;
        self.starts += 1;
    }

    fn end_write(&mut self) {
        assert!(self.open, "end_write reached the device without a batch");
        self.open = false;
        self.ends += 1;
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }
}

pub fn gfx(width: Coord, height: Coord) -> Gfx<'static, RecordingDevice> {
    Gfx::new(RecordingDevice::new(width, height))
}
