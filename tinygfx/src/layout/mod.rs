/// Signed pixel coordinate. Shapes routinely hang off the surface edges,
/// so everything before clipping works in signed space.
pub type Coord = i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Size {
    pub width: Coord,
    pub height: Coord,
}
impl Size {
    pub const fn new(width: Coord, height: Coord) -> Self {
        Self { width, height }
    }

    /// The same size with the axes swapped
    pub const fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// Position from the top left of the logical surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}
impl Position {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle; `width` and `height` are in pixels, not inclusive bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: Coord,
    pub y: Coord,
    pub width: Coord,
    pub height: Coord,
}
impl Rect {
    pub const fn new(x: Coord, y: Coord, width: Coord, height: Coord) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Inclusive right edge, saturating at `Coord::MAX`
    pub fn max_x(&self) -> Coord {
        self.x.saturating_add(self.width.saturating_sub(1))
    }

    /// Inclusive bottom edge, saturating at `Coord::MAX`
    pub fn max_y(&self) -> Coord {
        self.y.saturating_add(self.height.saturating_sub(1))
    }
}

/// One of the four cardinal orientations of the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0 = 0,
    Deg90 = 1,
    Deg180 = 2,
    Deg270 = 3,
}
impl Rotation {
    /// Only the low two bits are significant, so any index is accepted.
    pub fn from_index(index: u8) -> Self {
        match index & 3 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// `true` for the quarter turns, which swap the logical axes
    pub fn is_transposed(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Maps a logical position onto the unrotated panel of size `physical`.
    pub fn to_physical(self, position: Position, physical: Size) -> Position {
        let Position { x, y } = position;
        match self {
            Rotation::Deg0 => position,
            Rotation::Deg90 => Position::new(physical.width - 1 - y, x),
            Rotation::Deg180 => Position::new(physical.width - 1 - x, physical.height - 1 - y),
            Rotation::Deg270 => Position::new(y, physical.height - 1 - x),
        }
    }
}

/// The logical drawing plane: the physical panel seen through the current rotation.
///
/// All clipping happens against this; nothing outside `[0, width) × [0, height)`
/// is ever handed to a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Surface {
    physical: Size,
    size: Size,
    rotation: Rotation,
}
impl Surface {
    pub fn new(physical: Size) -> Self {
        Self {
            physical,
            size: physical,
            rotation: Rotation::Deg0,
        }
    }

    pub fn width(&self) -> Coord {
        self.size.width
    }

    pub fn height(&self) -> Coord {
        self.size.height
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn physical_size(&self) -> Size {
        self.physical
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
        self.size = match rotation.is_transposed() {
            true => self.physical.transposed(),
            false => self.physical,
        };
    }

    #[inline]
    pub fn contains(&self, x: Coord, y: Coord) -> bool {
        (0..self.size.width).contains(&x) && (0..self.size.height).contains(&y)
    }

    /// Intersects `rect` with the surface. Empty inputs and rectangles that miss
    /// the surface entirely yield `None`.
    pub fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        if rect.is_empty() {
            return None;
        }
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.max_x().min(self.size.width - 1);
        let y1 = rect.max_y().min(self.size.height - 1);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0 + 1, y1 - y0 + 1))
    }
}
