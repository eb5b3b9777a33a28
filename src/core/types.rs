use serde::{Deserialize, Serialize};

/// Point in pixel space, relative to the axis allocation origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Rectangular pixel region handed to an axis by its host container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Allocation {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Allocation {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width >= 0 && self.height >= 0
    }
}

/// Pixel size of a draw target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Smallest viewport that covers `allocation` measured from the origin.
    #[must_use]
    pub fn covering(allocation: Allocation) -> Self {
        let width = (allocation.x.max(0) + allocation.width.max(0)).max(1);
        let height = (allocation.y.max(0) + allocation.height.max(0)).max(1);
        Self {
            width: width.unsigned_abs(),
            height: height.unsigned_abs(),
        }
    }
}

/// One of the four sides of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];
}

/// Orientation of a size request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Minimum/natural pixel space requested on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SideSpace {
    pub minimum: i32,
    pub natural: i32,
}

impl SideSpace {
    #[must_use]
    pub const fn new(minimum: i32, natural: i32) -> Self {
        Self { minimum, natural }
    }

    /// Larger of the two requests; the layout never allocates less than this.
    #[must_use]
    pub fn extent(self) -> i32 {
        self.minimum.max(self.natural)
    }

    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            minimum: self.minimum.max(other.minimum),
            natural: self.natural.max(other.natural),
        }
    }
}

/// Minimum/natural size along one orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SizeRequest {
    pub minimum: i32,
    pub natural: i32,
}

/// Maximum space consumed on each side of an axis line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Borders {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Borders {
    #[must_use]
    pub fn get(self, side: Side) -> i32 {
        match side {
            Side::Top => self.top,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Widens the border on `side` so it covers `space`.
    pub fn include(&mut self, side: Side, space: SideSpace) {
        let slot = match side {
            Side::Top => &mut self.top,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *slot = (*slot).max(space.extent());
    }
}

/// Preferred size of a rendered label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LabelSize {
    pub width: i32,
    pub height: i32,
}

impl LabelSize {
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}
