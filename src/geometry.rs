//! Integer rectangle geometry in frame pixel coordinates.
//!
//! `Rect` positions may go negative transiently while a search window slides
//! past the frame edge; sampling code rejects such candidates instead of
//! clamping them.

/// Pixel coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle: top-left corner plus dimensions.
///
/// Invariant: `width > 0` and `height > 0`. Constructors do not enforce it;
/// session seeding and patch cropping validate and report `InvalidSeed` /
/// `RoiOutOfBounds` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Top-left x coordinate.
    pub x: i32,
    /// Top-left y coordinate.
    pub y: i32,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and dimensions.
    #[inline]
    pub fn new(x: i32, y: i32, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle centered on `center`.
    ///
    /// For even dimensions the center is biased toward the top-left, so the
    /// mapping is exact and reversible for odd dimensions.
    #[inline]
    pub fn from_center(center: Point, width: usize, height: usize) -> Self {
        Self {
            x: center.x - (width / 2) as i32,
            y: center.y - (height / 2) as i32,
            width,
            height,
        }
    }

    /// Returns this rectangle translated by `(dx, dy)`.
    #[inline]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Center point, biased toward the top-left for even dimensions.
    #[inline]
    pub fn center(&self) -> Point {
        Point {
            x: self.x + (self.width / 2) as i32,
            y: self.y + (self.height / 2) as i32,
        }
    }

    /// Area in pixels.
    #[inline]
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// True when the rectangle lies fully inside a `frame_width` x
    /// `frame_height` frame and has positive dimensions.
    pub fn fits_within(&self, frame_width: usize, frame_height: usize) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        if self.x < 0 || self.y < 0 {
            return false;
        }
        let (x, y) = (self.x as usize, self.y as usize);
        x.checked_add(self.width).is_some_and(|r| r <= frame_width)
            && y.checked_add(self.height).is_some_and(|b| b <= frame_height)
    }
}
