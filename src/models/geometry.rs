/// A pixel coordinate in the displayed image's coordinate space.
///
/// Points are recorded exactly as the pointer reported them, so they may lie
/// outside the image if the pointer left the picture during a drag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Raw pointer drag, from press to release.
///
/// The corners are unordered: `end` may be left of or above `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DragRegion {
    pub start: Point,
    pub end: Point,
}

impl DragRegion {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// True when the drag went right-to-left or bottom-to-top on either axis.
    pub fn is_reversed(&self) -> bool {
        self.end.x < self.start.x || self.end.y < self.start.y
    }

    /// Swap coordinates per axis so that `start` is the top-left corner and
    /// `end` the bottom-right one.
    pub fn ordered(&self) -> Self {
        Self {
            start: Point::new(self.start.x.min(self.end.x), self.start.y.min(self.end.y)),
            end: Point::new(self.start.x.max(self.end.x), self.start.y.max(self.end.y)),
        }
    }

    /// Signed raw extent of the drag as `(dx, dy)`.
    pub fn extent(&self) -> (i64, i64) {
        (
            i64::from(self.end.x) - i64::from(self.start.x),
            i64::from(self.end.y) - i64::from(self.start.y),
        )
    }
}

/// Crop rectangle in image pixel space, edges exclusive on the right/bottom.
///
/// Edges use `i64` so that every pair of `i32` points normalizes without
/// overflow. Edges may be negative or beyond the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CropRectangle {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl CropRectangle {
    pub const fn new(left: i64, top: i64, right: i64, bottom: i64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    pub fn is_square(&self) -> bool {
        self.width() == self.height()
    }

    /// A rectangle with no pixels to copy (zero or negative extent).
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// True when every edge lies within a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.left >= 0
            && self.top >= 0
            && self.right <= i64::from(width)
            && self.bottom <= i64::from(height)
    }
}

impl std::fmt::Display for CropRectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}) {}x{}",
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.width(),
            self.height()
        )
    }
}
