//! Plane geometry used by the background grid.

/// A point (or vector) in surface units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point2) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Shortest distance from this point to the segment `a..b`.
    ///
    /// The projection is clamped to the segment's endpoints; a degenerate
    /// segment (`a == b`) measures the distance to `a`.
    pub fn distance_to_segment(self, a: Point2, b: Point2) -> f32 {
        let cx = b.x - a.x;
        let cy = b.y - a.y;
        let len_sq = cx * cx + cy * cy;

        if len_sq == 0.0 {
            return self.distance(a);
        }

        let t = ((self.x - a.x) * cx + (self.y - a.y) * cy) / len_sq;
        let nearest = if t < 0.0 {
            a
        } else if t > 1.0 {
            b
        } else {
            Point2::new(a.x + t * cx, a.y + t * cy)
        };
        self.distance(nearest)
    }
}

/// Size of a drawing surface in surface units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A viewport with no drawable area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}
