use serde::{Deserialize, Serialize};

/// A point in page coordinate units.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotate this point about `pivot` by `degrees` (counterclockwise in a
    /// y-up frame, clockwise on a y-down page).
    #[must_use]
    pub fn rotate_about(self, pivot: Point, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Self {
            x: pivot.x + dx * cos - dy * sin,
            y: pivot.y + dx * sin + dy * cos,
        }
    }
}

/// A real-valued rectangle in page coordinate units.
///
/// Width and height may be negative: shadow scaling with negative factors
/// yields an inverted rectangle that downstream drawing still accepts.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct ResolvedRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl ResolvedRect {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Axis-aligned box spanning two opposite corners.
    #[must_use]
    pub fn from_points(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            w: a.x.max(b.x) - x,
            h: a.y.max(b.y) - y,
        }
    }

    /// Axis-aligned bounding box of a set of points.
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in points.iter().skip(1) {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Corners in order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.right(), self.y),
            Point::new(self.right(), self.bottom()),
            Point::new(self.x, self.bottom()),
        ]
    }

    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Exchange width and height, keeping the center fixed.
    #[must_use]
    pub fn swap_axes_about_center(&self) -> Self {
        Self {
            x: self.x + (self.w - self.h) / 2.0,
            y: self.y + (self.h - self.w) / 2.0,
            w: self.h,
            h: self.w,
        }
    }

    /// Smallest rectangle covering both (edges taken as min/max, so inverted
    /// inputs are normalized).
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let min_x = self.x.min(self.right()).min(other.x.min(other.right()));
        let min_y = self.y.min(self.bottom()).min(other.y.min(other.bottom()));
        let max_x = self.x.max(self.right()).max(other.x.max(other.right()));
        let max_y = self.y.max(self.bottom()).max(other.y.max(other.bottom()));
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Zero area in either axis.
    pub fn is_empty(&self) -> bool {
        self.w == 0.0 || self.h == 0.0
    }
}
