//! Geometry primitives shared by the frame updaters, resolver and controller.
//!
//! # Coordinate System
//!
//! - All values are in view points (`f64`)
//! - Origin is the top-left corner, y grows downward
//! - Positive rotation angles turn clockwise on screen

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rotate this vector around the origin by `radians` (clockwise on screen).
    pub fn rotated(self, radians: f64) -> Point {
        let (sin, cos) = radians.sin_cos();
        Point {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    pub fn scaled(self, factor: f64) -> Point {
        Point {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Whether both coordinates are within `tolerance` of `other`.
    pub fn approx_eq(self, other: Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The same size turned by 90 degrees.
    pub fn swapped(self) -> Size {
        Size::new(self.height, self.width)
    }

    /// Width over height.
    pub fn aspect_ratio(self) -> f64 {
        self.width / self.height
    }

    /// True when either dimension is zero or negative.
    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Bounding box size of this size rotated by `radians`.
    ///
    /// ```text
    /// w' = |w*cos| + |h*sin|
    /// h' = |w*sin| + |h*cos|
    /// ```
    pub fn rotated_bounds(self, radians: f64) -> Size {
        let cos = radians.cos().abs();
        let sin = radians.sin().abs();
        Size::new(
            cos * self.width + sin * self.height,
            sin * self.width + cos * self.height,
        )
    }
}

/// An axis-aligned rectangle.
///
/// Width and height are expected to be non-negative; constructors that build
/// rectangles from extents clamp them at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Rectangle spanning the given extents; inverted extents give zero size.
    pub fn from_extents(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(min_x, min_y, (max_x - min_x).max(0.0), (max_y - min_y).max(0.0))
    }

    /// Smallest rectangle containing both points, in any order.
    pub fn from_points(a: Point, b: Point) -> Self {
        Self::from_extents(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    /// Rectangle of `size` centered on `center`.
    pub fn centered(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    /// The four corners: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x(), self.min_y()),
            Point::new(self.max_x(), self.min_y()),
            Point::new(self.max_x(), self.max_y()),
            Point::new(self.min_x(), self.max_y()),
        ]
    }

    /// True when either dimension is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// Shrink by `dx` on the left and right and `dy` on the top and bottom.
    /// Negative values grow the rectangle.
    pub fn inset_by(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(
            self.x + dx,
            self.y + dy,
            self.width - 2.0 * dx,
            self.height - 2.0 * dy,
        )
    }

    pub fn offset_by(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Overlapping region of two rectangles, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let min_x = self.min_x().max(other.min_x());
        let min_y = self.min_y().max(other.min_y());
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        if min_x > max_x || min_y > max_y {
            return None;
        }
        Some(Rect::from_extents(min_x, min_y, max_x, max_y))
    }

    /// Half-open containment test, matching how touch zones are probed.
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    /// Whether `other` lies entirely inside this rectangle (edges may touch).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.max_x() <= self.max_x()
            && other.min_y() >= self.min_y()
            && other.max_y() <= self.max_y()
    }

    /// Fit a rectangle with `inside`'s aspect ratio as large as possible into
    /// `outside`, centered.
    pub fn inscribed(outside: &Rect, inside: Size) -> Rect {
        if inside.is_empty() || outside.is_empty() {
            return Rect::centered(outside.center(), Size::ZERO);
        }

        let size = if inside.aspect_ratio() > outside.size().aspect_ratio() {
            Size::new(outside.width, outside.width / inside.aspect_ratio())
        } else {
            Size::new(outside.height * inside.aspect_ratio(), outside.height)
        };
        Rect::centered(outside.center(), size)
    }

    /// Whether every field is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}
