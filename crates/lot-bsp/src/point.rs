//! 2D point representation for lot geometry.

use std::fmt;

use nalgebra::{Point2, Vector2};

/// Tolerance used by [`Point`] equality.
///
/// Repeated interpolation during subdivision accumulates floating-point drift,
/// so two points closer than this on both axes compare equal.
pub const POINT_EPSILON: f64 = 1e-6;

/// An immutable point in the plane.
///
/// Coordinates follow image conventions: `x` grows to the right and `y`
/// grows downwards, so a lot's "top" edge has the smaller `y`.
#[derive(Clone, Copy, Default)]
pub struct Point {
    coords: Point2<f64>,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            coords: Point2::new(x, y),
        }
    }

    /// Horizontal coordinate.
    #[inline]
    pub fn x(&self) -> f64 {
        self.coords.x
    }

    /// Vertical coordinate.
    #[inline]
    pub fn y(&self) -> f64 {
        self.coords.y
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance_to(&self, other: Point) -> f64 {
        nalgebra::distance(&self.coords, &other.coords)
    }

    /// Linear interpolation towards `other`.
    ///
    /// `t = 0.0` yields `self`, `t = 1.0` yields `other`; values in between lie
    /// on the segment joining them.
    #[inline]
    pub fn interpolate(&self, other: Point, t: f64) -> Point {
        Point {
            coords: self.coords + (other.coords - self.coords) * t,
        }
    }

    /// Returns this point shifted by `(dx, dy)`.
    #[inline]
    pub fn translate(&self, dx: f64, dy: f64) -> Point {
        Point {
            coords: self.coords + Vector2::new(dx, dy),
        }
    }

    /// Returns the underlying nalgebra point.
    #[inline]
    pub fn to_nalgebra(self) -> Point2<f64> {
        self.coords
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        (self.coords.x - other.coords.x).abs() < POINT_EPSILON
            && (self.coords.y - other.coords.y).abs() < POINT_EPSILON
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({}, {})", self.coords.x, self.coords.y)
    }
}

impl From<Point2<f64>> for Point {
    fn from(coords: Point2<f64>) -> Self {
        Self { coords }
    }
}

impl From<Point> for Point2<f64> {
    fn from(point: Point) -> Self {
        point.coords
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}
