//! Continuous pixel-space primitives. These are the plain value types that
//! cross the boundary between this engine and the rendering/input layers:
//! everything here is pure data with arithmetic, no grid knowledge.

use derive_more::{
    Add, AddAssign, Display, Div, DivAssign, From, Into, Mul, MulAssign, Neg,
    Sub, SubAssign, Sum,
};
use serde::{Deserialize, Serialize};

/// A 2D point in pixel space. The y axis points *down*, matching screen
/// coordinates: "north" is negative y, and clockwise angles sweep from east
/// towards south.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    PartialOrd,
    From,
    Into,
    Neg,
    Add,
    Sub,
    Mul,
    Div,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    Sum,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.x", "self.y")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point, in pixels
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle of the vector from this point to `other`, in degrees. 0° points
    /// east (+x) and angles increase clockwise (towards +y), so north is
    /// 270°. The result is normalized to `[0, 360)`.
    pub fn angle_to(self, other: Point) -> f64 {
        let radians = (other.y - self.y).atan2(other.x - self.x);
        radians.to_degrees().rem_euclid(360.0)
    }
}

/// An axis-aligned rectangle in pixel space, defined by its top-left corner
/// and its dimensions. Used to describe view bounds when iterating cells.
#[derive(
    Copy, Clone, Debug, Default, Display, PartialEq, Serialize, Deserialize,
)]
#[display(
    fmt = "[{}, {}; {}x{}]",
    "self.x",
    "self.y",
    "self.width",
    "self.height"
)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        self.x <= point.x
            && point.x <= self.right()
            && self.y <= point.y
            && point.y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_point_arithmetic() {
        let p = Point::new(3.0, -2.0) + Point::new(1.0, 6.0);
        assert_eq!(p, Point::new(4.0, 4.0));
        assert_eq!(p * 0.5, Point::new(2.0, 2.0));
        assert_eq!(-p, Point::new(-4.0, -4.0));
    }

    #[test]
    fn test_distance_to() {
        let p = Point::new(1.0, 1.0);
        assert_approx_eq!(p.distance_to(Point::new(4.0, 5.0)), 5.0);
        assert_approx_eq!(p.distance_to(p), 0.0);
    }

    #[test]
    fn test_angle_to() {
        let origin = Point::ORIGIN;
        assert_approx_eq!(origin.angle_to(Point::new(1.0, 0.0)), 0.0);
        // +y is south in screen space
        assert_approx_eq!(origin.angle_to(Point::new(0.0, 1.0)), 90.0);
        assert_approx_eq!(origin.angle_to(Point::new(-1.0, 0.0)), 180.0);
        assert_approx_eq!(origin.angle_to(Point::new(0.0, -1.0)), 270.0);
    }

    #[test]
    fn test_rectangle_contains() {
        let rect = Rectangle::new(0.0, 0.0, 10.0, 5.0);
        assert!(rect.contains(Point::new(0.0, 0.0)));
        assert!(rect.contains(Point::new(10.0, 5.0)));
        assert!(!rect.contains(Point::new(10.1, 2.0)));
        assert!(!rect.contains(Point::new(5.0, -0.1)));
    }
}
