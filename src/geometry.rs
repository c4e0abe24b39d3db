//! Plane geometry shared by anchors and routing

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A 2D point on the canvas plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The local-space origin every connector path starts at
    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Manhattan distance, the edge weight of the routing graph
    pub fn manhattan(&self, other: Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// True when both coordinates differ by less than `tolerance`
    pub fn approx_eq(&self, other: Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// An axis-aligned rectangle, used for shape bodies and routing obstacles
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "w")]
    pub width: f64,
    #[serde(rename = "h")]
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Flip negative extents so that `x`/`y` is the top-left corner
    pub fn normalized(&self) -> Rect {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Rect::new(x, y, width, height)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grow the rectangle by `margin` on every side
    pub fn inflate(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Check if the point lies on or inside the rectangle
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Check if the point lies strictly inside the rectangle grown by `clearance`
    pub fn contains_within(&self, point: Point, clearance: f64) -> bool {
        point.x > self.x - clearance
            && point.x < self.right() + clearance
            && point.y > self.y - clearance
            && point.y < self.bottom() + clearance
    }

    /// Expand this rectangle to include a point
    pub fn expand_to_include(&self, point: Point) -> Rect {
        let x = self.x.min(point.x);
        let y = self.y.min(point.y);
        let right = self.right().max(point.x);
        let bottom = self.bottom().max(point.y);
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Bounding box of a set of points, `None` when empty
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Rect::new(first.x, first.y, 0.0, 0.0), |acc, p| {
            acc.expand_to_include(p)
        }))
    }

    /// Does the axis-aligned segment `a`-`b` pass strictly through the interior?
    ///
    /// The fixed coordinate must lie strictly inside the rectangle's span on
    /// that axis, and the varying coordinate range must overlap the opposite
    /// span. Segments running along an edge do not cross. Diagonal segments
    /// are tested by their bounding box.
    pub fn crossed_by(&self, a: Point, b: Point) -> bool {
        let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
        let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
        if a.y == b.y {
            a.y > self.y && a.y < self.bottom() && max_x > self.x && min_x < self.right()
        } else if a.x == b.x {
            a.x > self.x && a.x < self.right() && max_y > self.y && min_y < self.bottom()
        } else {
            max_x > self.x && min_x < self.right() && max_y > self.y && min_y < self.bottom()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_negative_extent() {
        let r = Rect::new(100.0, 50.0, -40.0, -20.0).normalized();
        assert_eq!(r, Rect::new(60.0, 30.0, 40.0, 20.0));
    }

    #[test]
    fn test_inflate() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0).inflate(5.0);
        assert_eq!(r, Rect::new(-5.0, -5.0, 20.0, 20.0));
    }

    #[test]
    fn test_crossed_by_horizontal_through_interior() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(r.crossed_by(Point::new(-10.0, 25.0), Point::new(110.0, 25.0)));
        assert!(r.crossed_by(Point::new(50.0, 25.0), Point::new(150.0, 25.0)));
    }

    #[test]
    fn test_crossed_by_along_edge_is_clear() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(!r.crossed_by(Point::new(-10.0, 0.0), Point::new(110.0, 0.0)));
        assert!(!r.crossed_by(Point::new(100.0, -10.0), Point::new(100.0, 60.0)));
    }

    #[test]
    fn test_crossed_by_outside_range() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        assert!(!r.crossed_by(Point::new(110.0, 25.0), Point::new(200.0, 25.0)));
        assert!(!r.crossed_by(Point::new(50.0, 60.0), Point::new(50.0, 120.0)));
    }

    #[test]
    fn test_enclosing() {
        let r = Rect::enclosing([Point::new(5.0, -3.0), Point::new(-2.0, 8.0)]).unwrap();
        assert_eq!(r, Rect::new(-2.0, -3.0, 7.0, 11.0));
        assert!(Rect::enclosing(std::iter::empty()).is_none());
    }

    #[test]
    fn test_contains_within_clearance() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_within(Point::new(-0.5, 5.0), 1.0));
        assert!(!r.contains_within(Point::new(-1.0, 5.0), 1.0));
    }
}
