//! Antennas, rulers and the search boundary

use std::collections::BTreeSet;

use crate::anchor::AnchorSide;
use crate::geometry::{Point, Rect};

use super::spots::{coord_key, key_coord};

/// Extrude `point` one margin out of its side; unchanged without a side
pub fn antenna(point: Point, side: Option<AnchorSide>, margin: f64) -> Point {
    match side {
        Some(side) => {
            let n = side.normal();
            point.offset(n.x * margin, n.y * margin)
        }
        None => point,
    }
}

/// Candidate grid lines for the routing graph
#[derive(Debug, Clone, PartialEq)]
pub struct Rulers {
    /// x-coordinates of vertical lines, sorted and deduplicated
    pub vertical: Vec<f64>,
    /// y-coordinates of horizontal lines, sorted and deduplicated
    pub horizontal: Vec<f64>,
    /// Search space boundary
    pub bounds: Rect,
}

impl Rulers {
    /// Derive rulers from inflated obstacle edges and the antenna positions.
    ///
    /// Both antenna coordinates always become rulers so that each antenna
    /// sits on an intersection, with or without an obstacle around it.
    pub fn build(
        origin: Point,
        destination: Point,
        antennas: [Point; 2],
        inflated: &[Rect],
        margin: f64,
    ) -> Self {
        let mut xs = BTreeSet::new();
        let mut ys = BTreeSet::new();

        for rect in inflated {
            xs.insert(coord_key(rect.x));
            xs.insert(coord_key(rect.right()));
            ys.insert(coord_key(rect.y));
            ys.insert(coord_key(rect.bottom()));
        }
        for a in antennas {
            xs.insert(coord_key(a.x));
            ys.insert(coord_key(a.y));
        }

        let vertical: Vec<f64> = xs.into_iter().map(key_coord).collect();
        let horizontal: Vec<f64> = ys.into_iter().map(key_coord).collect();

        // Rulers are sorted, so the extremes are enough
        let x_extremes = [vertical.first(), vertical.last()]
            .into_iter()
            .flatten()
            .map(|&x| Point::new(x, origin.y));
        let y_extremes = [horizontal.first(), horizontal.last()]
            .into_iter()
            .flatten()
            .map(|&y| Point::new(origin.x, y));
        let bounds = Rect::enclosing(
            [origin, destination, antennas[0], antennas[1]]
                .into_iter()
                .chain(x_extremes)
                .chain(y_extremes),
        )
        .unwrap_or_else(|| Rect::new(origin.x, origin.y, 0.0, 0.0));

        Self {
            vertical,
            horizontal,
            bounds: bounds.inflate(margin),
        }
    }

    /// Boundary plus rulers plus the midpoint of every adjacent pair, sorted
    pub fn vertical_lines(&self) -> Vec<f64> {
        with_midpoints(&self.vertical, self.bounds.x, self.bounds.right())
    }

    pub fn horizontal_lines(&self) -> Vec<f64> {
        with_midpoints(&self.horizontal, self.bounds.y, self.bounds.bottom())
    }
}

fn with_midpoints(rulers: &[f64], low: f64, high: f64) -> Vec<f64> {
    let lines: BTreeSet<i64> = std::iter::once(low)
        .chain(rulers.iter().copied())
        .chain(std::iter::once(high))
        .map(coord_key)
        .collect();
    let lines: Vec<f64> = lines.into_iter().map(key_coord).collect();

    let mut all: BTreeSet<i64> = lines.iter().copied().map(coord_key).collect();
    for pair in lines.windows(2) {
        all.insert(coord_key((pair[0] + pair[1]) / 2.0));
    }
    all.into_iter().map(key_coord).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_antenna_extrudes_along_normal() {
        let p = Point::new(10.0, 10.0);
        assert_eq!(antenna(p, Some(AnchorSide::Top), 20.0), Point::new(10.0, -10.0));
        assert_eq!(antenna(p, Some(AnchorSide::Right), 20.0), Point::new(30.0, 10.0));
        assert_eq!(antenna(p, Some(AnchorSide::Bottom), 20.0), Point::new(10.0, 30.0));
        assert_eq!(antenna(p, Some(AnchorSide::Left), 20.0), Point::new(-10.0, 10.0));
        assert_eq!(antenna(p, None, 20.0), p);
    }

    #[test]
    fn test_rulers_dedup_and_sort() {
        let inflated = [Rect::new(-120.0, -50.0, 140.0, 100.0)];
        let rulers = Rulers::build(
            Point::origin(),
            Point::new(300.0, 0.0),
            [Point::new(20.0, 0.0), Point::new(280.0, 0.0)],
            &inflated,
            20.0,
        );
        assert_eq!(rulers.vertical, vec![-120.0, 20.0, 280.0]);
        assert_eq!(rulers.horizontal, vec![-50.0, 0.0, 50.0]);
    }

    #[test]
    fn test_bounds_cover_rulers_plus_margin() {
        let inflated = [Rect::new(-120.0, -50.0, 140.0, 100.0)];
        let rulers = Rulers::build(
            Point::origin(),
            Point::new(300.0, 0.0),
            [Point::new(20.0, 0.0), Point::new(280.0, 0.0)],
            &inflated,
            20.0,
        );
        assert_eq!(rulers.bounds, Rect::new(-140.0, -70.0, 460.0, 140.0));
    }

    #[test]
    fn test_lines_include_midpoints() {
        let lines = with_midpoints(&[0.0, 10.0], -10.0, 30.0);
        assert_eq!(lines, vec![-10.0, -5.0, 0.0, 5.0, 10.0, 20.0, 30.0]);
    }
}
