//! Candidate waypoints, keyed on a fixed-precision integer grid

use std::collections::BTreeSet;

use crate::geometry::{Point, Rect};

use super::rulers::Rulers;

/// Coordinates are compared at 1/100 unit
const KEY_SCALE: f64 = 100.0;

pub fn coord_key(value: f64) -> i64 {
    (value * KEY_SCALE).round() as i64
}

pub fn key_coord(key: i64) -> f64 {
    key as f64 / KEY_SCALE
}

/// Exact, hashable identity of a spot. Orders by x, then y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpotKey {
    pub x: i64,
    pub y: i64,
}

impl SpotKey {
    pub fn of(point: Point) -> Self {
        Self {
            x: coord_key(point.x),
            y: coord_key(point.y),
        }
    }

    pub fn point(self) -> Point {
        Point::new(key_coord(self.x), key_coord(self.y))
    }
}

/// Ruler intersections, cell midpoints and both antennas, minus every spot
/// within `clearance` of an obstacle body.
pub fn generate(
    rulers: &Rulers,
    antennas: [Point; 2],
    obstacles: &[Rect],
    clearance: f64,
) -> BTreeSet<SpotKey> {
    let xs = rulers.vertical_lines();
    let ys = rulers.horizontal_lines();

    let candidates = xs
        .iter()
        .flat_map(|&x| ys.iter().map(move |&y| Point::new(x, y)))
        .chain(antennas);

    candidates
        .filter(|p| !obstacles.iter().any(|r| r.contains_within(*p, clearance)))
        .map(SpotKey::of)
        .collect()
}
