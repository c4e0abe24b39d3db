//! Anchor points along shape edges
//!
//! Anchors are generated on demand at a fixed density (one per grid unit of
//! edge length, corners included) and never stored. What a connector keeps
//! is a [`Connection`]: the shape id, the side and the fractional position
//! along that side. Resolving it always goes through the live shape, so
//! anchors follow shapes as they move or resize.

use serde::{Deserialize, Serialize};

use crate::config::RouterConfig;
use crate::element::{Shape, ShapeIndex};
use crate::geometry::{Point, Rect};

/// Edge of a shape a connector attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl AnchorSide {
    /// Enumeration order used for anchor generation
    pub const ORDER: [AnchorSide; 4] = [
        AnchorSide::Top,
        AnchorSide::Bottom,
        AnchorSide::Left,
        AnchorSide::Right,
    ];

    /// Unit vector pointing out of the shape
    pub fn normal(self) -> Point {
        match self {
            AnchorSide::Top => Point::new(0.0, -1.0),
            AnchorSide::Right => Point::new(1.0, 0.0),
            AnchorSide::Bottom => Point::new(0.0, 1.0),
            AnchorSide::Left => Point::new(-1.0, 0.0),
        }
    }

    /// Does a connector leave this side travelling horizontally?
    pub fn is_horizontal(self) -> bool {
        matches!(self, AnchorSide::Left | AnchorSide::Right)
    }

    /// Length of this side of `rect`
    pub fn length(self, rect: &Rect) -> f64 {
        if self.is_horizontal() {
            rect.height
        } else {
            rect.width
        }
    }
}

/// A concrete attachment point on a shape edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorPoint {
    pub element_id: String,
    pub side: AnchorSide,
    pub t: f64,
    pub x: f64,
    pub y: f64,
}

impl AnchorPoint {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The persistent reference for this anchor
    pub fn connection(&self) -> Connection {
        Connection::new(self.element_id.clone(), self.side, self.t)
    }
}

/// A connector endpoint's reference into a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub element_id: String,
    pub side: AnchorSide,
    pub t: f64,
}

impl Connection {
    pub fn new(element_id: impl Into<String>, side: AnchorSide, t: f64) -> Self {
        Self {
            element_id: element_id.into(),
            side,
            t,
        }
    }
}

/// Point at fraction `t` along `side` of `rect`, left-to-right or top-to-bottom.
///
/// `t` is clamped to `[0, 1]`.
pub fn side_point(rect: &Rect, side: AnchorSide, t: f64) -> Point {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    match side {
        AnchorSide::Top => Point::new(rect.x + rect.width * t, rect.y),
        AnchorSide::Bottom => Point::new(rect.x + rect.width * t, rect.bottom()),
        AnchorSide::Left => Point::new(rect.x, rect.y + rect.height * t),
        AnchorSide::Right => Point::new(rect.right(), rect.y + rect.height * t),
    }
}

/// Number of segments a side is divided into
fn segment_count(length: f64, grid: f64) -> usize {
    let count = (length / grid).floor();
    if count.is_finite() && count >= 1.0 {
        count as usize
    } else {
        1
    }
}

/// Every anchor position of `rect` as `(side, t, point)`, in generation order
fn anchor_positions(rect: Rect, grid: f64) -> impl Iterator<Item = (AnchorSide, f64, Point)> {
    AnchorSide::ORDER.into_iter().flat_map(move |side| {
        let count = segment_count(side.length(&rect), grid);
        (0..=count).map(move |i| {
            let t = i as f64 / count as f64;
            (side, t, side_point(&rect, side, t))
        })
    })
}

/// All anchors of a shape: top, bottom, left, right, corners included
pub fn anchors_for_shape(shape: &Shape, grid: f64) -> Vec<AnchorPoint> {
    anchor_positions(shape.bounds(), grid)
        .map(|(side, t, p)| AnchorPoint {
            element_id: shape.id.clone(),
            side,
            t,
            x: p.x,
            y: p.y,
        })
        .collect()
}

/// World position of a connection, `None` when the shape no longer exists
pub fn resolve_connection(shapes: &ShapeIndex<'_>, connection: &Connection) -> Option<Point> {
    let shape = shapes.get(&connection.element_id)?;
    Some(side_point(&shape.bounds(), connection.side, connection.t))
}

/// Closest anchor strictly within the snap radius of `(x, y)`.
///
/// Shapes whose box grown by the snap radius plus slack cannot contain the
/// point are skipped without generating anchors. Ties keep the first anchor
/// in shape-then-anchor order.
pub fn find_nearest_anchor(
    shapes: &ShapeIndex<'_>,
    x: f64,
    y: f64,
    exclude_id: Option<&str>,
    config: &RouterConfig,
) -> Option<AnchorPoint> {
    let cursor = Point::new(x, y);
    let reach = config.snap_radius + config.snap_slack;
    let mut best: Option<(f64, &Shape, AnchorSide, f64, Point)> = None;

    for shape in shapes.iter() {
        if exclude_id == Some(shape.id.as_str()) {
            continue;
        }
        let bounds = shape.bounds();
        if !bounds.inflate(reach).contains(cursor) {
            continue;
        }
        for (side, t, p) in anchor_positions(bounds, config.grid) {
            let d = p.distance(cursor);
            if d >= config.snap_radius {
                continue;
            }
            if best.as_ref().map_or(true, |(best_d, ..)| d < *best_d) {
                best = Some((d, shape, side, t, p));
            }
        }
    }

    let (distance, shape, side, t, p) = best?;
    tracing::debug!(element = %shape.id, ?side, t, distance, "snapped to anchor");
    Some(AnchorPoint {
        element_id: shape.id.clone(),
        side,
        t,
        x: p.x,
        y: p.y,
    })
}
