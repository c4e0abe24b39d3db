//! Keeping connectors attached to the shapes they reference
//!
//! Every operation here runs in two phases. Planning reads the drawing
//! through a shared borrow and produces owned [`ConnectorGeometry`] values;
//! applying takes the exclusive borrow and writes only connector fields.
//! Shapes are never written.

use crate::anchor::{find_nearest_anchor, side_point, AnchorPoint, Connection};
use crate::config::RouterConfig;
use crate::element::{Connector, ConnectorEnd, DrawingElement, Shape, ShapeIndex};
use crate::error::SceneError;
use crate::geometry::Point;
use crate::routing::{enforce_orthogonal, simplify_points, RouteRequest, Router};

/// Recomputed placement of a connector
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub points: Vec<Point>,
}

impl ConnectorGeometry {
    pub fn apply(self, connector: &mut Connector) {
        connector.x = self.x;
        connector.y = self.y;
        connector.width = self.width;
        connector.height = self.height;
        connector.points = self.points;
    }
}

/// The live shape behind a connection, if it still exists
fn attached<'a, 'c>(
    shapes: &ShapeIndex<'a>,
    connection: Option<&'c Connection>,
) -> Option<(&'c Connection, &'a Shape)> {
    let connection = connection?;
    shapes
        .get(&connection.element_id)
        .map(|shape| (connection, shape))
}

/// Rebuild a connector from its connections and the current shapes.
///
/// Unresolved connections fall back to the connector's previous absolute
/// endpoint. Orthogonal connectors are always routed from scratch; simple
/// arrows only move their first and last points.
pub fn plan_connector(
    connector: &Connector,
    shapes: &ShapeIndex<'_>,
    router: &Router,
) -> ConnectorGeometry {
    let start_attachment = attached(shapes, connector.start_connection.as_ref());
    let end_attachment = attached(shapes, connector.end_connection.as_ref());

    let start = start_attachment
        .map(|(c, s)| side_point(&s.bounds(), c.side, c.t))
        .unwrap_or_else(|| connector.start_point());
    let end = end_attachment
        .map(|(c, s)| side_point(&s.bounds(), c.side, c.t))
        .unwrap_or_else(|| connector.end_point());
    let delta = end - start;

    let points = if connector.is_orthogonal() {
        let to_local = |shape: &Shape| shape.bounds().translate(-start.x, -start.y);
        let mut request = RouteRequest::new(delta.x, delta.y);
        if let Some((c, shape)) = start_attachment {
            request = request.with_start(c.side, Some(to_local(shape)));
        }
        if let Some((c, shape)) = end_attachment {
            request = request.with_end(c.side, Some(to_local(shape)));
        }
        router.route(&request)
    } else {
        let shift = connector.origin() - start;
        let mut points: Vec<Point> = connector.points.iter().map(|p| *p + shift).collect();
        if points.len() < 2 {
            points = vec![Point::origin(), delta];
        } else {
            let last = points.len() - 1;
            points[0] = Point::origin();
            points[last] = delta;
        }
        points
    };

    ConnectorGeometry {
        x: start.x,
        y: start.y,
        width: delta.x.abs(),
        height: delta.y.abs(),
        points,
    }
}

fn plan_where(
    elements: &[DrawingElement],
    config: &RouterConfig,
    mut select: impl FnMut(&Connector) -> bool,
) -> Vec<(usize, ConnectorGeometry)> {
    let shapes = ShapeIndex::from_elements(elements);
    let router = Router::new(config.clone());
    elements
        .iter()
        .enumerate()
        .filter_map(|(i, e)| e.as_connector().map(|c| (i, c)))
        .filter(|(_, c)| select(c))
        .map(|(i, c)| (i, plan_connector(c, &shapes, &router)))
        .collect()
}

fn apply_plans(elements: &mut [DrawingElement], plans: Vec<(usize, ConnectorGeometry)>) -> usize {
    let count = plans.len();
    for (i, geometry) in plans {
        if let Some(connector) = elements[i].as_connector_mut() {
            geometry.apply(connector);
        }
    }
    count
}

/// Rebuild every connector attached to `moved_id`; returns how many changed
pub fn update_connected_arrows(
    elements: &mut [DrawingElement],
    moved_id: &str,
    config: &RouterConfig,
) -> usize {
    let plans = plan_where(elements, config, |c| c.references(moved_id));
    tracing::debug!(moved = moved_id, connectors = plans.len(), "rebuilding attached connectors");
    apply_plans(elements, plans)
}

/// Rebuild every connector in the drawing
pub fn reroute_all(elements: &mut [DrawingElement], config: &RouterConfig) -> usize {
    let plans = plan_where(elements, config, |_| true);
    tracing::debug!(connectors = plans.len(), "rebuilding all connectors");
    apply_plans(elements, plans)
}

fn connector_index(elements: &[DrawingElement], id: &str) -> Result<usize, SceneError> {
    let index = elements
        .iter()
        .position(|e| e.id() == id)
        .ok_or_else(|| SceneError::unknown(id))?;
    match elements[index] {
        DrawingElement::Connector(_) => Ok(index),
        DrawingElement::Shape(_) => Err(SceneError::NotAConnector { id: id.to_string() }),
    }
}

/// Rebuild a single connector, e.g. after the connector itself was dragged
pub fn reroute_connector(
    elements: &mut [DrawingElement],
    connector_id: &str,
    config: &RouterConfig,
) -> Result<(), SceneError> {
    let index = connector_index(elements, connector_id)?;
    let geometry = {
        let shapes = ShapeIndex::from_elements(elements);
        elements[index]
            .as_connector()
            .map(|c| plan_connector(c, &shapes, &Router::new(config.clone())))
    };
    if let (Some(geometry), Some(connector)) = (geometry, elements[index].as_connector_mut()) {
        geometry.apply(connector);
    }
    Ok(())
}

/// Drop one end of a connector at a world point.
///
/// Snaps to the nearest anchor within the snap radius, skipping the shape
/// the opposite end is attached to. A snap stores the connection, a miss
/// clears it and leaves the endpoint where it was dropped. The connector is
/// rebuilt either way. Returns the anchor snapped to.
pub fn connect_endpoint(
    elements: &mut [DrawingElement],
    connector_id: &str,
    end: ConnectorEnd,
    point: Point,
    config: &RouterConfig,
) -> Result<Option<AnchorPoint>, SceneError> {
    let index = connector_index(elements, connector_id)?;
    let anchor = {
        let shapes = ShapeIndex::from_elements(elements);
        let exclude = elements[index]
            .as_connector()
            .and_then(|c| c.connection(end.opposite()))
            .map(|c| c.element_id.as_str());
        find_nearest_anchor(&shapes, point.x, point.y, exclude, config)
    };

    if let Some(connector) = elements[index].as_connector_mut() {
        *connector.connection_mut(end) = anchor.as_ref().map(AnchorPoint::connection);
        let target = anchor.as_ref().map_or(point, AnchorPoint::position);
        connector.set_endpoint(end, target);
    }
    reroute_connector(elements, connector_id, config)?;
    Ok(anchor)
}

/// Forget every connection to a deleted element; returns how many were cleared.
///
/// Connectors keep their absolute endpoints.
pub fn clear_connections_to(elements: &mut [DrawingElement], deleted_id: &str) -> usize {
    let mut cleared = 0;
    for connector in elements.iter_mut().filter_map(DrawingElement::as_connector_mut) {
        for end in [ConnectorEnd::Start, ConnectorEnd::End] {
            let slot = connector.connection_mut(end);
            if slot.as_ref().is_some_and(|c| c.element_id == deleted_id) {
                *slot = None;
                cleared += 1;
            }
        }
    }
    cleared
}

/// Remove collinear and duplicate waypoints from an edited connector
pub fn simplify_ortho_points(connector: &mut Connector, config: &RouterConfig) {
    connector.points = simplify_points(&connector.points, config.tolerance);
    sync_extent(connector);
}

/// Snap near-diagonal segments of an edited connector back to the axes.
///
/// The last point may move, so `width`/`height` follow it.
pub fn enforce_orthogonality(connector: &mut Connector, config: &RouterConfig) {
    enforce_orthogonal(&mut connector.points, config.tolerance);
    sync_extent(connector);
}

fn sync_extent(connector: &mut Connector) {
    let delta = connector.end_point() - connector.start_point();
    connector.width = delta.x.abs();
    connector.height = delta.y.abs();
}
