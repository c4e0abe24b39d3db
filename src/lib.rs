//! Ortho Connector - orthogonal connector routing for diagram canvases
//!
//! This library computes horizontal/vertical connector paths between shapes,
//! manages the anchor points connectors snap to, and keeps connectors
//! attached while shapes move.
//!
//! # Example
//!
//! ```rust
//! use ortho_connector::{compute_ortho_route, AnchorSide, Point, Rect};
//!
//! // Local space: the start anchor is the origin
//! let path = compute_ortho_route(
//!     300.0,
//!     0.0,
//!     Some(AnchorSide::Right),
//!     Some(AnchorSide::Left),
//!     Some(Rect::new(-100.0, -30.0, 100.0, 60.0)),
//!     Some(Rect::new(300.0, -30.0, 100.0, 60.0)),
//! );
//! assert_eq!(path, vec![Point::new(0.0, 0.0), Point::new(300.0, 0.0)]);
//! ```

pub mod anchor;
pub mod config;
pub mod element;
pub mod error;
pub mod geometry;
pub mod routing;
pub mod scene;
pub mod update;

pub use anchor::{anchors_for_shape, AnchorPoint, AnchorSide, Connection};
pub use config::{ConfigError, RouterConfig, GRID, SNAP_RADIUS};
pub use element::{Connector, ConnectorEnd, ConnectorKind, DrawingElement, Shape, ShapeIndex};
pub use error::SceneError;
pub use geometry::{Point, Rect};
pub use routing::{RouteRequest, Router};
pub use scene::Scene;
pub use update::{
    clear_connections_to, connect_endpoint, enforce_orthogonality, reroute_all,
    reroute_connector, simplify_ortho_points, ConnectorGeometry,
};

/// Route a connector in its local space with default configuration
///
/// `(dx, dy)` is the end point relative to the start point; the rectangles
/// are the start and end shape bodies in the same local space. The result
/// starts at the origin, ends at `(dx, dy)` and is orthogonal.
pub fn compute_ortho_route(
    dx: f64,
    dy: f64,
    start_side: Option<AnchorSide>,
    end_side: Option<AnchorSide>,
    start_rect: Option<Rect>,
    end_rect: Option<Rect>,
) -> Vec<Point> {
    compute_ortho_route_with_config(
        dx,
        dy,
        start_side,
        end_side,
        start_rect,
        end_rect,
        &RouterConfig::default(),
    )
}

/// Route a connector in its local space with custom configuration
pub fn compute_ortho_route_with_config(
    dx: f64,
    dy: f64,
    start_side: Option<AnchorSide>,
    end_side: Option<AnchorSide>,
    start_rect: Option<Rect>,
    end_rect: Option<Rect>,
    config: &RouterConfig,
) -> Vec<Point> {
    let request = RouteRequest {
        destination: Point::new(dx, dy),
        start_side,
        end_side,
        start_rect,
        end_rect,
        obstacles: Vec::new(),
    };
    Router::new(config.clone()).route(&request)
}

/// All anchors of a shape at the default grid density
pub fn get_anchors(shape: &Shape) -> Vec<AnchorPoint> {
    anchors_for_shape(shape, GRID)
}

/// World position of a connection, `None` when its shape is gone
pub fn resolve_anchor(elements: &[DrawingElement], connection: &Connection) -> Option<Point> {
    anchor::resolve_connection(&ShapeIndex::from_elements(elements), connection)
}

/// Nearest anchor within the default snap radius
pub fn find_nearest_anchor(
    elements: &[DrawingElement],
    x: f64,
    y: f64,
    exclude_id: Option<&str>,
) -> Option<AnchorPoint> {
    find_nearest_anchor_with_config(elements, x, y, exclude_id, &RouterConfig::default())
}

pub fn find_nearest_anchor_with_config(
    elements: &[DrawingElement],
    x: f64,
    y: f64,
    exclude_id: Option<&str>,
    config: &RouterConfig,
) -> Option<AnchorPoint> {
    anchor::find_nearest_anchor(&ShapeIndex::from_elements(elements), x, y, exclude_id, config)
}

/// Rebuild every connector attached to a moved shape with default configuration
///
/// Only connector fields are written. Returns the number of connectors rebuilt.
pub fn update_connected_arrows(elements: &mut [DrawingElement], moved_id: &str) -> usize {
    update::update_connected_arrows(elements, moved_id, &RouterConfig::default())
}

pub fn update_connected_arrows_with_config(
    elements: &mut [DrawingElement],
    moved_id: &str,
    config: &RouterConfig,
) -> usize {
    update::update_connected_arrows(elements, moved_id, config)
}
