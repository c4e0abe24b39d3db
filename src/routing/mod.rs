//! Orthogonal route construction
//!
//! A route is computed in the connector's local space, where the start
//! endpoint is the origin. The pipeline:
//!
//! 1. extrude an antenna out of each known side
//! 2. derive rulers from inflated obstacle edges and antenna coordinates
//! 3. place spots on ruler intersections and cell midpoints, off obstacles
//! 4. link neighboring spots unless an obstacle body sits between them
//! 5. search the cheapest route between antennas, penalizing bends
//! 6. join origin, antennas, route and destination, then simplify

pub mod graph;
pub mod rulers;
pub mod simplify;
pub mod spots;

pub use graph::{bend_penalty, Axis, Graph};
pub use rulers::{antenna, Rulers};
pub use simplify::{dedup_points, enforce_orthogonal, is_orthogonal, simplify_points};
pub use spots::SpotKey;

use crate::anchor::AnchorSide;
use crate::config::RouterConfig;
use crate::geometry::{Point, Rect};

impl AnchorSide {
    /// Axis a connector travels on when leaving this side
    pub fn axis(self) -> Axis {
        if self.is_horizontal() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }
}

/// Input of a single route computation, in connector-local coordinates
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteRequest {
    /// End point relative to the start point
    pub destination: Point,
    pub start_side: Option<AnchorSide>,
    pub end_side: Option<AnchorSide>,
    /// Body of the start shape
    pub start_rect: Option<Rect>,
    /// Body of the end shape
    pub end_rect: Option<Rect>,
    /// Additional bodies the route must not cross
    pub obstacles: Vec<Rect>,
}

impl RouteRequest {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self {
            destination: Point::new(dx, dy),
            ..Self::default()
        }
    }

    pub fn with_start(mut self, side: AnchorSide, rect: Option<Rect>) -> Self {
        self.start_side = Some(side);
        self.start_rect = rect;
        self
    }

    pub fn with_end(mut self, side: AnchorSide, rect: Option<Rect>) -> Self {
        self.end_side = Some(side);
        self.end_rect = rect;
        self
    }

    pub fn with_obstacle(mut self, rect: Rect) -> Self {
        self.obstacles.push(rect);
        self
    }

    fn bodies(&self) -> Vec<Rect> {
        self.start_rect
            .iter()
            .chain(self.end_rect.iter())
            .chain(self.obstacles.iter())
            .map(Rect::normalized)
            .collect()
    }
}

/// Computes orthogonal connector paths
#[derive(Debug, Clone, Default)]
pub struct Router {
    config: RouterConfig,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Route from the local origin to `request.destination`.
    ///
    /// The result starts at the origin, ends at the destination, has at
    /// least two points and only axis-aligned segments. It is a pure
    /// function of the request and the configuration.
    pub fn route(&self, request: &RouteRequest) -> Vec<Point> {
        let origin = Point::origin();
        let destination = request.destination;

        if request.start_side.is_none() && request.end_side.is_none() {
            tracing::debug!(
                dx = destination.x,
                dy = destination.y,
                "no sides known, using elbow route"
            );
            return self.finish(elbow(origin, destination, true));
        }

        let margin = self.config.grid;
        let a1 = antenna(origin, request.start_side, margin);
        let a2 = antenna(destination, request.end_side, margin);
        let bodies = request.bodies();
        let inflated: Vec<Rect> = bodies.iter().map(|r| r.inflate(margin)).collect();

        let rulers = Rulers::build(origin, destination, [a1, a2], &inflated, margin);
        let spot_set = spots::generate(&rulers, [a1, a2], &bodies, self.config.obstacle_clearance);
        let graph = Graph::build(&spot_set, &bodies);
        tracing::debug!(
            dx = destination.x,
            dy = destination.y,
            start_side = ?request.start_side,
            end_side = ?request.end_side,
            spots = graph.node_count(),
            edges = graph.edge_count(),
            "routing connector"
        );

        let first_leg_horizontal = request
            .start_side
            .map_or(true, |side| side.is_horizontal());
        let search = match (graph.node(SpotKey::of(a1)), graph.node(SpotKey::of(a2))) {
            (Some(from), Some(to)) => graph
                .shortest_path(
                    from,
                    to,
                    request.start_side.map(AnchorSide::axis),
                    request.end_side.map(AnchorSide::axis),
                    margin,
                )
                .unwrap_or_else(|| {
                    tracing::debug!("antennas not connected, using elbow between them");
                    elbow(a1, a2, first_leg_horizontal)
                }),
            _ => {
                tracing::debug!("antenna outside spot set, using elbow between them");
                elbow(a1, a2, first_leg_horizontal)
            }
        };

        let mut path = Vec::with_capacity(search.len() + 4);
        path.push(origin);
        path.push(a1);
        path.extend(search);
        path.push(a2);
        path.push(destination);
        self.finish(path)
    }

    fn finish(&self, path: Vec<Point>) -> Vec<Point> {
        let tolerance = self.config.tolerance;
        let mut path = simplify_points(&path, tolerance);
        enforce_orthogonal(&mut path, tolerance);
        simplify_points(&path, tolerance)
    }
}

/// Single-bend path from `a` to `b`
fn elbow(a: Point, b: Point, horizontal_first: bool) -> Vec<Point> {
    let corner = if horizontal_first {
        Point::new(b.x, a.y)
    } else {
        Point::new(a.x, b.y)
    };
    vec![a, corner, b]
}
