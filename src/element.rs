//! Drawing elements the router reads from and writes to

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::anchor::Connection;
use crate::geometry::{Point, Rect};

/// A shape on the canvas; routing only ever reads it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Shape {
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// The shape body as a normalized world-space rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height).normalized()
    }
}

/// How a connector's points are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectorKind {
    /// Straight segments through user-placed points
    Arrow,
    /// Horizontal/vertical segments computed by the router
    #[default]
    OrthoArrow,
}

/// One of the two ends of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorEnd {
    Start,
    End,
}

impl ConnectorEnd {
    pub fn opposite(self) -> ConnectorEnd {
        match self {
            ConnectorEnd::Start => ConnectorEnd::End,
            ConnectorEnd::End => ConnectorEnd::Start,
        }
    }
}

/// A connector element. `points` are local to `(x, y)` and start at the origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub kind: ConnectorKind,
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_connection: Option<Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_connection: Option<Connection>,
}

impl Connector {
    /// Create an unconnected connector between two world points
    pub fn between(id: impl Into<String>, kind: ConnectorKind, start: Point, end: Point) -> Self {
        let delta = end - start;
        Self {
            id: id.into(),
            x: start.x,
            y: start.y,
            width: delta.x.abs(),
            height: delta.y.abs(),
            kind,
            points: vec![Point::origin(), delta],
            start_connection: None,
            end_connection: None,
        }
    }

    pub fn with_start_connection(mut self, connection: Connection) -> Self {
        self.start_connection = Some(connection);
        self
    }

    pub fn with_end_connection(mut self, connection: Connection) -> Self {
        self.end_connection = Some(connection);
        self
    }

    pub fn is_orthogonal(&self) -> bool {
        self.kind == ConnectorKind::OrthoArrow
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Absolute position of the first point
    pub fn start_point(&self) -> Point {
        let first = self.points.first().copied().unwrap_or_default();
        self.origin().offset(first.x, first.y)
    }

    /// Absolute position of the last point
    pub fn end_point(&self) -> Point {
        let last = self.points.last().copied().unwrap_or_default();
        self.origin().offset(last.x, last.y)
    }

    pub fn endpoint(&self, end: ConnectorEnd) -> Point {
        match end {
            ConnectorEnd::Start => self.start_point(),
            ConnectorEnd::End => self.end_point(),
        }
    }

    /// Move one endpoint to a world position. Interior points keep their
    /// world position; moving the start re-bases the local space on it.
    pub fn set_endpoint(&mut self, end: ConnectorEnd, world: Point) {
        if self.points.len() < 2 {
            let other = self.endpoint(end.opposite());
            let (start, finish) = match end {
                ConnectorEnd::Start => (world, other),
                ConnectorEnd::End => (other, world),
            };
            self.x = start.x;
            self.y = start.y;
            self.points = vec![Point::origin(), finish - start];
            return;
        }
        match end {
            ConnectorEnd::Start => {
                let shift = self.origin() - world;
                for p in &mut self.points {
                    *p = *p + shift;
                }
                self.points[0] = Point::origin();
                self.x = world.x;
                self.y = world.y;
            }
            ConnectorEnd::End => {
                let last = self.points.len() - 1;
                self.points[last] = world - self.origin();
            }
        }
    }

    pub fn connection(&self, end: ConnectorEnd) -> Option<&Connection> {
        match end {
            ConnectorEnd::Start => self.start_connection.as_ref(),
            ConnectorEnd::End => self.end_connection.as_ref(),
        }
    }

    pub fn connection_mut(&mut self, end: ConnectorEnd) -> &mut Option<Connection> {
        match end {
            ConnectorEnd::Start => &mut self.start_connection,
            ConnectorEnd::End => &mut self.end_connection,
        }
    }

    /// Is either end attached to the given element?
    pub fn references(&self, element_id: &str) -> bool {
        [&self.start_connection, &self.end_connection]
            .into_iter()
            .flatten()
            .any(|c| c.element_id == element_id)
    }
}

/// An element of the drawing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DrawingElement {
    Shape(Shape),
    Connector(Connector),
}

impl DrawingElement {
    pub fn id(&self) -> &str {
        match self {
            DrawingElement::Shape(s) => &s.id,
            DrawingElement::Connector(c) => &c.id,
        }
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            DrawingElement::Shape(s) => Some(s),
            DrawingElement::Connector(_) => None,
        }
    }

    pub fn as_connector(&self) -> Option<&Connector> {
        match self {
            DrawingElement::Connector(c) => Some(c),
            DrawingElement::Shape(_) => None,
        }
    }

    pub fn as_connector_mut(&mut self) -> Option<&mut Connector> {
        match self {
            DrawingElement::Connector(c) => Some(c),
            DrawingElement::Shape(_) => None,
        }
    }
}

impl From<Shape> for DrawingElement {
    fn from(shape: Shape) -> Self {
        DrawingElement::Shape(shape)
    }
}

impl From<Connector> for DrawingElement {
    fn from(connector: Connector) -> Self {
        DrawingElement::Connector(connector)
    }
}

/// Shapes of a drawing, filtered once and looked up by id.
///
/// Enumeration order follows the element order it was built from.
#[derive(Debug, Clone, Default)]
pub struct ShapeIndex<'a> {
    shapes: Vec<&'a Shape>,
    by_id: HashMap<&'a str, &'a Shape>,
}

impl<'a> ShapeIndex<'a> {
    pub fn from_elements(elements: &'a [DrawingElement]) -> Self {
        Self::collect(elements.iter().filter_map(DrawingElement::as_shape))
    }

    pub fn from_shapes(shapes: &'a [Shape]) -> Self {
        Self::collect(shapes.iter())
    }

    fn collect(iter: impl Iterator<Item = &'a Shape>) -> Self {
        let shapes: Vec<&'a Shape> = iter.collect();
        let mut by_id = HashMap::with_capacity(shapes.len());
        for shape in &shapes {
            // First shape wins on duplicate ids, matching enumeration order
            by_id.entry(shape.id.as_str()).or_insert(*shape);
        }
        Self { shapes, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Shape> {
        self.by_id.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Shape> + '_ {
        self.shapes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::AnchorSide;

    fn sample_elements() -> Vec<DrawingElement> {
        vec![
            Shape::new("a", 0.0, 0.0, 100.0, 60.0).into(),
            Connector::between(
                "c",
                ConnectorKind::OrthoArrow,
                Point::new(100.0, 30.0),
                Point::new(300.0, 30.0),
            )
            .with_start_connection(Connection::new("a", AnchorSide::Right, 0.5))
            .into(),
            Shape::new("b", 300.0, 0.0, 100.0, 60.0).into(),
        ]
    }

    #[test]
    fn test_shape_bounds_normalized() {
        let shape = Shape::new("s", 50.0, 50.0, -20.0, 10.0);
        assert_eq!(shape.bounds(), Rect::new(30.0, 50.0, 20.0, 10.0));
    }

    #[test]
    fn test_connector_between() {
        let c = Connector::between(
            "c",
            ConnectorKind::Arrow,
            Point::new(10.0, 20.0),
            Point::new(-30.0, 50.0),
        );
        assert_eq!(c.points, vec![Point::origin(), Point::new(-40.0, 30.0)]);
        assert_eq!(c.width, 40.0);
        assert_eq!(c.height, 30.0);
        assert_eq!(c.end_point(), Point::new(-30.0, 50.0));
    }

    #[test]
    fn test_connector_references() {
        let elements = sample_elements();
        let c = elements[1].as_connector().unwrap();
        assert!(c.references("a"));
        assert!(!c.references("b"));
    }

    #[test]
    fn test_shape_index_filters_connectors() {
        let elements = sample_elements();
        let index = ShapeIndex::from_elements(&elements);
        assert_eq!(index.len(), 2);
        assert!(index.get("c").is_none());
        assert_eq!(index.get("b").map(|s| s.x), Some(300.0));
        let ids: Vec<&str> = index.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_set_start_keeps_interior_in_world_space() {
        let mut c = Connector::between(
            "c",
            ConnectorKind::Arrow,
            Point::new(0.0, 0.0),
            Point::new(100.0, 100.0),
        );
        c.points.insert(1, Point::new(50.0, 0.0));
        c.set_endpoint(ConnectorEnd::Start, Point::new(10.0, 20.0));
        assert_eq!(c.origin(), Point::new(10.0, 20.0));
        assert_eq!(c.points[0], Point::origin());
        assert_eq!(c.points[1], Point::new(40.0, -20.0));
        assert_eq!(c.end_point(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_set_end_on_empty_points() {
        let mut c = Connector::between("c", ConnectorKind::Arrow, Point::origin(), Point::origin());
        c.points.clear();
        c.set_endpoint(ConnectorEnd::End, Point::new(30.0, 40.0));
        assert_eq!(c.points, vec![Point::origin(), Point::new(30.0, 40.0)]);
    }

    #[test]
    fn test_connector_end_opposite() {
        assert_eq!(ConnectorEnd::Start.opposite(), ConnectorEnd::End);
        assert_eq!(ConnectorEnd::End.opposite(), ConnectorEnd::Start);
    }
}
