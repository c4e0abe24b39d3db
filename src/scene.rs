//! Scene documents
//!
//! A scene is a TOML list of drawing elements:
//!
//! ```toml
//! [[elements]]
//! type = "shape"
//! id = "a"
//! x = 0.0
//! y = 0.0
//! width = 100.0
//! height = 60.0
//!
//! [[elements]]
//! type = "connector"
//! id = "a-b"
//! x = 100.0
//! y = 30.0
//! start_connection = { element_id = "a", side = "right", t = 0.5 }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::anchor::{find_nearest_anchor, AnchorPoint};
use crate::config::RouterConfig;
use crate::element::{ConnectorEnd, DrawingElement, ShapeIndex};
use crate::error::SceneError;
use crate::geometry::Point;
use crate::update;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub elements: Vec<DrawingElement>,
}

impl Scene {
    pub fn new(elements: Vec<DrawingElement>) -> Result<Self, SceneError> {
        let scene = Self { elements };
        scene.check_ids()?;
        Ok(scene)
    }

    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, SceneError> {
        let scene: Scene = toml::from_str(content)?;
        scene.check_ids()?;
        Ok(scene)
    }

    pub fn to_toml(&self) -> Result<String, SceneError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn check_ids(&self) -> Result<(), SceneError> {
        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            if !seen.insert(element.id()) {
                return Err(SceneError::DuplicateId {
                    id: element.id().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn shapes(&self) -> ShapeIndex<'_> {
        ShapeIndex::from_elements(&self.elements)
    }

    /// Rebuild connectors attached to a shape that was moved or resized
    pub fn shape_moved(&mut self, shape_id: &str, config: &RouterConfig) -> usize {
        update::update_connected_arrows(&mut self.elements, shape_id, config)
    }

    /// Translate a shape and rebuild everything attached to it
    pub fn move_shape(
        &mut self,
        shape_id: &str,
        dx: f64,
        dy: f64,
        config: &RouterConfig,
    ) -> Result<usize, SceneError> {
        let element = self
            .elements
            .iter_mut()
            .find(|e| e.id() == shape_id)
            .ok_or_else(|| SceneError::unknown(shape_id))?;
        let DrawingElement::Shape(shape) = element else {
            return Err(SceneError::NotAShape {
                id: shape_id.to_string(),
            });
        };
        shape.x += dx;
        shape.y += dy;
        Ok(self.shape_moved(shape_id, config))
    }

    /// Delete an element, detaching every connector that referenced it
    pub fn remove(&mut self, id: &str) -> Result<DrawingElement, SceneError> {
        let index = self
            .elements
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| SceneError::unknown(id))?;
        let removed = self.elements.remove(index);
        update::clear_connections_to(&mut self.elements, id);
        Ok(removed)
    }

    pub fn reroute_all(&mut self, config: &RouterConfig) -> usize {
        update::reroute_all(&mut self.elements, config)
    }

    pub fn connect_endpoint(
        &mut self,
        connector_id: &str,
        end: ConnectorEnd,
        point: Point,
        config: &RouterConfig,
    ) -> Result<Option<AnchorPoint>, SceneError> {
        update::connect_endpoint(&mut self.elements, connector_id, end, point, config)
    }

    pub fn nearest_anchor(
        &self,
        x: f64,
        y: f64,
        exclude_id: Option<&str>,
        config: &RouterConfig,
    ) -> Option<AnchorPoint> {
        find_nearest_anchor(&self.shapes(), x, y, exclude_id, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::AnchorSide;

    const TWO_BOXES: &str = r#"
[[elements]]
type = "shape"
id = "a"
x = 0
y = 0
width = 100
height = 60

[[elements]]
type = "shape"
id = "b"
x = 400
y = 0
width = 100
height = 60

[[elements]]
type = "connector"
id = "a-b"
x = 100
y = 30
points = [{ x = 0, y = 0 }, { x = 300, y = 0 }]
start_connection = { element_id = "a", side = "right", t = 0.5 }
end_connection = { element_id = "b", side = "left", t = 0.5 }
"#;

    #[test]
    fn test_parse_scene() {
        let scene = Scene::from_str(TWO_BOXES).unwrap();
        assert_eq!(scene.elements.len(), 3);
        assert_eq!(scene.shapes().len(), 2);
        let c = scene.elements[2].as_connector().unwrap();
        assert!(c.is_orthogonal());
        assert_eq!(c.start_connection.as_ref().map(|c| c.side), Some(AnchorSide::Right));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let doc = r#"
[[elements]]
type = "shape"
id = "a"
x = 0
y = 0
width = 10
height = 10

[[elements]]
type = "shape"
id = "a"
x = 50
y = 0
width = 10
height = 10
"#;
        let err = Scene::from_str(doc).unwrap_err();
        assert!(matches!(err, SceneError::DuplicateId { ref id } if id == "a"));
    }

    #[test]
    fn test_unknown_type_is_parse_error() {
        let doc = "[[elements]]\ntype = \"blob\"\nid = \"x\"\n";
        assert!(matches!(Scene::from_str(doc), Err(SceneError::Parse(_))));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut scene = Scene::from_str(TWO_BOXES).unwrap();
        scene.move_shape("b", 0.0, 80.0, &RouterConfig::default()).unwrap();
        let text = scene.to_toml().unwrap();
        let reparsed = Scene::from_str(&text).unwrap();
        assert_eq!(reparsed, scene);
    }

    #[test]
    fn test_move_shape_errors() {
        let mut scene = Scene::from_str(TWO_BOXES).unwrap();
        let config = RouterConfig::default();
        assert!(matches!(
            scene.move_shape("zzz", 1.0, 1.0, &config),
            Err(SceneError::UnknownElement { .. })
        ));
        assert!(matches!(
            scene.move_shape("a-b", 1.0, 1.0, &config),
            Err(SceneError::NotAShape { .. })
        ));
    }

    #[test]
    fn test_remove_detaches_connectors() {
        let mut scene = Scene::from_str(TWO_BOXES).unwrap();
        let removed = scene.remove("b").unwrap();
        assert_eq!(removed.id(), "b");
        let c = scene.elements[1].as_connector().unwrap();
        assert!(c.end_connection.is_none());
        assert_eq!(c.end_point(), Point::new(400.0, 30.0));
    }

    #[test]
    fn test_nearest_anchor_in_scene() {
        let scene = Scene::from_str(TWO_BOXES).unwrap();
        let config = RouterConfig::default();
        let anchor = scene.nearest_anchor(52.0, -6.0, None, &config).unwrap();
        assert_eq!(anchor.element_id, "a");
        assert_eq!(anchor.side, AnchorSide::Top);
        assert!(scene.nearest_anchor(52.0, -6.0, Some("a"), &config).is_none());
    }
}
