//! Error types for scene documents and element lookups

use thiserror::Error;

/// Errors from loading, saving or editing a drawing
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to write scene TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No element carries the requested id
    #[error("no element with id '{id}'")]
    UnknownElement { id: String },

    #[error("element '{id}' is not a connector")]
    NotAConnector { id: String },

    #[error("element '{id}' is not a shape")]
    NotAShape { id: String },

    /// Two elements share an id, so connections would be ambiguous
    #[error("duplicate element id '{id}'")]
    DuplicateId { id: String },
}

impl SceneError {
    pub fn unknown(id: impl Into<String>) -> Self {
        Self::UnknownElement { id: id.into() }
    }

    /// The element id the error is about, if any
    pub fn element_id(&self) -> Option<&str> {
        match self {
            Self::UnknownElement { id }
            | Self::NotAConnector { id }
            | Self::NotAShape { id }
            | Self::DuplicateId { id } => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_element_display() {
        let err = SceneError::unknown("arrow-7");
        assert_eq!(err.to_string(), "no element with id 'arrow-7'");
        assert_eq!(err.element_id(), Some("arrow-7"));
    }

    #[test]
    fn test_io_error_has_no_element() {
        let err = SceneError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(err.to_string().contains("failed to read scene"));
        assert!(err.element_id().is_none());
    }
}
