//! Configuration for anchor generation and connector routing

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Spatial unit shared by anchor density and route margin
pub const GRID: f64 = 20.0;

/// Radius within which a cursor snaps onto an anchor
pub const SNAP_RADIUS: f64 = 20.0;

/// Errors that can occur when loading a router configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read router config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse router config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid router config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Configuration options for routing and anchor queries
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Anchor spacing along shape edges, and the clearance kept around
    /// obstacles. Antennas only land on rulers when both uses agree.
    pub grid: f64,

    /// Maximum distance (exclusive) between a cursor and a snapped anchor
    pub snap_radius: f64,

    /// Extra slack added to the snap radius for the bounding-box pre-check
    pub snap_slack: f64,

    /// Distance under which coordinates count as equal when simplifying
    pub tolerance: f64,

    /// Spots closer than this to a shape body are discarded
    pub obstacle_clearance: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            grid: GRID,
            snap_radius: SNAP_RADIUS,
            snap_slack: 10.0,
            tolerance: 0.5,
            obstacle_clearance: 1.0,
        }
    }
}

impl RouterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a configuration from a TOML string; missing keys keep defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: RouterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the router cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.is_nan() || self.grid <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "grid",
                reason: format!("must be positive, got {}", self.grid),
            });
        }
        for (field, value) in [
            ("snap_radius", self.snap_radius),
            ("snap_slack", self.snap_slack),
            ("tolerance", self.tolerance),
            ("obstacle_clearance", self.obstacle_clearance),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must not be negative, got {}", value),
                });
            }
        }
        Ok(())
    }

    /// Set the grid unit
    pub fn with_grid(mut self, grid: f64) -> Self {
        self.grid = grid;
        self
    }

    /// Set the snap radius
    pub fn with_snap_radius(mut self, radius: f64) -> Self {
        self.snap_radius = radius;
        self
    }

    /// Set the simplification tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the spot clearance around shape bodies
    pub fn with_obstacle_clearance(mut self, clearance: f64) -> Self {
        self.obstacle_clearance = clearance;
        self
    }
}
