//! Engine configuration
//!
//! Immutable values threaded into every operation. The binary can load
//! overrides from a YAML file; library callers construct the struct
//! directly.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Community detection resolution
    pub resolution: f64,

    /// Animated transition length in milliseconds
    pub animation_duration_ms: u64,

    /// Tick interval for animations and simulations, in milliseconds
    pub tick_interval_ms: u64,

    /// Search terms shorter than this clear highlights instead of matching
    pub search_min_length: usize,

    /// Parent category whose notes count as person nodes
    pub person_category: String,

    /// Node size to circle radius multiplier for overlap removal
    pub noverlap_radius_ratio: f64,

    /// Extra spacing required between circle borders
    pub noverlap_margin: f64,

    /// Residual overlap below which overlap removal stops
    pub noverlap_tolerance: f64,

    /// Entries kept in the hub/authority ranking
    pub centrality_top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            animation_duration_ms: 2000,
            tick_interval_ms: 16,
            search_min_length: crate::interact::MIN_SEARCH_LEN,
            person_category: "People".to_string(),
            noverlap_radius_ratio: 5.0,
            noverlap_margin: 1.0,
            noverlap_tolerance: 0.1,
            centrality_top_k: 25,
        }
    }
}

impl EngineConfig {
    /// Load a config file, falling back to defaults for absent keys.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
