//! Configuration for the overlay engine.

use crate::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Enable-flag polling interval in milliseconds (default: 50)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Visual style tag applied to indent markers
    #[serde(default = "default_style")]
    pub style: String,
}

fn default_poll_interval_ms() -> u64 {
    50
}

fn default_style() -> String {
    "vindent.indent".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            style: default_style(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file
    pub fn load_from(path: &Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Polling interval as a `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
