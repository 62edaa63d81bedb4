//! Probe settings

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 60 FPS frame budget in milliseconds.
pub const DEFAULT_MAX_FRAME_TIME_MS: f64 = 16.67;
pub const DEFAULT_WINDOW_CAPACITY: usize = 60;
pub const DEFAULT_STEP_VERTICES: u32 = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_frame_time_ms must be a positive finite number, got {0}")]
    InvalidBudget(f64),

    #[error("window_capacity must be at least 1")]
    ZeroWindow,

    #[error("step_vertices must be at least 1")]
    ZeroStep,

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Probe thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Frame time above which the probe stops growing the workload.
    pub max_frame_time_ms: f64,
    /// Samples per sliding window, for both the baseline and the load phase.
    pub window_capacity: usize,
    /// Vertices added per step; also the size of the first workload.
    pub step_vertices: u32,
    /// Seed for workload geometry. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_frame_time_ms: DEFAULT_MAX_FRAME_TIME_MS,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            step_vertices: DEFAULT_STEP_VERTICES,
            seed: None,
        }
    }
}

impl ProbeConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_frame_time_ms.is_finite() || self.max_frame_time_ms <= 0.0 {
            return Err(ConfigError::InvalidBudget(self.max_frame_time_ms));
        }
        if self.window_capacity == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.step_vertices == 0 {
            return Err(ConfigError::ZeroStep);
        }
        Ok(())
    }
}
