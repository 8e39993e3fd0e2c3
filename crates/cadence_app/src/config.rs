//! Headless run configuration (cadence.toml)

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for deterministic headless frame execution
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HeadlessRunConfig {
    /// Logical milliseconds between frames
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
    /// Maximum number of frames to deliver
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,
    /// End the run as soon as no animation is active
    #[serde(default = "default_true")]
    pub stop_when_idle: bool,
}

fn default_frame_ms() -> f64 {
    16.666
}

fn default_max_frames() -> u32 {
    120
}

fn default_true() -> bool {
    true
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            frame_ms: default_frame_ms(),
            max_frames: default_max_frames(),
            stop_when_idle: true,
        }
    }
}

impl HeadlessRunConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: HeadlessRunConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.frame_ms.is_finite() || self.frame_ms <= 0.0 {
            return Err(ConfigError::InvalidFrameInterval(self.frame_ms));
        }
        if self.max_frames == 0 {
            return Err(ConfigError::ZeroFrameBudget);
        }
        Ok(())
    }
}
