//! Host configuration errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Frame interval must be a finite, positive number of milliseconds
    #[error("Invalid frame interval: {0} ms (must be finite and positive)")]
    InvalidFrameInterval(f64),

    /// A run needs at least one frame
    #[error("Frame budget must be greater than zero")]
    ZeroFrameBudget,
}

/// Result type for host configuration
pub type Result<T> = std::result::Result<T, ConfigError>;
