//! File-based configuration.
//!
//! The session itself needs very little configuration; most of the file
//! format drives the demo binary. Loaded from TOML with validation.

use crate::device::{DeviceKind, FlashMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a capture session.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Which camera to bind during setup.
    #[serde(default)]
    pub device_kind: DeviceKind,
}

/// Configuration for the demo binary's scripted run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Whether the simulated authorization prompt grants access.
    pub grant: bool,
    /// Number of still captures to request.
    pub captures: u32,
    /// Width of the synthetic capture buffers.
    pub frame_width: u32,
    /// Height of the synthetic capture buffers.
    pub frame_height: u32,
    /// Flash mode to apply once the session is running.
    pub flash: FlashMode,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            grant: true,
            captures: 3,
            frame_width: 64,
            frame_height: 48,
            flash: FlashMode::Auto,
        }
    }
}

/// Configuration validation and loading errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("frame dimensions must be non-zero")]
    InvalidDimensions,
    #[error("capture count too large (max 1000)")]
    TooManyCaptures,
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// `[session]` table.
    #[serde(default)]
    pub session: SessionConfig,
    /// `[demo]` table.
    #[serde(default)]
    pub demo: DemoConfig,
}

impl FileConfig {
    /// Validates the demo parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.demo.frame_width == 0 || self.demo.frame_height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.demo.captures > 1000 {
            return Err(ConfigError::TooManyCaptures);
        }
        Ok(())
    }

    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
