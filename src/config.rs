//! Configuration for the proctoring engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the engine process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server binds to
    pub host: String,

    /// Port the HTTP server binds to (0 for random)
    pub port: u16,

    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,

    /// Settings for the built-in face detector
    pub detector: DetectorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8001,
            log_level: "info".to_string(),
            detector: DetectorConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it is missing.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("proctoring-engine")
            .join("config.json")
    }
}

/// Tuning for the skin-region face detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Smallest face side length reported, in pixels
    pub min_face_size: u32,
    /// Side length of the square cells pixels are pooled into
    pub cell_size: u32,
    /// Share of a cell's pixels that must be skin-toned
    pub cell_skin_ratio: f64,
    /// Share of a region's bounding box that must be skin cells
    pub min_fill_ratio: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_face_size: 80,
            cell_size: 8,
            cell_skin_ratio: 0.5,
            min_fill_ratio: 0.4,
        }
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
