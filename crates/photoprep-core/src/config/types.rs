//! Sub-configuration structs with pipeline defaults.

use serde::{Deserialize, Serialize};

/// Resource limits applied by the pre-flight validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Minimum image dimension (width or height)
    pub min_image_dimension: u32,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 500,
            min_image_dimension: 100,
            max_image_dimension: 50000,
        }
    }
}

/// Preview generation settings.
///
/// Quality values are part of the identity function: re-encoding the same
/// raster at a different quality produces different bytes and therefore a
/// different hothash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Hotpreview bounding box edge in pixels (box is square)
    pub hot_size: u32,

    /// Hotpreview JPEG quality (1-100)
    pub hot_quality: u8,

    /// Default coldpreview maximum dimension in pixels
    pub cold_size: u32,

    /// Coldpreview JPEG quality (1-100)
    pub cold_quality: u8,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            hot_size: 150,
            hot_quality: 85,
            cold_size: 1920,
            cold_quality: 90,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
