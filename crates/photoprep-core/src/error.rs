//! Error types for the photoprep pipeline.
//!
//! Errors are organized by stage so callers can match on the category
//! (validation vs. decode vs. too-small) without parsing message text.
//! Metadata extraction never produces errors: EXIF is unreliable by
//! nature, so missing or malformed tags degrade to absent fields.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for photoprep operations.
#[derive(Error, Debug)]
pub enum PhotoprepError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
///
/// Validation variants come from the pre-flight gate and short-circuit
/// before any decode work. Decode and preview variants fail the whole
/// `process` call for that image. None of these ever aborts a batch.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Path exists but is not a regular file
    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    /// File has zero length
    #[error("File is empty: {0}")]
    EmptyFile(PathBuf),

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Extension is not in the supported set
    #[error("Unsupported format for {path}: {extension}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Image container could not be opened or decoded
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Image dimensions below the validation floor
    #[error("Image too small: {path} ({width}x{height} < {min_dim}x{min_dim})")]
    ImageTooSmall {
        path: PathBuf,
        width: u32,
        height: u32,
        min_dim: u32,
    },

    /// Image dimensions exceed the validation ceiling
    #[error("Image too large: {path} ({width}x{height} > {max_dim}x{max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Source raster below the 4x4 preview floor. Distinct from Decode so
    /// callers can map it to a client error rather than a server fault.
    #[error("Image too small for preview: {width}x{height} (minimum 4x4)")]
    PreviewSourceTooSmall { width: u32, height: u32 },

    /// Requested cold preview target below the hotpreview floor
    #[error("Cold preview target {requested} below minimum {floor}")]
    ColdTargetBelowFloor { requested: u32, floor: u32 },

    /// RAW decoding capability is not compiled in / not present
    #[error("RAW decoder unavailable for {0}")]
    RawUnavailable(PathBuf),

    /// RAW decoder rejected the data as corrupt or unsupported
    #[error("RAW decode rejected for {path}: {message}")]
    RawRejected { path: PathBuf, message: String },

    /// JPEG re-encoding of a preview failed
    #[error("Preview encode failed: {0}")]
    PreviewEncode(String),
}

/// Convenience type alias for photoprep results.
pub type Result<T> = std::result::Result<T, PhotoprepError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
