//! Image preparation pipeline components.
//!
//! This module contains all the stages of the pipeline:
//! - **format**: Classify files by extension (standard vs RAW)
//! - **discovery**: Find image files in directories
//! - **validate**: Pre-processing validation gate
//! - **metadata**: Extract the two EXIF metadata tiers
//! - **raw**: Boundary to an external RAW decoding capability
//! - **preview**: Generate hot and cold JPEG previews
//! - **hash**: Compute the hothash content identity
//! - **processor**: Orchestrates the full pipeline

pub mod discovery;
pub mod format;
pub mod hash;
pub mod metadata;
pub mod preview;
pub mod processor;
pub mod raw;
pub mod validate;

// Re-exports for convenient access
pub use discovery::DiscoveredFile;
pub use format::SourceFormat;
pub use preview::PreviewGenerator;
pub use processor::Processor;
pub use raw::{RawDecodeError, RawDecoder, RawInfo};
pub use validate::Validator;
