//! Photoprep Core - Embeddable image preparation library.
//!
//! Photoprep is a deterministic pipeline that takes an image file and
//! produces its content identity plus transport-ready artifacts: a small
//! hotpreview whose SHA-256 is the image's hothash, an optional larger
//! coldpreview, and the extracted EXIF metadata, all assembled into one
//! flat record.
//!
//! # Architecture
//!
//! ```text
//! Image → Validate → Extract Metadata → Decode (RAW or standard)
//!       → Hot/Cold Previews → Hothash → PhotoRecord
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use photoprep_core::{Config, Processor};
//!
//! fn main() -> photoprep_core::Result<()> {
//!     let config = Config::load()?;
//!     let processor = Processor::new(config);
//!
//!     let outcome = processor.process("./image.jpg".as_ref(), Some(1920));
//!     if let Some(record) = outcome.record {
//!         println!("hothash: {}", record.hothash);
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PhotoprepError, PipelineError, PipelineResult, Result};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{DiscoveredFile, PreviewGenerator, Processor, RawDecoder, Validator};
pub use types::{
    BasicMetadata, CameraSettings, ColdPreview, HotPreview, PhotoRecord, ProcessOutcome,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_processor_from_default_config() {
        let processor = Processor::new(Config::default());
        let outcome = processor.process(std::path::Path::new("/nope.jpg"), None);
        assert!(outcome.failed());
    }
}
