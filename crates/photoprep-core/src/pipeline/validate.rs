//! Pre-flight validation before any decode or metadata work.
//!
//! A sequential gate that short-circuits on the first failure: existence,
//! regular file, size bounds, supported extension, container opens,
//! dimensions within range. Every failure maps to a distinct
//! [`PipelineError`] variant so callers can match categories without
//! string parsing.

use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::{PipelineError, PipelineResult};

use super::format;

/// Validates files before processing.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Run the full gate for a source file.
    pub fn validate(&self, path: &Path) -> PipelineResult<()> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(PipelineError::NotAFile(path.to_path_buf()));
        }

        let metadata = std::fs::metadata(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read file metadata: {e}"),
        })?;

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }
        if metadata.len() == 0 {
            return Err(PipelineError::EmptyFile(path.to_path_buf()));
        }

        if !format::is_supported(path) {
            return Err(PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("")
                    .to_string(),
            });
        }

        // Vendor RAW containers can't be opened by the image crate; their
        // open/dimension gate runs at the RAW decode stage instead.
        if format::is_raw(path) {
            return Ok(());
        }

        let (width, height) = image::ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot open image: {e}"),
            })?
            .into_dimensions()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot open image: {e}"),
            })?;

        self.check_dimensions(path, width, height)
    }

    /// Dimension gate, shared with the RAW path once a raster exists.
    pub fn check_dimensions(&self, path: &Path, width: u32, height: u32) -> PipelineResult<()> {
        let min = self.limits.min_image_dimension;
        if width < min || height < min {
            return Err(PipelineError::ImageTooSmall {
                path: path.to_path_buf(),
                width,
                height,
                min_dim: min,
            });
        }
        let max = self.limits.max_image_dimension;
        if width > max || height > max {
            return Err(PipelineError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_dim: max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    fn validator() -> Validator {
        Validator::new(LimitsConfig::default())
    }

    #[test]
    fn test_missing_file() {
        let err = validator().validate(Path::new("/no/such/file.jpg")).unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = validator().validate(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::NotAFile(_)));
    }

    #[test]
    fn test_empty_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jpg");
        std::fs::write(&path, b"").unwrap();
        let err = validator().validate(&path).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyFile(_)));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();
        let err = validator().validate(&path).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_oversized_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.jpg");
        std::fs::write(&path, vec![0u8; 2 * 1024 * 1024]).unwrap();

        let tight = Validator::new(LimitsConfig {
            max_file_size_mb: 1,
            ..LimitsConfig::default()
        });
        let err = tight.validate(&path).unwrap_err();
        assert!(matches!(err, PipelineError::FileTooLarge { .. }));
    }

    #[test]
    fn test_garbage_bytes_fail_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.jpg");
        std::fs::write(&path, b"not an image at all").unwrap();
        let err = validator().validate(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_undersized_image_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        DynamicImage::new_rgb8(50, 50).save(&path).unwrap();
        let err = validator().validate(&path).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ImageTooSmall { width: 50, height: 50, .. }
        ));
    }

    #[test]
    fn test_valid_image_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.png");
        DynamicImage::new_rgb8(120, 120).save(&path).unwrap();
        assert!(validator().validate(&path).is_ok());
    }

    #[test]
    fn test_failure_reasons_are_distinct() {
        let dir = tempfile::tempdir().unwrap();

        let empty = dir.path().join("a.jpg");
        std::fs::write(&empty, b"").unwrap();
        let txt = dir.path().join("b.txt");
        std::fs::write(&txt, b"x").unwrap();
        let small = dir.path().join("c.png");
        DynamicImage::new_rgb8(50, 50).save(&small).unwrap();

        let v = validator();
        let reasons: Vec<String> = [
            v.validate(Path::new("/no/such.jpg")).unwrap_err(),
            v.validate(dir.path()).unwrap_err(),
            v.validate(&empty).unwrap_err(),
            v.validate(&txt).unwrap_err(),
            v.validate(&small).unwrap_err(),
        ]
        .iter()
        .map(|e| e.to_string())
        .collect();

        for (i, a) in reasons.iter().enumerate() {
            assert!(!a.is_empty());
            for b in reasons.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
