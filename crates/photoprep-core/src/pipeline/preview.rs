//! Hot and cold preview generation with EXIF-aware rotation.
//!
//! Both renditions share the same algorithm: decode, rotate/flip pixels
//! upright per the orientation tag, fit within the target box without
//! upscaling, Lanczos resample, flatten to RGB and re-encode as JPEG
//! with metadata stripped. The hotpreview additionally carries the
//! SHA-256 hothash of its encoded bytes.
//!
//! Output is deterministic: fixed source bytes and fixed (box, quality)
//! produce byte-identical JPEGs across calls.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use exif::{In, Tag, Value};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType};
use std::io::Cursor;
use std::path::Path;

use crate::config::PreviewConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{ColdPreview, HotPreview};

use super::hash;

/// Generates previews from images.
pub struct PreviewGenerator {
    config: PreviewConfig,
}

impl PreviewGenerator {
    /// Create a new preview generator with the given configuration.
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// Default coldpreview maximum dimension from the configuration.
    pub fn default_cold_size(&self) -> u32 {
        self.config.cold_size
    }

    /// Hotpreview bounding box edge from the configuration.
    pub fn hot_size(&self) -> u32 {
        self.config.hot_size
    }

    /// Generate the hotpreview for a file.
    pub fn hot(&self, path: &Path) -> PipelineResult<HotPreview> {
        let bytes = read_source(path)?;
        self.hot_from_bytes(&bytes, path)
    }

    /// Generate the hotpreview from in-memory source bytes.
    pub fn hot_from_bytes(&self, bytes: &[u8], path: &Path) -> PipelineResult<HotPreview> {
        let image = decode_corrected(bytes, path)?;
        self.hot_from_image(&image)
    }

    /// Generate the hotpreview from an already decoded, orientation-
    /// corrected raster.
    pub fn hot_from_image(&self, image: &DynamicImage) -> PipelineResult<HotPreview> {
        let resized = resize_to_fit(image, self.config.hot_size, self.config.hot_size)?;
        let bytes = encode_jpeg(&resized, self.config.hot_quality)?;
        let hothash = hash::calculate(&bytes);
        let base64 = BASE64.encode(&bytes);
        Ok(HotPreview {
            width: resized.width(),
            height: resized.height(),
            bytes,
            base64,
            hothash,
        })
    }

    /// Generate a coldpreview for a file at the given maximum dimension.
    pub fn cold(&self, path: &Path, max_dim: u32) -> PipelineResult<ColdPreview> {
        let bytes = read_source(path)?;
        let image = decode_corrected(&bytes, path)?;
        self.cold_from_image(&image, max_dim)
    }

    /// Generate a coldpreview from an already decoded, orientation-
    /// corrected raster.
    pub fn cold_from_image(
        &self,
        image: &DynamicImage,
        max_dim: u32,
    ) -> PipelineResult<ColdPreview> {
        let resized = resize_to_fit(image, max_dim, max_dim)?;
        let bytes = encode_jpeg(&resized, self.config.cold_quality)?;
        let base64 = BASE64.encode(&bytes);
        Ok(ColdPreview {
            width: resized.width(),
            height: resized.height(),
            bytes,
            base64,
        })
    }

    /// Generate both previews sharing a single decode pass.
    pub fn both(&self, path: &Path) -> PipelineResult<(HotPreview, ColdPreview)> {
        let bytes = read_source(path)?;
        let image = decode_corrected(&bytes, path)?;
        let hot = self.hot_from_image(&image)?;
        let cold = self.cold_from_image(&image, self.config.cold_size)?;
        Ok((hot, cold))
    }
}

fn read_source(path: &Path) -> PipelineResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| PipelineError::Decode {
        path: path.to_path_buf(),
        message: format!("Cannot read file: {e}"),
    })
}

/// Decode source bytes and rotate/flip the raster upright. A missing or
/// unparsable orientation tag is not an error; the raster is used as-is.
pub(crate) fn decode_corrected(bytes: &[u8], path: &Path) -> PipelineResult<DynamicImage> {
    let image = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot detect image format: {e}"),
        })?
        .decode()
        .map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    match orientation_from_bytes(bytes) {
        Some(orientation) => Ok(apply_orientation(image, orientation)),
        None => Ok(image),
    }
}

fn orientation_from_bytes(bytes: &[u8]) -> Option<u16> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    let field = exif.get_field(Tag::Orientation, In::PRIMARY)?;
    match &field.value {
        Value::Short(v) => v.first().copied(),
        _ => None,
    }
}

/// Apply an EXIF orientation (1-8) as a pixel transform so the stored
/// raster is upright and the tag becomes irrelevant downstream.
pub(crate) fn apply_orientation(image: DynamicImage, orientation: u16) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

/// Resample into the target box, preserving aspect ratio and never
/// enlarging beyond the source dimensions. Sources below the 4x4 floor
/// are rejected rather than producing a degenerate preview.
fn resize_to_fit(image: &DynamicImage, max_w: u32, max_h: u32) -> PipelineResult<DynamicImage> {
    let (width, height) = (image.width(), image.height());
    if width < 4 || height < 4 {
        return Err(PipelineError::PreviewSourceTooSmall { width, height });
    }

    let (target_w, target_h) = fit_within(width, height, max_w, max_h);
    if (target_w, target_h) == (width, height) {
        return Ok(image.clone());
    }
    Ok(image.resize_exact(target_w, target_h, FilterType::Lanczos3))
}

/// Largest (w, h) that fits inside (max_w, max_h) at the source aspect
/// ratio, capped at the source size (scale factor never exceeds 1).
fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let scale = (max_w as f64 / width as f64)
        .min(max_h as f64 / height as f64)
        .min(1.0);
    let target_w = ((width as f64 * scale).round() as u32).clamp(1, max_w.max(1));
    let target_h = ((height as f64 * scale).round() as u32).clamp(1, max_h.max(1));
    (target_w, target_h)
}

/// Flatten to 3-channel RGB and encode as JPEG. The output carries no
/// EXIF block.
fn encode_jpeg(image: &DynamicImage, quality: u8) -> PipelineResult<Vec<u8>> {
    let rgb = image.to_rgb8();
    let mut buffer = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| PipelineError::PreviewEncode(e.to_string()))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    /// Diagonal gradient so re-encodes at different qualities actually
    /// differ (a flat color can survive quantization unchanged).
    fn gradient(width: u32, height: u32) -> DynamicImage {
        let buffer = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                ((x + y) % 256) as u8,
            ])
        });
        DynamicImage::ImageRgb8(buffer)
    }

    fn generator() -> PreviewGenerator {
        PreviewGenerator::new(PreviewConfig::default())
    }

    #[test]
    fn test_hot_is_deterministic() {
        let img = gradient(800, 600);
        let gen = generator();
        let a = gen.hot_from_image(&img).unwrap();
        let b = gen.hot_from_image(&img).unwrap();
        assert_eq!(a.bytes, b.bytes);
        assert_eq!(a.hothash, b.hothash);
    }

    #[test]
    fn test_quality_changes_identity() {
        let img = gradient(800, 600);
        let low = PreviewGenerator::new(PreviewConfig {
            hot_quality: 60,
            ..PreviewConfig::default()
        });
        let high = PreviewGenerator::new(PreviewConfig {
            hot_quality: 95,
            ..PreviewConfig::default()
        });
        let a = low.hot_from_image(&img).unwrap();
        let b = high.hot_from_image(&img).unwrap();
        assert_ne!(a.bytes, b.bytes);
        assert_ne!(a.hothash, b.hothash);
    }

    #[test]
    fn test_different_pixels_different_hothash() {
        let gen = generator();
        let a = gen.hot_from_image(&gradient(800, 600)).unwrap();
        let b = gen.hot_from_image(&gradient(600, 800)).unwrap();
        assert_ne!(a.hothash, b.hothash);
    }

    #[test]
    fn test_hot_fits_box_and_preserves_aspect() {
        let img = gradient(800, 600);
        let hot = generator().hot_from_image(&img).unwrap();
        assert!(hot.width <= 150 && hot.height <= 150);

        let source_ratio = 800.0 / 600.0;
        let preview_ratio = hot.width as f64 / hot.height as f64;
        assert!((preview_ratio - source_ratio).abs() / source_ratio < 0.01);
    }

    #[test]
    fn test_portrait_orientation_fits_box() {
        let img = gradient(600, 800);
        let hot = generator().hot_from_image(&img).unwrap();
        assert_eq!(hot.height, 150);
        assert!(hot.width < 150);
    }

    #[test]
    fn test_cold_never_upscales() {
        let img = gradient(100, 100);
        let cold = generator().cold_from_image(&img, 1920).unwrap();
        assert_eq!((cold.width, cold.height), (100, 100));
    }

    #[test]
    fn test_tiny_source_rejected() {
        let img = gradient(3, 3);
        let err = generator().hot_from_image(&img).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::PreviewSourceTooSmall { width: 3, height: 3 }
        ));
    }

    #[test]
    fn test_output_is_jpeg_with_matching_base64() {
        let hot = generator().hot_from_image(&gradient(400, 300)).unwrap();
        // JPEG SOI marker
        assert_eq!(&hot.bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(BASE64.decode(&hot.base64).unwrap(), hot.bytes);
        assert_eq!(hot.hothash, hash::calculate(&hot.bytes));
    }

    #[test]
    fn test_apply_orientation_rotations_swap_dimensions() {
        let img = gradient(40, 20);
        assert_eq!(apply_orientation(img.clone(), 6).dimensions_tuple(), (20, 40));
        assert_eq!(apply_orientation(img.clone(), 8).dimensions_tuple(), (20, 40));
        assert_eq!(apply_orientation(img.clone(), 3).dimensions_tuple(), (40, 20));
        assert_eq!(apply_orientation(img, 1).dimensions_tuple(), (40, 20));
    }

    trait DimensionsTuple {
        fn dimensions_tuple(&self) -> (u32, u32);
    }
    impl DimensionsTuple for DynamicImage {
        fn dimensions_tuple(&self) -> (u32, u32) {
            (self.width(), self.height())
        }
    }

    #[test]
    fn test_fit_within_math() {
        assert_eq!(fit_within(1000, 500, 150, 150), (150, 75));
        assert_eq!(fit_within(500, 1000, 150, 150), (75, 150));
        assert_eq!(fit_within(100, 100, 150, 150), (100, 100));
        assert_eq!(fit_within(3840, 2160, 1920, 1920), (1920, 1080));
    }

    #[test]
    fn test_both_shares_decode_and_agrees_with_singles() {
        let img = gradient(640, 480);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("both.png");
        img.save(&path).unwrap();

        let gen = generator();
        let (hot, cold) = gen.both(&path).unwrap();
        let hot_single = gen.hot(&path).unwrap();
        assert_eq!(hot.hothash, hot_single.hothash);
        assert!(cold.width <= 1920 && cold.height <= 1920);
        assert_eq!((cold.width, cold.height), (640, 480));
    }
}
