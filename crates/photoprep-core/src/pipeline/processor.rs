//! Pipeline orchestration: one entry point per image, one per batch.
//!
//! `process` runs the stages in fixed order: validation, metadata
//! extraction, decode (RAW or standard), preview generation, record
//! assembly. Any stage failure becomes a failed [`ProcessOutcome`];
//! nothing here panics or propagates errors past the outcome boundary.

use std::path::{Path, PathBuf};
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{BasicMetadata, CameraSettings, ColdPreview, HotPreview, PhotoRecord, ProcessOutcome};

use super::preview::{self, PreviewGenerator};
use super::raw::{self, RawDecodeError, RawDecoder};
use super::validate::Validator;
use super::{format, metadata};

/// Progress callback for batch processing: 1-based index, total count,
/// and the just-completed outcome.
pub type ProgressFn<'a> = &'a mut dyn FnMut(usize, usize, &ProcessOutcome);

/// Orchestrates the full pipeline for single files and batches.
pub struct Processor {
    validator: Validator,
    previews: PreviewGenerator,
    raw_decoder: Box<dyn RawDecoder>,
}

impl Processor {
    /// Create a processor with the build's default RAW decoder.
    pub fn new(config: Config) -> Self {
        Self::with_raw_decoder(config, raw::default_decoder())
    }

    /// Create a processor with an explicit RAW decoder.
    pub fn with_raw_decoder(config: Config, raw_decoder: Box<dyn RawDecoder>) -> Self {
        Self {
            validator: Validator::new(config.limits.clone()),
            previews: PreviewGenerator::new(config.preview.clone()),
            raw_decoder,
        }
    }

    /// Process a single image.
    ///
    /// `cold_target` is the coldpreview maximum dimension; `None` skips
    /// the coldpreview entirely. A target below the hotpreview box is
    /// rejected before any file I/O happens.
    pub fn process(&self, path: &Path, cold_target: Option<u32>) -> ProcessOutcome {
        let started = Instant::now();
        let outcome = match self.run(path, cold_target) {
            Ok(record) => ProcessOutcome::ok(record),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "processing failed");
                ProcessOutcome::err(e.to_string())
            }
        };
        debug!(
            path = %path.display(),
            success = outcome.success,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "processed image"
        );
        outcome
    }

    /// Process a batch of images sequentially, in input order.
    ///
    /// One outcome per input at the matching position. A failure never
    /// stops the batch. The progress callback fires once per completed
    /// item with a 1-based index.
    pub fn batch(
        &self,
        paths: &[PathBuf],
        cold_target: Option<u32>,
        mut progress: Option<ProgressFn<'_>>,
    ) -> Vec<ProcessOutcome> {
        let total = paths.len();
        let mut outcomes = Vec::with_capacity(total);
        for (i, path) in paths.iter().enumerate() {
            let outcome = self.process(path, cold_target);
            if let Some(callback) = progress.as_deref_mut() {
                callback(i + 1, total, &outcome);
            }
            outcomes.push(outcome);
        }
        outcomes
    }

    fn run(&self, path: &Path, cold_target: Option<u32>) -> PipelineResult<PhotoRecord> {
        if let Some(target) = cold_target {
            let floor = self.previews.hot_size();
            if target < floor {
                return Err(PipelineError::ColdTargetBelowFloor {
                    requested: target,
                    floor,
                });
            }
        }

        let stage = Instant::now();
        self.validator.validate(path)?;
        trace!(elapsed_us = stage.elapsed().as_micros() as u64, "validated");

        let bytes = std::fs::read(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {e}"),
        })?;

        // Both metadata tiers are extracted unconditionally; any field an
        // image lacks simply stays None.
        let stage = Instant::now();
        let mut basic = metadata::extract_basic_from_bytes(&bytes);
        let settings = metadata::extract_settings_from_bytes(&bytes);
        trace!(elapsed_us = stage.elapsed().as_micros() as u64, "extracted metadata");

        let stage = Instant::now();
        let image = if format::is_raw(path) {
            self.decode_raw(path, &bytes, &mut basic)?
        } else {
            preview::decode_corrected(&bytes, path)?
        };
        trace!(elapsed_us = stage.elapsed().as_micros() as u64, "decoded");

        let hot = self.previews.hot_from_image(&image)?;
        let cold = match cold_target {
            Some(target) => Some(self.previews.cold_from_image(&image, target)?),
            None => None,
        };

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();
        Ok(assemble_record(filename, basic, settings, hot, cold))
    }

    /// RAW decode path. The raster comes out already upright (sensor
    /// data has no orientation transform applied), so the standard
    /// rotation step is skipped. Dimensions and camera identity missing
    /// from EXIF are backfilled from the decoder.
    fn decode_raw(
        &self,
        path: &Path,
        bytes: &[u8],
        basic: &mut BasicMetadata,
    ) -> PipelineResult<DynamicImage> {
        let rgb = self.raw_decoder.decode(bytes).map_err(|e| match e {
            RawDecodeError::Unavailable => PipelineError::RawUnavailable(path.to_path_buf()),
            RawDecodeError::Rejected(message) => PipelineError::RawRejected {
                path: path.to_path_buf(),
                message,
            },
        })?;

        // The container couldn't be dimension-checked in validation, so
        // the gate runs here on the decoded raster instead.
        self.validator.check_dimensions(path, rgb.width(), rgb.height())?;

        if basic.width.is_none() || basic.height.is_none() {
            if let Some(info) = self.raw_decoder.probe(bytes) {
                basic.width.get_or_insert(info.width);
                basic.height.get_or_insert(info.height);
                if basic.camera_make.is_none() {
                    basic.camera_make = info.camera_make;
                }
                if basic.camera_model.is_none() {
                    basic.camera_model = info.camera_model;
                }
            }
        }
        basic.width.get_or_insert(rgb.width());
        basic.height.get_or_insert(rgb.height());

        Ok(DynamicImage::ImageRgb8(rgb))
    }
}

fn assemble_record(
    primary_filename: String,
    basic: BasicMetadata,
    settings: CameraSettings,
    hot: HotPreview,
    cold: Option<ColdPreview>,
) -> PhotoRecord {
    if basic.gps_latitude.is_some() != basic.gps_longitude.is_some() {
        // validate_gps_pair keeps the pair atomic; reaching here means a bug
        warn!("GPS coordinate pair is half-populated");
    }
    let has_gps = basic.gps_latitude.is_some() && basic.gps_longitude.is_some();
    let (cold_base64, cold_width, cold_height) = match cold {
        Some(c) => (Some(c.base64), Some(c.width), Some(c.height)),
        None => (None, None, None),
    };
    PhotoRecord {
        hothash: hot.hothash,
        hotpreview_base64: hot.base64,
        hotpreview_width: hot.width,
        hotpreview_height: hot.height,
        coldpreview_base64: cold_base64,
        coldpreview_width: cold_width,
        coldpreview_height: cold_height,
        primary_filename,
        width: basic.width,
        height: basic.height,
        taken_at: basic.taken_at,
        camera_make: basic.camera_make,
        camera_model: basic.camera_model,
        gps_latitude: basic.gps_latitude,
        gps_longitude: basic.gps_longitude,
        gps_altitude: basic.gps_altitude,
        gps_timestamp: basic.gps_timestamp,
        gps_datestamp: basic.gps_datestamp,
        gps_map_datum: basic.gps_map_datum,
        has_gps,
        iso: settings.iso,
        aperture: settings.aperture,
        shutter_speed: settings.shutter_speed,
        focal_length: settings.focal_length,
        lens_model: settings.lens_model,
        lens_make: settings.lens_make,
        flash: settings.flash,
        exposure_program: settings.exposure_program,
        metering_mode: settings.metering_mode,
        white_balance: settings.white_balance,
    }
}
