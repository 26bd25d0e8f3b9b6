//! RAW decoding as a capability-checked collaborator.
//!
//! The pipeline never implements demosaicing. It talks to a [`RawDecoder`]
//! that either produces an RGB raster or reports a typed failure, with
//! "decoder unavailable" kept distinct from "decoder rejected the data".
//! The default implementation is selected at compile time by the `raw`
//! cargo feature; without it every RAW file fails as unavailable and the
//! rest of the pipeline is unaffected.

use image::RgbImage;
use thiserror::Error;

/// Why a RAW decode did not produce a raster.
#[derive(Error, Debug)]
pub enum RawDecodeError {
    /// No RAW decoding capability is present in this build
    #[error("RAW decoder unavailable")]
    Unavailable,

    /// The decoder is present but rejected the data
    #[error("RAW decoder rejected data: {0}")]
    Rejected(String),
}

/// Cheap metadata probed from a RAW container without a full decode
/// pipeline run. Opportunistic: absence is never an error.
#[derive(Debug, Clone, Default)]
pub struct RawInfo {
    pub width: u32,
    pub height: u32,
    pub raw_width: u32,
    pub raw_height: u32,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub iso: Option<u32>,
}

/// Boundary to an external RAW decoding capability.
pub trait RawDecoder: Send + Sync {
    /// Whether decoding can be attempted at all.
    fn is_available(&self) -> bool;

    /// Turn RAW source bytes into an RGB raster.
    fn decode(&self, bytes: &[u8]) -> Result<RgbImage, RawDecodeError>;

    /// Probe basic info without producing a raster.
    fn probe(&self, bytes: &[u8]) -> Option<RawInfo>;
}

/// The decoder compiled into this build.
pub fn default_decoder() -> Box<dyn RawDecoder> {
    #[cfg(feature = "raw")]
    {
        Box::new(rawloader_backend::RawloaderDecoder)
    }
    #[cfg(not(feature = "raw"))]
    {
        Box::new(UnavailableDecoder)
    }
}

/// Stub used when no RAW capability is compiled in.
pub struct UnavailableDecoder;

impl RawDecoder for UnavailableDecoder {
    fn is_available(&self) -> bool {
        false
    }

    fn decode(&self, _bytes: &[u8]) -> Result<RgbImage, RawDecodeError> {
        Err(RawDecodeError::Unavailable)
    }

    fn probe(&self, _bytes: &[u8]) -> Option<RawInfo> {
        None
    }
}

#[cfg(feature = "raw")]
mod rawloader_backend {
    use super::{RawDecodeError, RawDecoder, RawInfo};
    use image::RgbImage;
    use std::io::Cursor;

    /// rawloader-backed decoder. Sensor data is reduced to RGB by 2x2
    /// CFA superpixel binning: each Bayer quad becomes one output pixel,
    /// normalized against the per-channel black and white levels. The
    /// interpolating demosaic stays in the external library's domain.
    pub struct RawloaderDecoder;

    impl RawDecoder for RawloaderDecoder {
        fn is_available(&self) -> bool {
            true
        }

        fn decode(&self, bytes: &[u8]) -> Result<RgbImage, RawDecodeError> {
            let raw = rawloader::decode(&mut Cursor::new(bytes))
                .map_err(|e| RawDecodeError::Rejected(e.to_string()))?;
            superpixel_rgb(&raw).ok_or_else(|| {
                RawDecodeError::Rejected("unsupported sensor layout".to_string())
            })
        }

        fn probe(&self, bytes: &[u8]) -> Option<RawInfo> {
            let raw = rawloader::decode(&mut Cursor::new(bytes)).ok()?;
            Some(RawInfo {
                width: raw.width as u32,
                height: raw.height as u32,
                raw_width: raw.width as u32,
                raw_height: raw.height as u32,
                camera_make: non_empty(&raw.clean_make),
                camera_model: non_empty(&raw.clean_model),
                iso: None,
            })
        }
    }

    fn non_empty(s: &str) -> Option<String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn sensor_values(raw: &rawloader::RawImage) -> Vec<f32> {
        match &raw.data {
            rawloader::RawImageData::Integer(values) => {
                values.iter().map(|&v| v as f32).collect()
            }
            rawloader::RawImageData::Float(values) => values.clone(),
        }
    }

    fn superpixel_rgb(raw: &rawloader::RawImage) -> Option<RgbImage> {
        let width = raw.width;
        let height = raw.height;
        if width < 2 || height < 2 {
            return None;
        }
        let values = sensor_values(raw);
        if values.len() < width * height * raw.cpp {
            return None;
        }

        // Already-demosaiced RGB data (cpp == 3) just gets normalized.
        if raw.cpp == 3 {
            let black = raw.blacklevels[0] as f32;
            let white = (raw.whitelevels[0] as f32).max(black + 1.0);
            let mut out = RgbImage::new(width as u32, height as u32);
            for (i, pixel) in out.pixels_mut().enumerate() {
                for c in 0..3 {
                    let v = (values[i * 3 + c] - black) / (white - black);
                    pixel.0[c] = (v.clamp(0.0, 1.0) * 255.0) as u8;
                }
            }
            return Some(out);
        }
        if raw.cpp != 1 {
            return None;
        }

        let out_w = width / 2;
        let out_h = height / 2;
        let mut out = RgbImage::new(out_w as u32, out_h as u32);
        for by in 0..out_h {
            for bx in 0..out_w {
                let mut sums = [0.0f32; 3];
                let mut counts = [0u32; 3];
                for dy in 0..2 {
                    for dx in 0..2 {
                        let row = by * 2 + dy;
                        let col = bx * 2 + dx;
                        // CFA color index: 0=R, 1=G, 2=B, 3=second G
                        let cfa = raw.cfa.color_at(row, col);
                        let channel = if cfa == 3 { 1 } else { cfa };
                        if channel > 2 {
                            continue;
                        }
                        let black = raw.blacklevels[cfa.min(3)] as f32;
                        let white = (raw.whitelevels[cfa.min(3)] as f32).max(black + 1.0);
                        let v = (values[row * width + col] - black) / (white - black);
                        sums[channel] += v.clamp(0.0, 1.0);
                        counts[channel] += 1;
                    }
                }
                let pixel = out.get_pixel_mut(bx as u32, by as u32);
                for c in 0..3 {
                    let v = if counts[c] > 0 {
                        sums[c] / counts[c] as f32
                    } else {
                        0.0
                    };
                    pixel.0[c] = (v * 255.0) as u8;
                }
            }
        }
        Some(out)
    }
}
