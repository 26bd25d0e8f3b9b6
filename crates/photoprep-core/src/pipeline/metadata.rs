//! Two-tier EXIF metadata extraction.
//!
//! Both entry points are total: they never fail outward. EXIF is
//! unreliable in the wild, so every tag is read through an individually
//! guarded helper returning an `Option`; one malformed tag can't blank
//! unrelated fields. Pixel dimensions come from the container header via
//! the `image` crate, not from EXIF.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use exif::{Exif, In, Rational, Tag, Value};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use crate::types::{
    BasicMetadata, CameraSettings, ExposureProgram, FlashState, MeteringMode, WhiteBalanceMode,
};

/// Extract the high-reliability metadata tier from a file.
///
/// Never fails; any parse problem yields partial-or-empty results.
pub fn extract_basic(path: &Path) -> BasicMetadata {
    basic_from_parts(dimensions_from_path(path), exif_from_path(path))
}

/// Extract the high-reliability metadata tier from an in-memory buffer.
///
/// Produces identical results to [`extract_basic`] for identical bytes.
pub fn extract_basic_from_bytes(bytes: &[u8]) -> BasicMetadata {
    basic_from_parts(dimensions_from_bytes(bytes), exif_from_bytes(bytes))
}

/// Extract the best-effort camera settings tier from a file.
pub fn extract_settings(path: &Path) -> CameraSettings {
    exif_from_path(path).map(settings_from_exif).unwrap_or_default()
}

/// Extract the best-effort camera settings tier from an in-memory buffer.
pub fn extract_settings_from_bytes(bytes: &[u8]) -> CameraSettings {
    exif_from_bytes(bytes).map(settings_from_exif).unwrap_or_default()
}

fn dimensions_from_path(path: &Path) -> Option<(u32, u32)> {
    image::ImageReader::open(path)
        .ok()?
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

fn dimensions_from_bytes(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

fn exif_from_path(path: &Path) -> Option<Exif> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    read_exif(&mut reader)
}

fn exif_from_bytes(bytes: &[u8]) -> Option<Exif> {
    read_exif(&mut Cursor::new(bytes))
}

/// Read the EXIF tag directory, keeping whatever parsed before any error.
fn read_exif<R: std::io::BufRead + std::io::Seek>(reader: &mut R) -> Option<Exif> {
    let mut exif_reader = exif::Reader::new();
    exif_reader.continue_on_error(true);
    exif_reader
        .read_from_container(reader)
        .or_else(|e| e.distill_partial_result(|_| {}))
        .ok()
}

fn basic_from_parts(dimensions: Option<(u32, u32)>, exif: Option<Exif>) -> BasicMetadata {
    let mut result = BasicMetadata::default();
    if let Some((w, h)) = dimensions {
        result.width = Some(w);
        result.height = Some(h);
    }

    let Some(exif) = exif else {
        return result;
    };

    // Timestamp: first non-empty tag in priority order wins.
    for tag in [Tag::DateTimeOriginal, Tag::DateTimeDigitized, Tag::DateTime] {
        if let Some(raw) = ascii_field(&exif, tag) {
            result.taken_at = Some(standardize_datetime(&raw));
            break;
        }
    }

    result.camera_make = ascii_field(&exif, Tag::Make);
    result.camera_model = ascii_field(&exif, Tag::Model);

    let (lat, lon) = gps_pair(&exif);
    result.gps_latitude = lat;
    result.gps_longitude = lon;
    result.gps_altitude = gps_altitude(&exif);
    result.gps_timestamp = gps_timestamp(&exif);
    result.gps_datestamp = ascii_field(&exif, Tag::GPSDateStamp);
    result.gps_map_datum = ascii_field(&exif, Tag::GPSMapDatum);

    result
}

fn settings_from_exif(exif: Exif) -> CameraSettings {
    CameraSettings {
        iso: u32_field(&exif, Tag::PhotographicSensitivity),
        aperture: rational_field(&exif, Tag::FNumber).map(round1),
        shutter_speed: rational_field(&exif, Tag::ExposureTime).map(format_shutter),
        focal_length: rational_field(&exif, Tag::FocalLength).map(round1),
        lens_model: ascii_field(&exif, Tag::LensModel),
        lens_make: ascii_field(&exif, Tag::LensMake),
        flash: u16_field(&exif, Tag::Flash).map(FlashState::from_exif),
        exposure_program: u16_field(&exif, Tag::ExposureProgram).map(ExposureProgram::from_exif),
        metering_mode: u16_field(&exif, Tag::MeteringMode).map(MeteringMode::from_exif),
        white_balance: u16_field(&exif, Tag::WhiteBalance).map(WhiteBalanceMode::from_exif),
    }
}

/// String tag, whitespace-trimmed; empty strings count as absent.
fn ascii_field(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let s = match &field.value {
        Value::Ascii(v) => {
            let first = v.first()?;
            String::from_utf8_lossy(first).into_owned()
        }
        _ => field.display_value().to_string().trim_matches('"').to_string(),
    };
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn u16_field(exif: &Exif, tag: Tag) -> Option<u16> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Short(v) => v.first().copied(),
        Value::Long(v) => v.first().map(|&x| x as u16),
        _ => None,
    }
}

fn u32_field(exif: &Exif, tag: Tag) -> Option<u32> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Short(v) => v.first().map(|&x| x as u32),
        Value::Long(v) => v.first().copied(),
        _ => None,
    }
}

/// First rational of a tag as f64. Zero denominators count as absent.
fn rational_field(exif: &Exif, tag: Tag) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Rational(v) => {
            let r = v.first()?;
            if r.denom == 0 {
                None
            } else {
                Some(r.to_f64())
            }
        }
        _ => None,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Render an exposure time: "1/N" for sub-second values, a 3-decimal
/// string otherwise.
fn format_shutter(seconds: f64) -> String {
    if seconds > 0.0 && seconds < 1.0 {
        format!("1/{}", (1.0 / seconds).round() as u32)
    } else {
        format!("{seconds:.3}")
    }
}

/// Read the latitude/longitude pair, validated as a unit: out-of-range
/// values or "null island" (0, 0) discard both coordinates.
fn gps_pair(exif: &Exif) -> (Option<f64>, Option<f64>) {
    let lat = gps_coordinate(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef);
    let lon = gps_coordinate(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef);
    match (lat, lon) {
        (Some(lat), Some(lon)) => match validate_gps_pair(lat, lon) {
            Some((lat, lon)) => (Some(lat), Some(lon)),
            None => (None, None),
        },
        _ => (None, None),
    }
}

/// Range check plus null-island rejection. Returns the pair unchanged
/// when valid.
fn validate_gps_pair(lat: f64, lon: f64) -> Option<(f64, f64)> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }
    if lat == 0.0 && lon == 0.0 {
        return None;
    }
    Some((lat, lon))
}

fn gps_coordinate(exif: &Exif, coord_tag: Tag, ref_tag: Tag) -> Option<f64> {
    let field = exif.get_field(coord_tag, In::PRIMARY)?;
    let rationals = match &field.value {
        Value::Rational(v) => v.as_slice(),
        _ => return None,
    };
    let reference = ascii_field(exif, ref_tag);
    dms_to_decimal(rationals, reference.as_deref())
}

/// Convert a (degrees, minutes, seconds) triple, a (degrees, minutes)
/// pair, or a bare decimal to signed decimal degrees.
fn dms_to_decimal(rationals: &[Rational], reference: Option<&str>) -> Option<f64> {
    if rationals.iter().any(|r| r.denom == 0) {
        return None;
    }
    let decimal = match rationals {
        [] => return None,
        [deg] => deg.to_f64(),
        [deg, min] => deg.to_f64() + min.to_f64() / 60.0,
        [deg, min, sec, ..] => deg.to_f64() + min.to_f64() / 60.0 + sec.to_f64() / 3600.0,
    };
    let sign = match reference {
        Some(r) if r.contains('S') || r.contains('W') => -1.0,
        _ => 1.0,
    };
    Some(sign * decimal)
}

/// Altitude in meters, negated when the reference flag marks below sea
/// level.
fn gps_altitude(exif: &Exif) -> Option<f64> {
    let altitude = rational_field(exif, Tag::GPSAltitude)?;
    let below_sea_level = exif
        .get_field(Tag::GPSAltitudeRef, In::PRIMARY)
        .map(|f| match &f.value {
            Value::Byte(v) => v.first() == Some(&1),
            Value::Short(v) => v.first() == Some(&1),
            _ => false,
        })
        .unwrap_or(false);
    Some(if below_sea_level { -altitude } else { altitude })
}

/// GPS time of day from the (hour, minute, second) rational triple.
fn gps_timestamp(exif: &Exif) -> Option<String> {
    let field = exif.get_field(Tag::GPSTimeStamp, In::PRIMARY)?;
    match &field.value {
        Value::Rational(v) if v.len() >= 3 => {
            if v[..3].iter().any(|r| r.denom == 0) {
                return None;
            }
            let hour = v[0].to_f64() as u32;
            let minute = v[1].to_f64() as u32;
            let second = v[2].to_f64() as u32;
            Some(format!("{hour:02}:{minute:02}:{second:02}"))
        }
        _ => None,
    }
}

/// Fixed ordered list of known camera datetime layouts. The first match
/// wins; an unrecognized string passes through unmodified.
fn standardize_datetime(raw: &str) -> String {
    // Timezone suffixes are dropped: the normalized form is tz-naive.
    let clean = raw
        .split('+')
        .next()
        .unwrap_or(raw)
        .split('Z')
        .next()
        .unwrap_or(raw)
        .trim();

    const DATETIME_FORMATS: &[&str] = &[
        "%Y:%m:%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y:%m:%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(clean, format) {
            return iso8601(dt);
        }
    }

    const DATE_FORMATS: &[&str] = &["%Y:%m:%d", "%Y-%m-%d"];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(clean, format) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return iso8601(dt);
            }
        }
    }

    raw.to_string()
}

fn iso8601(dt: NaiveDateTime) -> String {
    if dt.nanosecond() == 0 {
        dt.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}
