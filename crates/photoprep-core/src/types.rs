//! Core data types for the photoprep pipeline.
//!
//! `PhotoRecord` is the external contract: its serialized field names and
//! nullability are fixed. Optional record fields serialize as explicit
//! `null` rather than being omitted, so consumers can distinguish "absent"
//! from "schema changed".

use serde::{Deserialize, Serialize};

/// High-reliability metadata tier (98%+ presence when EXIF exists).
///
/// Every field is independently optional; a malformed tag never blanks
/// unrelated fields. Width/height come from the container header, not
/// from EXIF.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BasicMetadata {
    /// Capture timestamp, normalized to ISO 8601 (timezone-naive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<String>,

    /// Image width in pixels (container header, authoritative)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Image height in pixels (container header, authoritative)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Camera manufacturer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,

    /// Camera model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,

    /// GPS latitude in decimal degrees, [-90, 90]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_latitude: Option<f64>,

    /// GPS longitude in decimal degrees, [-180, 180]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_longitude: Option<f64>,

    /// GPS altitude in meters (negative = below sea level)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_altitude: Option<f64>,

    /// GPS time of day as "HH:MM:SS"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_timestamp: Option<String>,

    /// GPS date string, passed through as recorded (e.g. "2024:07:15")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_datestamp: Option<String>,

    /// Geodetic datum identifier (e.g. "WGS-84")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_map_datum: Option<String>,
}

/// Best-effort metadata tier (60-90% presence by field).
///
/// Missing values are the expected steady state, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CameraSettings {
    /// ISO speed (e.g. 100, 400, 1600)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<u32>,

    /// F-number, rounded to 1 decimal (e.g. 2.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<f64>,

    /// Exposure time: "1/N" for sub-second, 3-decimal string otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutter_speed: Option<String>,

    /// Focal length in mm, rounded to 1 decimal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<f64>,

    /// Lens name/model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens_model: Option<String>,

    /// Lens manufacturer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lens_make: Option<String>,

    /// Whether the flash fired (bit 0 of the EXIF flash value)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<FlashState>,

    /// Exposure program label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure_program: Option<ExposureProgram>,

    /// Metering mode label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metering_mode: Option<MeteringMode>,

    /// White balance setting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_balance: Option<WhiteBalanceMode>,
}

/// Flash status derived from bit 0 of the EXIF flash value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashState {
    #[serde(rename = "Fired")]
    Fired,
    #[serde(rename = "No Flash")]
    NoFlash,
}

impl FlashState {
    /// Classify a raw EXIF flash value.
    pub fn from_exif(value: u16) -> Self {
        if value & 1 != 0 {
            Self::Fired
        } else {
            Self::NoFlash
        }
    }
}

impl std::fmt::Display for FlashState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fired => write!(f, "Fired"),
            Self::NoFlash => write!(f, "No Flash"),
        }
    }
}

/// Exposure program, a closed label set. Unrecognized integer codes map
/// to `Unknown` rather than passing through as open strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExposureProgram {
    #[serde(rename = "Not Defined")]
    NotDefined,
    #[serde(rename = "Manual")]
    Manual,
    #[serde(rename = "Program AE")]
    ProgramAe,
    #[serde(rename = "Aperture Priority")]
    AperturePriority,
    #[serde(rename = "Shutter Priority")]
    ShutterPriority,
    #[serde(rename = "Creative Program")]
    CreativeProgram,
    #[serde(rename = "Action Program")]
    ActionProgram,
    #[serde(rename = "Portrait Mode")]
    PortraitMode,
    #[serde(rename = "Landscape Mode")]
    LandscapeMode,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl ExposureProgram {
    /// Map a raw EXIF exposure program code to its label.
    pub fn from_exif(code: u16) -> Self {
        match code {
            0 => Self::NotDefined,
            1 => Self::Manual,
            2 => Self::ProgramAe,
            3 => Self::AperturePriority,
            4 => Self::ShutterPriority,
            5 => Self::CreativeProgram,
            6 => Self::ActionProgram,
            7 => Self::PortraitMode,
            8 => Self::LandscapeMode,
            _ => Self::Unknown,
        }
    }
}

/// Metering mode, a closed 7-entry label set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeteringMode {
    #[serde(rename = "Unknown")]
    Unknown,
    #[serde(rename = "Average")]
    Average,
    #[serde(rename = "Center Weighted Average")]
    CenterWeightedAverage,
    #[serde(rename = "Spot")]
    Spot,
    #[serde(rename = "Multi-Spot")]
    MultiSpot,
    #[serde(rename = "Multi-Segment")]
    MultiSegment,
    #[serde(rename = "Partial")]
    Partial,
}

impl MeteringMode {
    /// Map a raw EXIF metering mode code to its label.
    pub fn from_exif(code: u16) -> Self {
        match code {
            1 => Self::Average,
            2 => Self::CenterWeightedAverage,
            3 => Self::Spot,
            4 => Self::MultiSpot,
            5 => Self::MultiSegment,
            6 => Self::Partial,
            _ => Self::Unknown,
        }
    }
}

/// White balance setting: 0 is auto, anything else manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WhiteBalanceMode {
    #[serde(rename = "Auto")]
    Auto,
    #[serde(rename = "Manual")]
    Manual,
}

impl WhiteBalanceMode {
    /// Classify a raw EXIF white balance value.
    pub fn from_exif(value: u16) -> Self {
        if value == 0 {
            Self::Auto
        } else {
            Self::Manual
        }
    }
}

/// Canonical small thumbnail and the image's identity.
///
/// Deterministic: same source bytes + same (box, quality) produce
/// byte-identical JPEG output and therefore the same hothash.
#[derive(Debug, Clone)]
pub struct HotPreview {
    /// Encoded JPEG bytes, EXIF stripped
    pub bytes: Vec<u8>,
    /// Base64 of `bytes` for JSON transport
    pub base64: String,
    /// SHA-256 hex digest of `bytes` (64 lowercase hex chars)
    pub hothash: String,
    /// Actual width after resize
    pub width: u32,
    /// Actual height after resize
    pub height: u32,
}

/// Variable-size viewing rendition. Same shape as [`HotPreview`] but
/// carries no hash; omission is a valid, common state.
#[derive(Debug, Clone)]
pub struct ColdPreview {
    /// Encoded JPEG bytes, EXIF stripped
    pub bytes: Vec<u8>,
    /// Base64 of `bytes` for JSON transport
    pub base64: String,
    /// Actual width after resize
    pub width: u32,
    /// Actual height after resize
    pub height: u32,
}

/// The canonical flat record for one processed image.
///
/// Field names and nullability are the persisted external contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    // === Identity ===
    /// SHA-256 of the hotpreview bytes, the primary content identity
    pub hothash: String,

    // === Hotpreview (always present) ===
    pub hotpreview_base64: String,
    pub hotpreview_width: u32,
    pub hotpreview_height: u32,

    // === Coldpreview (optional) ===
    pub coldpreview_base64: Option<String>,
    pub coldpreview_width: Option<u32>,
    pub coldpreview_height: Option<u32>,

    // === File info ===
    pub primary_filename: String,
    /// Source full-resolution width, independent of preview resizing
    pub width: Option<u32>,
    /// Source full-resolution height, independent of preview resizing
    pub height: Option<u32>,

    // === Timestamps ===
    pub taken_at: Option<String>,

    // === Camera ===
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,

    // === GPS ===
    pub gps_latitude: Option<f64>,
    pub gps_longitude: Option<f64>,
    pub gps_altitude: Option<f64>,
    pub gps_timestamp: Option<String>,
    pub gps_datestamp: Option<String>,
    pub gps_map_datum: Option<String>,
    pub has_gps: bool,

    // === Camera settings ===
    pub iso: Option<u32>,
    pub aperture: Option<f64>,
    pub shutter_speed: Option<String>,
    pub focal_length: Option<f64>,
    pub lens_model: Option<String>,
    pub lens_make: Option<String>,
    pub flash: Option<FlashState>,
    pub exposure_program: Option<ExposureProgram>,
    pub metering_mode: Option<MeteringMode>,
    pub white_balance: Option<WhiteBalanceMode>,
}

impl PhotoRecord {
    /// Filename to display, falling back to a hash-derived name.
    pub fn display_filename(&self) -> String {
        if self.primary_filename.is_empty() {
            format!("{}.jpg", &self.hothash[..8.min(self.hothash.len())])
        } else {
            self.primary_filename.clone()
        }
    }

    /// Formatted "Make Model" string when camera info is present.
    pub fn camera_info(&self) -> Option<String> {
        match (&self.camera_make, &self.camera_model) {
            (Some(make), Some(model)) => Some(format!("{make} {model}")),
            (None, Some(model)) => Some(model.clone()),
            _ => None,
        }
    }
}

/// Outcome of processing a single input: one per input, constructed
/// exactly once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOutcome {
    pub success: bool,
    pub hothash: Option<String>,
    pub record: Option<PhotoRecord>,
    pub error: Option<String>,
}

impl ProcessOutcome {
    /// Build a success outcome from an assembled record.
    pub fn ok(record: PhotoRecord) -> Self {
        Self {
            success: true,
            hothash: Some(record.hothash.clone()),
            record: Some(record),
            error: None,
        }
    }

    /// Build a failure outcome from a reason string.
    pub fn err(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            hothash: None,
            record: None,
            error: Some(reason.into()),
        }
    }

    /// Whether processing failed.
    pub fn failed(&self) -> bool {
        !self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> PhotoRecord {
        PhotoRecord {
            hothash: "a".repeat(64),
            hotpreview_base64: "aGk=".to_string(),
            hotpreview_width: 150,
            hotpreview_height: 100,
            coldpreview_base64: None,
            coldpreview_width: None,
            coldpreview_height: None,
            primary_filename: "beach.jpg".to_string(),
            width: Some(6000),
            height: Some(4000),
            taken_at: Some("2024-07-15T14:30:00".to_string()),
            camera_make: Some("Nikon".to_string()),
            camera_model: Some("Z 6".to_string()),
            gps_latitude: None,
            gps_longitude: None,
            gps_altitude: None,
            gps_timestamp: None,
            gps_datestamp: None,
            gps_map_datum: None,
            has_gps: false,
            iso: Some(100),
            aperture: Some(2.8),
            shutter_speed: Some("1/1000".to_string()),
            focal_length: Some(50.0),
            lens_model: None,
            lens_make: None,
            flash: Some(FlashState::NoFlash),
            exposure_program: Some(ExposureProgram::AperturePriority),
            metering_mode: Some(MeteringMode::MultiSegment),
            white_balance: Some(WhiteBalanceMode::Auto),
        }
    }

    #[test]
    fn record_serializes_optional_fields_as_null() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        // Absent coldpreview must be an explicit null, not omitted
        assert!(json.contains("\"coldpreview_base64\":null"));
        assert!(json.contains("\"gps_latitude\":null"));
        assert!(json.contains("\"has_gps\":false"));
    }

    #[test]
    fn enum_labels_match_contract() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        assert!(json.contains("\"flash\":\"No Flash\""));
        assert!(json.contains("\"exposure_program\":\"Aperture Priority\""));
        assert!(json.contains("\"metering_mode\":\"Multi-Segment\""));
        assert!(json.contains("\"white_balance\":\"Auto\""));
    }

    #[test]
    fn record_roundtrip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: PhotoRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.hothash, record.hothash);
        assert_eq!(parsed.exposure_program, record.exposure_program);
        assert_eq!(parsed.coldpreview_base64, None);
    }

    #[test]
    fn exposure_program_unknown_code() {
        assert_eq!(ExposureProgram::from_exif(42), ExposureProgram::Unknown);
        assert_eq!(ExposureProgram::from_exif(2), ExposureProgram::ProgramAe);
    }

    #[test]
    fn metering_mode_table() {
        assert_eq!(MeteringMode::from_exif(0), MeteringMode::Unknown);
        assert_eq!(MeteringMode::from_exif(3), MeteringMode::Spot);
        assert_eq!(MeteringMode::from_exif(99), MeteringMode::Unknown);
    }

    #[test]
    fn flash_bit_zero() {
        assert_eq!(FlashState::from_exif(0x19), FlashState::Fired);
        assert_eq!(FlashState::from_exif(0x10), FlashState::NoFlash);
    }

    #[test]
    fn display_filename_falls_back_to_hash() {
        let mut record = sample_record();
        record.primary_filename = String::new();
        assert_eq!(record.display_filename(), "aaaaaaaa.jpg");
    }

    #[test]
    fn camera_info_formats() {
        let record = sample_record();
        assert_eq!(record.camera_info().as_deref(), Some("Nikon Z 6"));
    }

    #[test]
    fn outcome_constructors() {
        let ok = ProcessOutcome::ok(sample_record());
        assert!(ok.success);
        assert_eq!(ok.hothash.as_deref(), Some("a".repeat(64).as_str()));

        let err = ProcessOutcome::err("File not found: x.jpg");
        assert!(err.failed());
        assert!(err.record.is_none());
    }
}
