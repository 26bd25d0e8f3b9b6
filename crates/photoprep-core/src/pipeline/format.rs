//! File-format identification from extensions.
//!
//! Pure functions of the filename: no file is ever opened here. An
//! extension outside the supported set is rejected later by the
//! validator with an unsupported-format error.

use std::path::Path;

/// Format identity derived from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Tiff,
    WebP,
    Heic,
    /// Any vendor RAW container (NEF, CR2, ARW, DNG, ...)
    Raw,
}

impl SourceFormat {
    /// Lowercase name for logs and output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Tiff => "tiff",
            Self::WebP => "webp",
            Self::Heic => "heic",
            Self::Raw => "raw",
        }
    }
}

/// Vendor RAW extensions, lowercase without the dot.
/// DNG is listed as a universal RAW container.
const RAW_EXTENSIONS: &[&str] = &[
    "nef", "nrw", // Nikon
    "cr2", "cr3", "crw", // Canon
    "arw", "srf", "sr2", // Sony
    "raf", // Fujifilm
    "orf", // Olympus/OM System
    "rw2", "raw", // Panasonic
    "pef", "ptx", // Pentax
    "x3f", // Sigma
    "rwl", "dng", // Leica / universal
    "mrw", // Minolta
    "srw", // Samsung
    "3fr", // Hasselblad
    "dcr", "kdc", // Kodak
    "mef", // Mamiya
    "iiq", // Phase One
];

/// Lowercased extension of a path, if any.
fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Detect the format identity of a filename. Returns `None` for
/// unsupported or missing extensions.
pub fn detect(path: &Path) -> Option<SourceFormat> {
    let ext = extension(path)?;
    if RAW_EXTENSIONS.contains(&ext.as_str()) {
        return Some(SourceFormat::Raw);
    }
    match ext.as_str() {
        "jpg" | "jpeg" => Some(SourceFormat::Jpeg),
        "png" => Some(SourceFormat::Png),
        "tiff" | "tif" => Some(SourceFormat::Tiff),
        "webp" => Some(SourceFormat::WebP),
        "heic" => Some(SourceFormat::Heic),
        _ => None,
    }
}

/// Whether the filename has a vendor RAW extension.
pub fn is_raw(path: &Path) -> bool {
    matches!(detect(path), Some(SourceFormat::Raw))
}

/// Whether the extension is in the supported set.
pub fn is_supported(path: &Path) -> bool {
    detect(path).is_some()
}
