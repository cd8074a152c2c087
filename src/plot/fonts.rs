//! Font registration for chart text.
//!
//! Plotters is built with the `ab_glyph` text backend, which renders from font
//! bytes we register at runtime instead of querying fontconfig. We register one
//! regular face under both generic families used by the charts.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::debug;
use plotters::style::{FontStyle, register_font};

use crate::error::AppError;

/// Common locations of a regular sans-serif face on Linux and macOS.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

static REGISTERED: OnceLock<Result<PathBuf, String>> = OnceLock::new();

/// First usable font: the explicit path if given, else a known system font.
pub fn find_font(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.is_file().then(|| path.to_path_buf());
    }
    SYSTEM_FONTS.iter().map(PathBuf::from).find(|p| p.is_file())
}

/// Register the chart font once per process.
pub fn ensure_fonts(explicit: Option<&Path>) -> Result<PathBuf, AppError> {
    REGISTERED
        .get_or_init(|| register(explicit))
        .clone()
        .map_err(AppError::render)
}

fn register(explicit: Option<&Path>) -> Result<PathBuf, String> {
    let path = find_font(explicit).ok_or_else(|| {
        "No font found for chart text; set SHFIT_FONT to a .ttf/.otf file.".to_string()
    })?;
    let bytes = std::fs::read(&path).map_err(|e| format!("Failed to read font '{}': {e}", path.display()))?;
    // Plotters keeps registered fonts for the life of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    for family in ["sans-serif", "serif"] {
        register_font(family, FontStyle::Normal, bytes)
            .map_err(|_| format!("'{}' is not a usable font file.", path.display()))?;
    }
    debug!("registered chart font {}", path.display());
    Ok(path)
}
