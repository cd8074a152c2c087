//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - used in-memory while fitting
//! - exported to CSV/JSON
//! - rendered by both the chart and terminal plotters

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// HEALPix sentinel for pixels without data.
pub const UNSEEN: f64 = -1.6375e30;

/// Pixel numbering scheme of a HEALPix map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelOrdering {
    Ring,
    Nested,
}

impl PixelOrdering {
    /// Parse the FITS `ORDERING` header value.
    pub fn from_header(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "RING" => Some(PixelOrdering::Ring),
            "NESTED" | "NEST" => Some(PixelOrdering::Nested),
            _ => None,
        }
    }
}

/// Coordinate frame in which spherical harmonics are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum CoordFrame {
    /// Equatorial (J2000).
    #[value(name = "C")]
    #[serde(rename = "C")]
    Equatorial,
    /// Galactic.
    #[value(name = "G")]
    #[serde(rename = "G")]
    Galactic,
    /// Ecliptic (J2000).
    #[value(name = "E")]
    #[serde(rename = "E")]
    Ecliptic,
}

/// Smoothing kernel shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SmoothKind {
    /// Sum of counts within the smoothing radius.
    Tophat,
    /// Gaussian-weighted counts, truncated at `window * radius`.
    Gauss,
}

/// Per-pixel (data, background, local) counts of one sky map or of a sum of maps.
#[derive(Debug, Clone, PartialEq)]
pub struct MapTriple {
    pub nside: u32,
    pub ordering: PixelOrdering,
    pub data: Vec<f64>,
    pub background: Vec<f64>,
    pub local: Vec<f64>,
}

impl MapTriple {
    pub fn npix(&self) -> usize {
        self.data.len()
    }
}

/// One energy bin: median `log10(E/GeV)` with asymmetric spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyBin {
    /// 1-based bin index (matches the `{bin}` token of map file names).
    pub index: usize,
    pub median: f64,
    pub err_lower: f64,
    pub err_upper: f64,
}

const BIN_MEDIANS: [f64; 9] = [4.12, 4.38, 4.58, 4.85, 5.12, 5.38, 5.77, 6.13, 6.73];
const BIN_ERR_LOWER: [f64; 9] = [0.62, 0.65, 0.68, 0.73, 0.74, 0.75, 0.6, 0.52, 0.46];
const BIN_ERR_UPPER: [f64; 9] = [0.5, 0.54, 0.55, 0.64, 0.72, 0.78, 0.83, 0.63, 0.58];

/// The IceCube energy binning used for the amplitude-vs-energy figure.
pub fn energy_bins() -> Vec<EnergyBin> {
    (0..BIN_MEDIANS.len())
        .map(|i| EnergyBin {
            index: i + 1,
            median: BIN_MEDIANS[i],
            err_lower: BIN_ERR_LOWER[i],
            err_upper: BIN_ERR_UPPER[i],
        })
        .collect()
}

/// Label of a spherical-harmonic coefficient, e.g. `Y(1,-1)`.
pub fn coefficient_label(l: usize, m: i64) -> String {
    format!("Y({l},{m})")
}

/// All coefficient labels up to `lmax` in fit order: `l` ascending, `m = -l..=l`.
pub fn coefficient_labels(lmax: usize) -> Vec<String> {
    let mut out = Vec::with_capacity((lmax + 1) * (lmax + 1));
    for l in 0..=lmax {
        for m in -(l as i64)..=(l as i64) {
            out.push(coefficient_label(l, m));
        }
    }
    out
}

/// Fitted spherical-harmonic coefficients of one map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FitParams {
    pub lmax: usize,
    pub values: BTreeMap<String, f64>,
    pub errors: BTreeMap<String, f64>,
    pub chi2: f64,
    pub ndof: usize,
    pub npix: usize,
}

impl FitParams {
    pub fn value(&self, label: &str) -> Option<f64> {
        self.values.get(label).copied()
    }

    pub fn error(&self, label: &str) -> Option<f64> {
        self.errors.get(label).copied()
    }

    /// `chi2 / ndof`, or NaN when there are no degrees of freedom.
    pub fn reduced_chi2(&self) -> f64 {
        if self.ndof == 0 {
            f64::NAN
        } else {
            self.chi2 / self.ndof as f64
        }
    }
}

/// Dipole amplitude and phase (degrees) with 1-sigma errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DipoleSummary {
    pub amplitude: f64,
    pub amplitude_err: f64,
    pub phase: f64,
    pub phase_err: f64,
}

/// One energy bin's result for a given `lmax`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmplitudePoint {
    pub bin: EnergyBin,
    pub dipole: DipoleSummary,
    pub params: FitParams,
}

/// Accumulated results across energy bins for one multipole order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmplitudeSeries {
    pub lmax: usize,
    pub points: Vec<AmplitudePoint>,
}

/// Region and pixel-selection options for turning counts into a fit input.
#[derive(Debug, Clone)]
pub struct SkyCuts {
    pub dec_min: f64,
    pub dec_max: f64,
    pub ra_min: Option<f64>,
    pub ra_max: Option<f64>,
    pub mask: bool,
    pub threshold: Option<f64>,
    pub scale: Option<f64>,
    pub smooth_radius: f64,
    pub smooth_kind: SmoothKind,
    pub smooth_window: f64,
}

impl Default for SkyCuts {
    fn default() -> Self {
        Self {
            dec_min: -90.0,
            dec_max: -25.0,
            ra_min: None,
            ra_max: None,
            mask: false,
            threshold: None,
            scale: None,
            smooth_radius: 0.0,
            smooth_kind: SmoothKind::Tophat,
            smooth_window: 3.0,
        }
    }
}

/// Options that shape the multipole fit itself.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Weight of background relative to data (`alpha = t_on / t_off`).
    pub alpha: f64,
    pub cuts: SkyCuts,
    pub frame: CoordFrame,
    /// Hold `l >= 2` terms at the values fitted on the cumulative map.
    pub fix_multi: bool,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            alpha: 1.0 / 20.0,
            cuts: SkyCuts::default(),
            frame: CoordFrame::Equatorial,
            fix_multi: false,
        }
    }
}

/// Figure appearance and output options.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub title: bool,
    pub prelim: bool,
    pub left_label: Option<String>,
    pub right_label: Option<String>,
    pub output: bool,
    pub out_dir: PathBuf,
    pub custom_out: Option<PathBuf>,
    pub plot_name: Option<String>,
    pub ext: String,
    pub show: bool,
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags plus environment defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub map_dir: PathBuf,
    pub detector_config: String,
    pub pattern: String,
    pub lmax: usize,
    pub fit: FitOptions,
    pub plot: PlotOptions,
    pub print_params: bool,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
    pub font: Option<PathBuf>,
}
