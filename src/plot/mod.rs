//! Amplitude-vs-energy figures.
//!
//! Chart content is computed once into a render-only [`ChartSpec`] and then
//! drawn by either back end:
//!
//! - image files through Plotters (`chart`)
//! - a terminal rendering standing in for the interactive display (`ascii`)

use std::path::PathBuf;

use crate::domain::{AmplitudeSeries, PlotOptions};

pub mod ascii;
pub mod chart;
pub mod fonts;

pub use ascii::*;
pub use chart::*;
pub use fonts::*;

/// Fixed x range: log10(E/GeV).
pub const X_BOUNDS: [f64; 2] = [3.5, 7.5];
/// Default y range: relative amplitude.
pub const Y_BOUNDS: [f64; 2] = [0.0, 0.004];

pub const X_LABEL: &str = "log10(E/GeV)";
pub const Y_LABEL: &str = "ΔN/<N>";
pub const PRELIM_LABEL: &str = "IceCube Preliminary";

/// One marker with asymmetric x and symmetric y error bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorPoint {
    pub x: f64,
    pub x_lo: f64,
    pub x_hi: f64,
    pub y: f64,
    pub y_lo: f64,
    pub y_hi: f64,
}

/// A lightweight, render-only chart description.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: String,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub points: Vec<ErrorPoint>,
    pub prelim: bool,
    pub left_label: Option<String>,
    pub right_label: Option<String>,
}

impl ChartSpec {
    /// Build the amplitude chart of one series.
    pub fn amplitude(series: &AmplitudeSeries, opts: &PlotOptions) -> Self {
        let title = if opts.title {
            format!("Dipole amplitude vs. energy (l_max = {})", series.lmax)
        } else {
            format!("l_max = {}", series.lmax)
        };

        let mut y_bounds = [
            opts.y_min.unwrap_or(Y_BOUNDS[0]),
            opts.y_max.unwrap_or(Y_BOUNDS[1]),
        ];
        if !(y_bounds[1] > y_bounds[0]) {
            log::warn!(
                "ignoring y range [{}, {}]; using [{}, {}]",
                y_bounds[0],
                y_bounds[1],
                Y_BOUNDS[0],
                Y_BOUNDS[1]
            );
            y_bounds = Y_BOUNDS;
        }

        let points = series
            .points
            .iter()
            .map(|pt| ErrorPoint {
                x: pt.bin.median,
                x_lo: pt.bin.median - pt.bin.err_lower,
                x_hi: pt.bin.median + pt.bin.err_upper,
                y: pt.dipole.amplitude,
                y_lo: pt.dipole.amplitude - pt.dipole.amplitude_err,
                y_hi: pt.dipole.amplitude + pt.dipole.amplitude_err,
            })
            .collect();

        Self {
            title,
            x_bounds: X_BOUNDS,
            y_bounds,
            points,
            prelim: opts.prelim,
            left_label: opts.left_label.clone(),
            right_label: opts.right_label.clone(),
        }
    }
}

/// Output file for the figure of multipole order `lmax`.
///
/// `<outDir>/amplitude_lmax<l>.<ext>`, where `--plotname` replaces the
/// `amplitude` stem and `--customOut` replaces `<outDir>/amplitude` entirely.
pub fn output_path(opts: &PlotOptions, lmax: usize) -> PathBuf {
    let file = |stem: &str| format!("{stem}_lmax{lmax}.{}", opts.ext);
    match (&opts.custom_out, &opts.plot_name) {
        (Some(prefix), _) => {
            let stem = prefix
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "amplitude".to_string());
            prefix.with_file_name(file(&stem))
        }
        (None, Some(name)) => opts.out_dir.join(file(name)),
        (None, None) => opts.out_dir.join(file("amplitude")),
    }
}
