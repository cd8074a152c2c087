//! Command-line parsing for the multipole amplitude plotter.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fitting and plotting code. Long option names keep the spelling researchers
//! already have in their batch scripts (`--outDir`, `--fix_multi`, ...).

use std::path::PathBuf;

use clap::Parser;

use crate::domain::{CoordFrame, SmoothKind};

/// Default figure directory.
pub const DEFAULT_OUT_DIR: &str = "/home/jbourbeau/public_html/figures/SH-fit/";

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "dipole-sh-fit",
    version,
    about = "Fit spherical-harmonic multipoles to HEALPix maps per energy bin and plot amplitude vs. energy"
)]
pub struct Cli {
    /// Directory holding the per-energy-bin HEALPix maps (default: $SHFIT_MAP_DIR or `.`).
    #[arg(short = 'f', long)]
    pub filepath: Option<PathBuf>,

    /// Plot minimum value (y axis).
    #[arg(short = 'm', long = "min", allow_negative_numbers = true)]
    pub min: Option<f64>,

    /// Plot maximum value (y axis).
    #[arg(short = 'M', long = "max", allow_negative_numbers = true)]
    pub max: Option<f64>,

    /// Minimum declination value (90 -> -90).
    #[arg(short = 'd', long, default_value_t = -90.0, allow_negative_numbers = true)]
    pub decmin: f64,

    /// Maximum declination value (90 -> -90).
    #[arg(short = 'D', long, default_value_t = -25.0, allow_negative_numbers = true)]
    pub decmax: f64,

    /// Minimum RA value (degrees; negative values wrap, e.g. -30 = 330).
    #[arg(short = 'r', long, allow_negative_numbers = true)]
    pub ramin: Option<f64>,

    /// Maximum RA value (degrees).
    #[arg(short = 'R', long, allow_negative_numbers = true)]
    pub ramax: Option<f64>,

    /// Intelligent masking (drop field-of-view edges with little background).
    #[arg(long)]
    pub mask: bool,

    /// Execute without interaction (implies --noshow).
    #[arg(short = 'b', long)]
    pub batchmode: bool,

    /// Output image files.
    #[arg(short = 'o', long)]
    pub output: bool,

    /// Map type desired (signal, relint, relint_err, data, bg); map views only.
    #[arg(short = 'n', long = "mapName")]
    pub map_name: Option<String>,

    /// Scale the map after input.
    #[arg(short = 's', long)]
    pub scale: Option<f64>,

    /// Desired smoothing radius (in degrees).
    #[arg(short = 'S', long, default_value_t = 0.0)]
    pub smooth: f64,

    /// Option for smoothing type.
    #[arg(long, value_enum, default_value_t = SmoothKind::Tophat)]
    pub stype: SmoothKind,

    /// Option for smoothing window (Gaussian truncation in sigmas).
    #[arg(long, default_value_t = 3.0)]
    pub swindow: f64,

    /// Highest l value to be fit (l=1: dipole, l=2: quadrupole, etc.).
    #[arg(long, default_value_t = 1)]
    pub lmax: usize,

    /// Fix multipole subtraction to values from cumulative map.
    #[arg(long = "fix_multi")]
    pub fix_multi: bool,

    /// Drop pixels whose relative intensity exceeds this magnitude.
    #[arg(short = 'x', long)]
    pub threshold: Option<f64>,

    /// Harmonic frame: C=equatorial, G=galactic, E=ecliptic.
    #[arg(short = 'c', long, value_enum, default_value_t = CoordFrame::Equatorial)]
    pub coords: CoordFrame,

    /// Show the galactic plane (map views only).
    #[arg(long)]
    pub gplane: bool,

    /// Show only bottom half of the sky (map views only).
    #[arg(long)]
    pub half: bool,

    /// Show a descriptive title on the plot.
    #[arg(long)]
    pub title: bool,

    /// Option for changing output directory.
    #[arg(long = "outDir", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Indicate plot is preliminary.
    #[arg(long)]
    pub prelim: bool,

    /// Optional left label overlay.
    #[arg(long)]
    pub llabel: Option<String>,

    /// Optional right label overlay.
    #[arg(long)]
    pub rlabel: Option<String>,

    /// Polar gnomonic view of map (map views only).
    #[arg(long)]
    pub polar: bool,

    /// Custom output path prefix (replaces `<outDir>/amplitude`).
    #[arg(long = "customOut")]
    pub custom_out: Option<PathBuf>,

    /// Output file extension (png, jpg, jpeg, bmp, svg).
    #[arg(long, default_value = "png")]
    pub ext: String,

    /// Verbose output.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Print fitted parameters (enabled by default).
    #[arg(long, default_value_t = true)]
    pub params: bool,

    /// Do not print fitted parameters.
    #[arg(long)]
    pub no_params: bool,

    /// Use spherical harmonic fits instead of raw data (map views only).
    #[arg(long)]
    pub usefit: bool,

    /// Output plot file stem (replaces `amplitude`).
    #[arg(long)]
    pub plotname: Option<String>,

    /// Do not display plots.
    #[arg(long)]
    pub noshow: bool,

    /// Detector configuration prefix of the map files (default: $SHFIT_CONFIG or IC).
    #[arg(long)]
    pub config: Option<String>,

    /// Map file-name template with {config}, {bin} and `*` (default: $SHFIT_PATTERN).
    #[arg(long)]
    pub pattern: Option<String>,

    /// On/off exposure ratio used in the relative-intensity error.
    #[arg(long, default_value_t = 1.0 / 20.0)]
    pub alpha: f64,

    /// Export the amplitude series to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export all fit results to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,

    /// Redraw figures from a results JSON instead of fitting maps.
    #[arg(long = "from-results", value_name = "JSON")]
    pub from_results: Option<PathBuf>,
}

impl Cli {
    /// Flags that only affect sky-map views, which this tool does not draw.
    pub fn map_view_flags(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.map_name.is_some() {
            out.push("--mapName");
        }
        if self.gplane {
            out.push("--gplane");
        }
        if self.half {
            out.push("--half");
        }
        if self.polar {
            out.push("--polar");
        }
        if self.usefit {
            out.push("--usefit");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let cli = Cli::try_parse_from(["dipole-sh-fit"]).unwrap();
        assert_eq!(cli.decmin, -90.0);
        assert_eq!(cli.decmax, -25.0);
        assert_eq!(cli.lmax, 1);
        assert_eq!(cli.smooth, 0.0);
        assert_eq!(cli.swindow, 3.0);
        assert_eq!(cli.stype, SmoothKind::Tophat);
        assert_eq!(cli.coords, CoordFrame::Equatorial);
        assert_eq!(cli.out_dir, PathBuf::from(DEFAULT_OUT_DIR));
        assert_eq!(cli.ext, "png");
        assert!((cli.alpha - 0.05).abs() < 1e-15);
        assert!(cli.params);
        assert!(!cli.output && !cli.noshow && !cli.batchmode);
    }

    #[test]
    fn legacy_spellings_and_short_flags_parse() {
        let cli = Cli::try_parse_from([
            "dipole-sh-fit",
            "-o",
            "-b",
            "--lmax",
            "3",
            "--fix_multi",
            "--outDir",
            "/tmp/figs",
            "--customOut",
            "/tmp/figs/custom",
            "-D",
            "-30",
            "-m",
            "0",
            "-M",
            "0.0016",
            "-c",
            "G",
            "--stype",
            "gauss",
            "--mapName",
            "relint",
        ])
        .unwrap();
        assert!(cli.output && cli.batchmode && cli.fix_multi);
        assert_eq!(cli.lmax, 3);
        assert_eq!(cli.decmax, -30.0);
        assert_eq!(cli.max, Some(0.0016));
        assert_eq!(cli.coords, CoordFrame::Galactic);
        assert_eq!(cli.stype, SmoothKind::Gauss);
        assert_eq!(cli.map_view_flags(), vec!["--mapName"]);
    }

    #[test]
    fn negative_ra_bounds_parse() {
        let cli = Cli::try_parse_from(["dipole-sh-fit", "-r", "-30", "-R", "30"]).unwrap();
        assert_eq!(cli.ramin, Some(-30.0));
        assert_eq!(cli.ramax, Some(30.0));
    }

    #[test]
    fn unknown_frame_is_rejected() {
        assert!(Cli::try_parse_from(["dipole-sh-fit", "-c", "X"]).is_err());
    }
}
