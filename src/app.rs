//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and environment defaults
//! - runs the fitting pipeline (or reloads a results file)
//! - prints tables and terminal charts
//! - writes figure files and optional exports

use chrono::Utc;
use clap::Parser;
use log::{debug, info};

use crate::cli::Cli;
use crate::config::EnvDefaults;
use crate::domain::{AmplitudeSeries, FitOptions, PlotOptions, RunConfig, SkyCuts};
use crate::error::AppError;
use crate::io::{ResultsFile, read_results_json, write_results_json, write_series_csv};
use crate::plot::{ChartSpec, ensure_fonts, is_supported_ext, output_path, render_ascii_chart, render_chart_file};

pub mod pipeline;

const TOOL_NAME: &str = "dipole-sh-fit";
const ASCII_WIDTH: usize = 72;
const ASCII_HEIGHT: usize = 20;

/// Entry point for the `dipole-sh-fit` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run_with(&cli, &EnvDefaults::from_env())
}

/// Run with already-parsed arguments and environment defaults.
pub fn run_with(cli: &Cli, env: &EnvDefaults) -> Result<(), AppError> {
    let config = run_config_from_args(cli, env)?;
    for flag in cli.map_view_flags() {
        debug!("{flag} only applies to sky-map views; ignored");
    }

    let series = match &cli.from_results {
        Some(path) => {
            let results = read_results_json(path)?;
            info!(
                "loaded {} series from {} (generated {})",
                results.series.len(),
                path.display(),
                results.generated
            );
            results.series
        }
        None => pipeline::run_fit(&config)?,
    };

    present(&config, &series)?;
    export(&config, &series)
}

/// `info` by default, `debug` with `--verbose`; `RUST_LOG` wins over both.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).try_init();
}

pub fn run_config_from_args(cli: &Cli, env: &EnvDefaults) -> Result<RunConfig, AppError> {
    if cli.lmax < 1 {
        return Err(AppError::usage("--lmax must be at least 1."));
    }
    if !is_supported_ext(&cli.ext) {
        return Err(AppError::usage(format!(
            "Unsupported output extension '{}' (use png, jpg, jpeg, bmp or svg).",
            cli.ext
        )));
    }
    if !(cli.alpha.is_finite() && cli.alpha > 0.0) {
        return Err(AppError::usage(format!("--alpha must be positive, got {}.", cli.alpha)));
    }
    if !(cli.smooth.is_finite() && cli.smooth >= 0.0) {
        return Err(AppError::usage(format!("--smooth must be >= 0, got {}.", cli.smooth)));
    }
    if !(cli.swindow.is_finite() && cli.swindow > 0.0) {
        return Err(AppError::usage(format!("--swindow must be positive, got {}.", cli.swindow)));
    }
    if cli.decmin > cli.decmax {
        return Err(AppError::usage(format!(
            "--decmin ({}) is above --decmax ({}).",
            cli.decmin, cli.decmax
        )));
    }

    let cuts = SkyCuts {
        dec_min: cli.decmin,
        dec_max: cli.decmax,
        ra_min: cli.ramin,
        ra_max: cli.ramax,
        mask: cli.mask,
        threshold: cli.threshold,
        scale: cli.scale,
        smooth_radius: cli.smooth,
        smooth_kind: cli.stype,
        smooth_window: cli.swindow,
    };

    Ok(RunConfig {
        map_dir: cli.filepath.clone().unwrap_or_else(|| env.map_dir_or_cwd()),
        detector_config: cli
            .config
            .clone()
            .unwrap_or_else(|| env.detector_config_or_default()),
        pattern: cli.pattern.clone().unwrap_or_else(|| env.pattern_or_default()),
        lmax: cli.lmax,
        fit: FitOptions {
            alpha: cli.alpha,
            cuts,
            frame: cli.coords,
            fix_multi: cli.fix_multi,
        },
        plot: PlotOptions {
            y_min: cli.min,
            y_max: cli.max,
            title: cli.title,
            prelim: cli.prelim,
            left_label: cli.llabel.clone(),
            right_label: cli.rlabel.clone(),
            output: cli.output,
            out_dir: cli.out_dir.clone(),
            custom_out: cli.custom_out.clone(),
            plot_name: cli.plotname.clone(),
            ext: cli.ext.to_ascii_lowercase(),
            show: !cli.noshow && !cli.batchmode,
        },
        print_params: cli.params && !cli.no_params,
        export_csv: cli.export.clone(),
        export_json: cli.export_json.clone(),
        font: env.font.clone(),
    })
}

fn present(config: &RunConfig, series: &[AmplitudeSeries]) -> Result<(), AppError> {
    for s in series {
        println!("{}", crate::report::format_series_table(s));
        if config.print_params {
            println!("{}", crate::report::format_series_params(s));
        }

        let spec = ChartSpec::amplitude(s, &config.plot);
        if config.plot.output {
            ensure_fonts(config.font.as_deref())?;
            let path = output_path(&config.plot, s.lmax);
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir).map_err(|e| {
                    AppError::usage(format!("Cannot create output directory '{}': {e}", dir.display()))
                })?;
            }
            render_chart_file(&spec, &path)?;
            info!("wrote {}", path.display());
        }
        if config.plot.show {
            println!("{}", render_ascii_chart(&spec, ASCII_WIDTH, ASCII_HEIGHT));
        }
    }
    Ok(())
}

fn export(config: &RunConfig, series: &[AmplitudeSeries]) -> Result<(), AppError> {
    if let Some(path) = &config.export_csv {
        write_series_csv(path, series)?;
        info!("wrote {}", path.display());
    }
    if let Some(path) = &config.export_json {
        let results = ResultsFile {
            tool: TOOL_NAME.to_string(),
            generated: Utc::now(),
            detector_config: config.detector_config.clone(),
            alpha: config.fit.alpha,
            series: series.to_vec(),
        };
        write_results_json(path, &results)?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::domain::{AmplitudePoint, DipoleSummary, FitParams, energy_bins};

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec![TOOL_NAME];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn config_defaults_follow_flags_and_environment() {
        let env = EnvDefaults {
            map_dir: Some(PathBuf::from("/data/maps")),
            detector_config: Some("IC86".to_string()),
            ..EnvDefaults::default()
        };
        let config = run_config_from_args(&cli(&["-b"]), &env).unwrap();
        assert_eq!(config.map_dir, PathBuf::from("/data/maps"));
        assert_eq!(config.detector_config, "IC86");
        assert_eq!(config.pattern, crate::io::DEFAULT_PATTERN);
        assert_eq!(config.lmax, 1);
        assert!(config.print_params);
        assert!(!config.plot.show);

        let config = run_config_from_args(&cli(&["-f", "/elsewhere", "--config", "IC59", "--no-params"]), &env).unwrap();
        assert_eq!(config.map_dir, PathBuf::from("/elsewhere"));
        assert_eq!(config.detector_config, "IC59");
        assert!(!config.print_params);
        assert!(config.plot.show);
    }

    #[test]
    fn invalid_options_are_usage_errors() {
        let env = EnvDefaults::default();
        for args in [
            &["--lmax", "0"][..],
            &["--ext", "pdf"][..],
            &["--alpha", "0"][..],
            &["-d", "10", "-D", "-10"][..],
        ] {
            let err = run_config_from_args(&cli(args), &env).unwrap_err();
            assert_eq!(err.exit_code(), AppError::USAGE, "{args:?}");
        }
    }

    #[test]
    fn redraws_and_exports_from_a_results_file() {
        let dir = std::env::temp_dir().join(format!("sh-amplitude-app-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let json = dir.join("results.json");
        let csv = dir.join("amplitude.csv");

        let series = AmplitudeSeries {
            lmax: 1,
            points: energy_bins()
                .into_iter()
                .take(2)
                .map(|bin| AmplitudePoint {
                    bin,
                    dipole: DipoleSummary {
                        amplitude: 1.0e-3,
                        amplitude_err: 1.0e-4,
                        phase: 45.0,
                        phase_err: 5.0,
                    },
                    params: FitParams {
                        lmax: 1,
                        ..FitParams::default()
                    },
                })
                .collect(),
        };
        let results = ResultsFile {
            tool: TOOL_NAME.to_string(),
            generated: Utc::now(),
            detector_config: "IC".to_string(),
            alpha: 0.05,
            series: vec![series],
        };
        write_results_json(&json, &results).unwrap();

        let args = cli(&[
            "--from-results",
            json.to_str().unwrap(),
            "--noshow",
            "--export",
            csv.to_str().unwrap(),
        ]);
        run_with(&args, &EnvDefaults::default()).unwrap();

        let text = std::fs::read_to_string(&csv).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(1).unwrap().starts_with("1,1,4.12,"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
