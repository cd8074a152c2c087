//! Read/write results JSON files.
//!
//! The results file is the portable record of a run: every amplitude series
//! with its full coefficient maps, plus when and how it was produced. It can be
//! reloaded to redraw figures without refitting.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::AmplitudeSeries;
use crate::error::AppError;

/// On-disk results schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    pub detector_config: String,
    pub alpha: f64,
    pub series: Vec<AmplitudeSeries>,
}

/// Write a results JSON file.
pub fn write_results_json(path: &Path, results: &ResultsFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create results JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, results)
        .map_err(|e| AppError::usage(format!("Failed to write results JSON: {e}")))?;
    Ok(())
}

/// Read a results JSON file.
pub fn read_results_json(path: &Path) -> Result<ResultsFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open results JSON '{}': {e}", path.display())))?;
    let results: ResultsFile =
        serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid results JSON: {e}")))?;
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AmplitudePoint, DipoleSummary, FitParams, energy_bins};

    #[test]
    fn results_survive_a_file_round_trip() {
        let mut params = FitParams {
            lmax: 1,
            chi2: 3.5,
            ndof: 2,
            npix: 6,
            ..FitParams::default()
        };
        params.values.insert("Y(1,1)".to_string(), 2.5e-3);
        params.errors.insert("Y(1,1)".to_string(), 1.0e-4);

        let results = ResultsFile {
            tool: "dipole-sh-fit".to_string(),
            generated: Utc::now(),
            detector_config: "IC".to_string(),
            alpha: 0.05,
            series: vec![AmplitudeSeries {
                lmax: 1,
                points: vec![AmplitudePoint {
                    bin: energy_bins()[4],
                    dipole: DipoleSummary {
                        amplitude: 1.2e-3,
                        amplitude_err: 2.0e-4,
                        phase: 30.0,
                        phase_err: 8.0,
                    },
                    params,
                }],
            }],
        };

        let path = std::env::temp_dir().join(format!("sh-amplitude-results-{}.json", std::process::id()));
        write_results_json(&path, &results).unwrap();
        let back = read_results_json(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(back.series.len(), 1);
        let pt = &back.series[0].points[0];
        assert_eq!(pt.bin.index, 5);
        assert_eq!(pt.params.value("Y(1,1)"), Some(2.5e-3));
        assert_eq!(pt.dipole.phase, 30.0);
    }

    #[test]
    fn malformed_json_is_an_input_error() {
        let path = std::env::temp_dir().join(format!("sh-amplitude-bad-{}.json", std::process::id()));
        std::fs::write(&path, b"{not json").unwrap();
        let err = read_results_json(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(err.exit_code(), AppError::INPUT);
    }
}
