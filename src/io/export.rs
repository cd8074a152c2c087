//! Export amplitude series to CSV.
//!
//! One row per (lmax, energy bin); meant for spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::AmplitudeSeries;
use crate::error::AppError;

/// Write every series to a CSV file.
pub fn write_series_csv(path: &Path, series: &[AmplitudeSeries]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(
        file,
        "lmax,bin,energy_median,amplitude,amplitude_err,phase_deg,phase_err_deg,chi2,ndof,npix"
    )
    .map_err(|e| AppError::usage(format!("Failed to write export CSV header: {e}")))?;

    for s in series {
        for pt in &s.points {
            writeln!(
                file,
                "{},{},{:.2},{:.8e},{:.8e},{:.4},{:.4},{:.4},{},{}",
                s.lmax,
                pt.bin.index,
                pt.bin.median,
                pt.dipole.amplitude,
                pt.dipole.amplitude_err,
                pt.dipole.phase,
                pt.dipole.phase_err,
                pt.params.chi2,
                pt.params.ndof,
                pt.params.npix,
            )
            .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AmplitudePoint, DipoleSummary, FitParams, energy_bins};

    #[test]
    fn csv_has_header_and_one_row_per_point() {
        let bins = energy_bins();
        let series = vec![AmplitudeSeries {
            lmax: 2,
            points: bins[..2]
                .iter()
                .map(|&bin| AmplitudePoint {
                    bin,
                    dipole: DipoleSummary {
                        amplitude: 1.0e-3,
                        amplitude_err: 1.0e-4,
                        phase: 45.0,
                        phase_err: 5.0,
                    },
                    params: FitParams {
                        lmax: 2,
                        chi2: 10.0,
                        ndof: 8,
                        npix: 17,
                        ..FitParams::default()
                    },
                })
                .collect(),
        }];

        let path = std::env::temp_dir().join(format!("sh-amplitude-export-{}.csv", std::process::id()));
        write_series_csv(&path, &series).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("lmax,bin,energy_median"));
        assert_eq!(
            lines[2],
            "2,2,4.38,1.00000000e-3,1.00000000e-4,45.0000,5.0000,10.0000,8,17"
        );
        std::fs::remove_file(&path).unwrap();
    }
}
