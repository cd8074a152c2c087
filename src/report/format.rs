//! Terminal tables for fit results.
//!
//! Formatting lives here so the fitting code never prints, and so output
//! changes stay localized (the tests below pin the layout).

use crate::domain::{AmplitudePoint, AmplitudeSeries, coefficient_labels};

/// Amplitude/phase table of one series, one row per energy bin.
pub fn format_series_table(series: &AmplitudeSeries) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Dipole amplitude vs. energy (l_max = {}) ===\n", series.lmax));
    out.push_str(
        format!(
            "{:<4} {:>7} {:>11} {:>11} {:>8} {:>8} {:>10} {:>7}\n",
            "bin", "logE", "amplitude", "amp_err", "phase", "ph_err", "chi2/ndof", "npix"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<4} {:-<7} {:-<11} {:-<11} {:-<8} {:-<8} {:-<10} {:-<7}\n",
            "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for pt in &series.points {
        out.push_str(
            format!(
                "{:<4} {:>7.2} {:>11.3e} {:>11.3e} {:>8.1} {:>8.1} {:>10.3} {:>7}\n",
                format!("E{:02}", pt.bin.index),
                pt.bin.median,
                pt.dipole.amplitude,
                pt.dipole.amplitude_err,
                pt.dipole.phase,
                pt.dipole.phase_err,
                pt.params.reduced_chi2(),
                pt.params.npix,
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// Every fitted coefficient of one bin, in fit order.
pub fn format_params(point: &AmplitudePoint) -> String {
    let p = &point.params;
    let mut out = format!(
        "E{:02} (logE = {:.2}, l_max = {}, chi2 = {:.2}, ndof = {}):\n",
        point.bin.index, point.bin.median, p.lmax, p.chi2, p.ndof
    );
    for label in coefficient_labels(p.lmax) {
        let Some(value) = p.value(&label) else {
            continue;
        };
        // Held coefficients carry a zero error.
        let err = match p.error(&label) {
            Some(e) if e > 0.0 => fmt_err(e),
            _ => "fixed".to_string(),
        };
        out.push_str(&format!("  {label:<9} = {value:>+12.4e} ± {err}\n"));
    }
    out
}

/// All coefficient listings of one series.
pub fn format_series_params(series: &AmplitudeSeries) -> String {
    series
        .points
        .iter()
        .map(format_params)
        .collect::<Vec<_>>()
        .join("\n")
}

fn fmt_err(e: f64) -> String {
    format!("{e:.4e}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DipoleSummary, FitParams, energy_bins};

    fn point() -> AmplitudePoint {
        let mut params = FitParams {
            lmax: 1,
            chi2: 12.0,
            ndof: 8,
            npix: 12,
            ..FitParams::default()
        };
        for (label, v, e) in [
            ("Y(0,0)", 1.0e-4, 2.0e-5),
            ("Y(1,-1)", -3.0e-3, 1.0e-4),
            ("Y(1,0)", 5.0e-4, 1.0e-4),
            ("Y(1,1)", 4.0e-3, 1.0e-4),
        ] {
            params.values.insert(label.to_string(), v);
            params.errors.insert(label.to_string(), e);
        }
        AmplitudePoint {
            bin: energy_bins()[2],
            dipole: DipoleSummary {
                amplitude: 2.44e-3,
                amplitude_err: 4.9e-5,
                phase: 323.1,
                phase_err: 1.1,
            },
            params,
        }
    }

    #[test]
    fn series_table_has_one_row_per_bin() {
        let series = AmplitudeSeries {
            lmax: 1,
            points: vec![point()],
        };
        let table = format_series_table(&series);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "=== Dipole amplitude vs. energy (l_max = 1) ===");
        assert!(lines[3].starts_with("E03     4.58"));
        assert!(lines[3].contains("323.1"));
        assert!(lines[3].ends_with("12"));
    }

    #[test]
    fn params_are_listed_in_fit_order() {
        let text = format_params(&point());
        let labels: Vec<&str> = text
            .lines()
            .skip(1)
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(labels, vec!["Y(0,0)", "Y(1,-1)", "Y(1,0)", "Y(1,1)"]);
        assert!(text.starts_with("E03 (logE = 4.58, l_max = 1, chi2 = 12.00, ndof = 8):"));
    }

    #[test]
    fn held_coefficients_are_marked_fixed() {
        let mut pt = point();
        pt.params.lmax = 2;
        pt.params.values.insert("Y(2,0)".to_string(), 1.0e-4);
        pt.params.errors.insert("Y(2,0)".to_string(), 0.0);
        let text = format_params(&pt);
        let line = text.lines().find(|l| l.contains("Y(2,0)")).unwrap();
        assert!(line.ends_with("fixed"));
    }
}
