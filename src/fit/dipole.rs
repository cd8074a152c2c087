//! Dipole amplitude and phase from fitted `l = 1` coefficients.
//!
//! With real harmonics `Y(1,1) ∝ sin θ cos φ` and `Y(1,-1) ∝ sin θ sin φ`,
//! the equatorial projection of the dipole is
//!
//! ```text
//! A   = sqrt(3/4π) · sqrt(a11² + a1-1²)
//! φ_0 = atan2(a1-1, a11)
//! ```
//!
//! Errors are propagated from the (uncorrelated) coefficient errors.

use std::f64::consts::PI;

use crate::domain::{DipoleSummary, FitParams};
use crate::error::AppError;

/// Extract the dipole amplitude/phase summary from a fit.
pub fn get_dipole(p: &FitParams) -> Result<DipoleSummary, AppError> {
    let lookup = |label: &str| -> Result<(f64, f64), AppError> {
        let value = p
            .value(label)
            .ok_or_else(|| AppError::numeric(format!("Fit result has no {label} coefficient.")))?;
        Ok((value, p.error(label).unwrap_or(0.0)))
    };
    let (a11, e11) = lookup("Y(1,1)")?;
    let (a1m1, e1m1) = lookup("Y(1,-1)")?;

    let k = (3.0 / (4.0 * PI)).sqrt();
    let r2 = a11 * a11 + a1m1 * a1m1;
    let r = r2.sqrt();

    let amplitude = k * r;
    let phase = a1m1.atan2(a11).to_degrees().rem_euclid(360.0);

    let (amplitude_err, phase_err) = if r2 > 0.0 {
        let da = k * ((a11 * e11).powi(2) + (a1m1 * e1m1).powi(2)).sqrt() / r;
        let dphi = ((a11 * e1m1).powi(2) + (a1m1 * e11).powi(2)).sqrt() / r2;
        (da, dphi.to_degrees())
    } else {
        // Direction is undefined at zero amplitude.
        (k * (e11 * e11 + e1m1 * e1m1).sqrt(), 180.0)
    };

    if !(amplitude.is_finite() && amplitude_err.is_finite() && phase_err.is_finite()) {
        return Err(AppError::numeric("Non-finite dipole summary."));
    }

    Ok(DipoleSummary {
        amplitude,
        amplitude_err,
        phase,
        phase_err,
    })
}
