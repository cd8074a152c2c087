//! Real spherical-harmonic multipole model.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given direction (for least squares)
//! - predict the relative intensity for a direction given coefficients
//!
//! Column order is `l` ascending, then `m = -l..=l`, i.e. column `l² + l + m`.
//! This matches `domain::coefficient_labels`.
//!
//! Real harmonics:
//! - `m > 0`: `√2 N_lm P_l^m(cos θ) cos(mφ)`
//! - `m = 0`: `N_l0 P_l(cos θ)`
//! - `m < 0`: `√2 N_l|m| P_l^|m|(cos θ) sin(|m|φ)`

use std::f64::consts::SQRT_2;

use crate::math::{assoc_legendre, harmonic_norm};

/// Number of coefficients for a fit up to `lmax` (monopole included).
pub fn coefficient_count(lmax: usize) -> usize {
    (lmax + 1) * (lmax + 1)
}

/// Column index of `Y(l,m)`.
pub fn column_index(l: usize, m: i64) -> usize {
    ((l * l + l) as i64 + m) as usize
}

/// Fill a design row for the direction `(θ, φ)`.
///
/// # Panics
/// Panics if `out.len() < coefficient_count(lmax)`.
pub fn fill_design_row(lmax: usize, theta: f64, phi: f64, out: &mut [f64]) {
    let x = theta.cos();
    for l in 0..=lmax {
        let base = l * l + l;
        out[base] = harmonic_norm(l, 0) * assoc_legendre(l, 0, x);
        for m in 1..=l {
            let amp = SQRT_2 * harmonic_norm(l, m) * assoc_legendre(l, m, x);
            let (s, c) = (m as f64 * phi).sin_cos();
            out[base + m] = amp * c;
            out[base - m] = amp * s;
        }
    }
}

/// Evaluate `Σ a_lm Y_lm(θ, φ)` for the given coefficients in column order.
pub fn predict(lmax: usize, theta: f64, phi: f64, coeffs: &[f64]) -> f64 {
    let mut row = vec![0.0; coefficient_count(lmax)];
    fill_design_row(lmax, theta, phi, &mut row);
    row.iter().zip(coeffs).map(|(y, a)| y * a).sum()
}
