//! Weighted least squares solver.
//!
//! Every multipole fit is a linear regression of the form:
//!
//! ```text
//! minimize Σ (ri_p - x_p^T a)^2 / σ_p^2
//! ```
//!
//! Callers scale rows by `1/σ_p` before calling in, so the solver only sees an
//! ordinary least squares problem. The design matrix is tall (thousands of
//! pixels, a handful of coefficients); we solve it with SVD because partial-sky
//! coverage makes some harmonic columns nearly collinear (e.g. `Y(0,0)` and
//! `Y(l,0)` over a southern-sky cap).

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Parameter covariance `(XᵀX)⁺` of an already-weighted design matrix.
pub fn parameter_covariance(x: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let xtx = x.transpose() * x;
    let cov = xtx.pseudo_inverse(1e-14).ok()?;
    if cov.iter().all(|v| v.is_finite()) {
        Some(cov)
    } else {
        None
    }
}
