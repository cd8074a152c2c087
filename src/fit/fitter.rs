//! Spherical-harmonic multipole fitting of a single sky map.
//!
//! Given:
//! - a count triple (data / background)
//! - the pixel geometry
//! - region cuts, smoothing and the harmonic frame
//!
//! we build the relative-intensity map and solve, by weighted least squares,
//! for the real harmonic coefficients `Y(l,m)` with `l <= lmax` (monopole
//! included):
//!
//! ```text
//! minimize Σ_p ((ri_p - Σ a_lm Y_lm(θ_p, φ_p)) / σ_p)^2
//! ```
//!
//! With a `fixed` reference fit (see `--fix_multi`), the `l >= 2` terms are
//! taken from the reference, subtracted from the data, and only `l <= 1` is
//! fitted.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::domain::{FitOptions, FitParams, MapTriple, coefficient_labels};
use crate::error::AppError;
use crate::math::{parameter_covariance, rotation_from_equatorial, solve_least_squares, theta_phi, unit_vector};
use crate::models::{coefficient_count, fill_design_row};
use crate::sky::{RelIntMap, SkyPixels, relative_intensity};

/// Fit multipoles up to `lmax` to one map.
pub fn multifit(
    lmax: usize,
    triple: &MapTriple,
    pixels: &SkyPixels,
    opts: &FitOptions,
) -> Result<FitParams, AppError> {
    let relint = relative_intensity(triple, pixels, opts.alpha, &opts.cuts)?;
    let dirs = harmonic_directions(pixels, &relint.pix, opts);
    fit_multipoles(lmax, &relint, &dirs, None)
}

/// Fit multipoles up to `lmax` while holding `l >= 2` at the values in `reference`.
pub fn multifit_fixed(
    lmax: usize,
    triple: &MapTriple,
    pixels: &SkyPixels,
    opts: &FitOptions,
    reference: &FitParams,
) -> Result<FitParams, AppError> {
    let relint = relative_intensity(triple, pixels, opts.alpha, &opts.cuts)?;
    let dirs = harmonic_directions(pixels, &relint.pix, opts);
    fit_multipoles(lmax, &relint, &dirs, Some(reference))
}

/// `(θ, φ)` of the selected pixels in the fit frame.
pub fn harmonic_directions(pixels: &SkyPixels, pix: &[usize], opts: &FitOptions) -> Vec<(f64, f64)> {
    let rot = rotation_from_equatorial(opts.frame);
    pix.iter()
        .map(|&i| theta_phi(&(rot * unit_vector(pixels.lon[i], pixels.lat[i]))))
        .collect()
}

/// Weighted least-squares fit of real harmonics to a relative-intensity map.
pub fn fit_multipoles(
    lmax: usize,
    relint: &RelIntMap,
    dirs: &[(f64, f64)],
    fixed: Option<&FitParams>,
) -> Result<FitParams, AppError> {
    if dirs.len() != relint.len() {
        return Err(AppError::numeric(format!(
            "Direction count {} does not match pixel count {}.",
            dirs.len(),
            relint.len()
        )));
    }

    let labels = coefficient_labels(lmax);
    let n_all = coefficient_count(lmax);

    // Coefficients held fixed (l >= 2 from the reference fit), in column order.
    let l_free = match fixed {
        Some(_) if lmax >= 2 => 1,
        _ => lmax,
    };
    let p = coefficient_count(l_free);
    let mut fixed_values = vec![0.0; n_all];
    if let Some(reference) = fixed {
        for (j, label) in labels.iter().enumerate().skip(p) {
            fixed_values[j] = reference.value(label).ok_or_else(|| {
                AppError::usage(format!(
                    "Reference fit (lmax={}) has no coefficient {label}; cannot fix multipoles up to l={lmax}.",
                    reference.lmax
                ))
            })?;
        }
    }

    let n = relint.len();
    if n < p {
        return Err(AppError::numeric(format!(
            "Only {n} usable pixels for {p} coefficients; widen the region or relax the cuts."
        )));
    }

    // Build weighted design matrix X_w and weighted observation vector y_w.
    let mut xw = DMatrix::<f64>::zeros(n, p);
    let mut yw = DVector::<f64>::zeros(n);
    let mut y_adj = vec![0.0; n];
    let mut row = vec![0.0; n_all];

    for i in 0..n {
        let (theta, phi) = dirs[i];
        fill_design_row(lmax, theta, phi, &mut row);
        let fixed_part: f64 = row[p..].iter().zip(&fixed_values[p..]).map(|(y, a)| y * a).sum();
        y_adj[i] = relint.ri[i] - fixed_part;

        let w = 1.0 / relint.sigma[i];
        for j in 0..p {
            xw[(i, j)] = row[j] * w;
        }
        yw[i] = y_adj[i] * w;
    }

    let beta = solve_least_squares(&xw, &yw)
        .ok_or_else(|| AppError::numeric(format!("Least-squares solve failed for lmax={lmax}.")))?;
    let cov = parameter_covariance(&xw)
        .ok_or_else(|| AppError::numeric(format!("Covariance is singular for lmax={lmax}.")))?;

    let resid = &yw - &xw * &beta;
    let chi2 = resid.norm_squared();
    if !chi2.is_finite() {
        return Err(AppError::numeric(format!("Non-finite chi-square for lmax={lmax}.")));
    }

    let mut params = FitParams {
        lmax,
        chi2,
        ndof: n - p,
        npix: n,
        ..FitParams::default()
    };
    for (j, label) in labels.iter().enumerate() {
        let (value, error) = if j < p {
            (beta[j], cov[(j, j)].max(0.0).sqrt())
        } else {
            (fixed_values[j], 0.0)
        };
        params.values.insert(label.clone(), value);
        params.errors.insert(label.clone(), error);
    }

    debug!(
        "multifit lmax={lmax}: npix={n} free={p} chi2/ndof={:.3}",
        params.reduced_chi2()
    );
    Ok(params)
}
