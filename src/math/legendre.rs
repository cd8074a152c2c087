//! Associated Legendre functions and spherical-harmonic normalisation.
//!
//! We use the convention *without* the Condon–Shortley phase, so that
//! `P_1^1(cos θ) = sin θ` and the real harmonic `Y(1,1)` points towards RA = 0.
//!
//! Only low degrees (`l` of order 10) are needed, so the plain three-term
//! recurrence is stable enough and factorial ratios are computed as products.

use std::f64::consts::PI;

/// `P_l^m(x)` for `0 <= m <= l`, `x = cos θ`.
pub fn assoc_legendre(l: usize, m: usize, x: f64) -> f64 {
    if m > l {
        return 0.0;
    }

    // P_m^m = (2m-1)!! (1-x^2)^{m/2}
    let mut pmm = 1.0;
    if m > 0 {
        let somx2 = ((1.0 - x) * (1.0 + x)).max(0.0).sqrt();
        let mut fact = 1.0;
        for _ in 0..m {
            pmm *= fact * somx2;
            fact += 2.0;
        }
    }
    if l == m {
        return pmm;
    }

    let mut pmmp1 = x * (2 * m + 1) as f64 * pmm;
    if l == m + 1 {
        return pmmp1;
    }

    for ll in (m + 2)..=l {
        let pll = (x * (2 * ll - 1) as f64 * pmmp1 - (ll + m - 1) as f64 * pmm) / (ll - m) as f64;
        pmm = pmmp1;
        pmmp1 = pll;
    }
    pmmp1
}

/// `N_lm = sqrt((2l+1)/4π · (l-m)!/(l+m)!)`.
pub fn harmonic_norm(l: usize, m: usize) -> f64 {
    // (l-m)!/(l+m)! = 1 / Π_{k=l-m+1}^{l+m} k
    let mut ratio = 1.0;
    for k in (l - m + 1)..=(l + m) {
        ratio /= k as f64;
    }
    ((2 * l + 1) as f64 / (4.0 * PI) * ratio).sqrt()
}
