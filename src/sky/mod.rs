//! Sky geometry and map preparation.
//!
//! - pixel centres for RING / NESTED maps (`pixels`)
//! - angular smoothing of count maps (`smooth`)
//! - region cuts, masking and relative intensity (`intensity`)

pub mod intensity;
pub mod pixels;
pub mod smooth;

pub use intensity::*;
pub use pixels::*;

use crate::domain::UNSEEN;

/// Whether a pixel value is missing (`UNSEEN` or non-finite).
pub fn is_bad(value: f64) -> bool {
    !value.is_finite() || (value - UNSEEN).abs() <= 1e-5 * UNSEEN.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_and_nan_are_bad() {
        assert!(is_bad(UNSEEN));
        assert!(is_bad(f64::NAN));
        assert!(is_bad(f64::INFINITY));
        assert!(!is_bad(0.0));
        assert!(!is_bad(-1.0));
    }
}
