//! Angular smoothing of count maps.
//!
//! Both kernels are evaluated by brute force over all pixel pairs within the
//! kernel radius, one output pixel per rayon task. For the map sizes in use
//! (nside <= 64) this is a few seconds at most.

use rayon::prelude::*;

use crate::domain::SmoothKind;
use crate::sky::{SkyPixels, is_bad};

/// Smoothing kernel parameters.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    pub kind: SmoothKind,
    /// Top-hat radius or Gaussian sigma, degrees.
    pub radius_deg: f64,
    /// Gaussian truncation in units of sigma.
    pub window: f64,
}

impl Kernel {
    fn reach_rad(&self) -> f64 {
        let reach = match self.kind {
            SmoothKind::Tophat => self.radius_deg,
            SmoothKind::Gauss => self.radius_deg * self.window.max(0.0),
        };
        reach.to_radians().min(std::f64::consts::PI)
    }

    fn weight(&self, dist_rad: f64) -> f64 {
        match self.kind {
            SmoothKind::Tophat => 1.0,
            SmoothKind::Gauss => {
                let sigma = self.radius_deg.to_radians();
                (-(dist_rad * dist_rad) / (2.0 * sigma * sigma)).exp()
            }
        }
    }
}

/// Smooth several count maps that share the same pixels.
///
/// Bad pixels stay bad and never contribute to their neighbours.
pub fn smooth_maps(pixels: &SkyPixels, maps: &[&[f64]], kernel: Kernel) -> Vec<Vec<f64>> {
    let vectors = pixels.unit_vectors();
    let reach = kernel.reach_rad();
    let cos_reach = if reach >= std::f64::consts::PI {
        f64::NEG_INFINITY
    } else {
        reach.cos()
    };
    let n = vectors.len();

    let rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            if maps.iter().any(|m| is_bad(m[i])) {
                return maps.iter().map(|m| m[i]).collect();
            }
            let vi = &vectors[i];
            let mut acc = vec![0.0; maps.len()];
            for (j, vj) in vectors.iter().enumerate() {
                let cosd = vi.dot(vj);
                if cosd < cos_reach {
                    continue;
                }
                if maps.iter().any(|m| is_bad(m[j])) {
                    continue;
                }
                let w = kernel.weight(cosd.clamp(-1.0, 1.0).acos());
                for (a, m) in acc.iter_mut().zip(maps) {
                    *a += w * m[j];
                }
            }
            acc
        })
        .collect();

    // Transpose pixel-major rows back into one vector per map.
    (0..maps.len())
        .map(|k| rows.iter().map(|r| r[k]).collect())
        .collect()
}
