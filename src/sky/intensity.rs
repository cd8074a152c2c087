//! Relative-intensity maps: the actual input of a multipole fit.
//!
//! For every pixel that survives the region cut and masking:
//!
//! ```text
//! ri    = data / bg - 1
//! sigma = sqrt(data * (1 + alpha * data / bg)) / bg
//! ```
//!
//! The error combines Poisson noise on the data with the background estimate's
//! own noise, the latter reduced by `alpha` (the on/off exposure ratio).

use log::debug;

use crate::domain::{MapTriple, SkyCuts};
use crate::error::AppError;
use crate::sky::smooth::{Kernel, smooth_maps};
use crate::sky::{SkyPixels, is_bad};

/// Mask pixels whose background is below this fraction of the median.
const MASK_BG_FRACTION: f64 = 0.01;

/// Selected pixels with their relative intensity and 1-sigma error.
#[derive(Debug, Clone, Default)]
pub struct RelIntMap {
    /// Pixel indices into the full map.
    pub pix: Vec<usize>,
    pub ri: Vec<f64>,
    pub sigma: Vec<f64>,
}

impl RelIntMap {
    pub fn len(&self) -> usize {
        self.pix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pix.is_empty()
    }
}

/// Whether pixel `(lon, lat)` (radians) lies inside the declination band and RA window.
pub fn in_region(cuts: &SkyCuts, lon: f64, lat: f64) -> bool {
    let dec = lat.to_degrees();
    if dec < cuts.dec_min || dec > cuts.dec_max {
        return false;
    }
    if cuts.ra_min.is_none() && cuts.ra_max.is_none() {
        return true;
    }
    let ra = lon.to_degrees().rem_euclid(360.0);
    let lo = cuts.ra_min.map_or(0.0, wrap_ra);
    let hi = cuts.ra_max.map_or(360.0, wrap_ra);
    if lo <= hi {
        ra >= lo && ra <= hi
    } else {
        // Window wraps through RA = 0.
        ra >= lo || ra <= hi
    }
}

/// Bring an RA bound into `[0, 360]`, leaving in-range values (including 360) as given.
fn wrap_ra(deg: f64) -> f64 {
    if (0.0..=360.0).contains(&deg) {
        deg
    } else {
        deg.rem_euclid(360.0)
    }
}

/// Smooth the data and background counts of a triple with the kernel in `cuts`.
///
/// A zero radius returns the counts unchanged. The local field is not smoothed.
pub fn smooth_triple(triple: &MapTriple, pixels: &SkyPixels, cuts: &SkyCuts) -> Result<MapTriple, AppError> {
    if pixels.len() != triple.npix() {
        return Err(AppError::input(format!(
            "Pixel geometry has {} pixels but the map has {}.",
            pixels.len(),
            triple.npix()
        )));
    }
    if !(cuts.smooth_radius > 0.0) {
        return Ok(triple.clone());
    }

    let kernel = Kernel {
        kind: cuts.smooth_kind,
        radius_deg: cuts.smooth_radius,
        window: cuts.smooth_window,
    };
    debug!("smoothing counts with {kernel:?}");
    let mut smoothed = smooth_maps(
        pixels,
        &[triple.data.as_slice(), triple.background.as_slice()],
        kernel,
    );
    let background = smoothed.pop().unwrap_or_default();
    let data = smoothed.pop().unwrap_or_default();
    Ok(MapTriple {
        data,
        background,
        ..triple.clone()
    })
}

/// Build the relative-intensity map for a count triple.
pub fn relative_intensity(
    triple: &MapTriple,
    pixels: &SkyPixels,
    alpha: f64,
    cuts: &SkyCuts,
) -> Result<RelIntMap, AppError> {
    if pixels.len() != triple.npix() {
        return Err(AppError::input(format!(
            "Pixel geometry has {} pixels but the map has {}.",
            pixels.len(),
            triple.npix()
        )));
    }
    if !(alpha.is_finite() && alpha >= 0.0) {
        return Err(AppError::usage(format!("alpha must be finite and >= 0, got {alpha}.")));
    }

    let smoothed;
    let triple = if cuts.smooth_radius > 0.0 {
        smoothed = smooth_triple(triple, pixels, cuts)?;
        &smoothed
    } else {
        triple
    };
    let (data, bg) = (&triple.data, &triple.background);

    let bg_floor = if cuts.mask {
        median_positive(bg).map(|m| m * MASK_BG_FRACTION).unwrap_or(0.0)
    } else {
        0.0
    };
    let scale = cuts.scale.unwrap_or(1.0);

    let mut out = RelIntMap::default();
    let mut n_region = 0usize;
    for i in 0..data.len() {
        if !in_region(cuts, pixels.lon[i], pixels.lat[i]) {
            continue;
        }
        n_region += 1;

        let (d, b) = (data[i], bg[i]);
        if is_bad(d) || is_bad(b) || b <= 0.0 || d < 0.0 {
            continue;
        }
        if cuts.mask && b < bg_floor {
            continue;
        }

        let ri = d / b - 1.0;
        let sigma = (d * (1.0 + alpha * d / b)).sqrt() / b;
        if !(sigma.is_finite() && sigma > 0.0) {
            continue;
        }
        if let Some(threshold) = cuts.threshold {
            if ri.abs() > threshold {
                continue;
            }
        }

        out.pix.push(i);
        out.ri.push(ri * scale);
        out.sigma.push(sigma * scale.abs());
    }

    debug!(
        "pixel selection: {} in region, {} usable (nside={})",
        n_region,
        out.len(),
        triple.nside
    );
    Ok(out)
}

fn median_positive(values: &[f64]) -> Option<f64> {
    let mut v: Vec<f64> = values
        .iter()
        .copied()
        .filter(|x| !is_bad(*x) && *x > 0.0)
        .collect();
    if v.is_empty() {
        return None;
    }
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        Some(v[mid])
    } else {
        Some((v[mid - 1] + v[mid]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PixelOrdering, UNSEEN};
    use crate::sky::pixel_centers;

    fn full_sky_cuts() -> SkyCuts {
        SkyCuts {
            dec_min: -90.0,
            dec_max: 90.0,
            ..SkyCuts::default()
        }
    }

    fn flat_triple(nside: u32, data: f64, bg: f64) -> MapTriple {
        let npix = 12 * (nside * nside) as usize;
        MapTriple {
            nside,
            ordering: PixelOrdering::Ring,
            data: vec![data; npix],
            background: vec![bg; npix],
            local: vec![0.0; npix],
        }
    }

    #[test]
    fn region_handles_ra_wrap() {
        let cuts = SkyCuts {
            dec_min: -90.0,
            dec_max: 90.0,
            ra_min: Some(300.0),
            ra_max: Some(30.0),
            ..SkyCuts::default()
        };
        assert!(in_region(&cuts, 10f64.to_radians(), 0.0));
        assert!(in_region(&cuts, 310f64.to_radians(), 0.0));
        assert!(!in_region(&cuts, 180f64.to_radians(), 0.0));
    }

    #[test]
    fn negative_ra_bounds_wrap_through_zero() {
        let cuts = SkyCuts {
            dec_min: -90.0,
            dec_max: 90.0,
            ra_min: Some(-30.0),
            ra_max: Some(30.0),
            ..SkyCuts::default()
        };
        assert!(in_region(&cuts, 345f64.to_radians(), 0.0));
        assert!(in_region(&cuts, 10f64.to_radians(), 0.0));
        assert!(!in_region(&cuts, 180f64.to_radians(), 0.0));

        let cuts = SkyCuts {
            ra_min: Some(0.0),
            ra_max: Some(360.0),
            ..cuts
        };
        assert!(in_region(&cuts, 180f64.to_radians(), 0.0));
    }

    #[test]
    fn default_cut_keeps_southern_sky_only() {
        let cuts = SkyCuts::default();
        assert!(in_region(&cuts, 0.0, (-60f64).to_radians()));
        assert!(!in_region(&cuts, 0.0, (-20f64).to_radians()));
        assert!(!in_region(&cuts, 0.0, 45f64.to_radians()));
    }

    #[test]
    fn relint_and_error_formula() {
        let px = pixel_centers(1, PixelOrdering::Ring).unwrap();
        let triple = flat_triple(1, 110.0, 100.0);
        let m = relative_intensity(&triple, &px, 0.05, &full_sky_cuts()).unwrap();
        assert_eq!(m.len(), 12);
        let expected_sigma = (110.0f64 * (1.0 + 0.05 * 1.1)).sqrt() / 100.0;
        for (ri, s) in m.ri.iter().zip(&m.sigma) {
            assert!((ri - 0.1).abs() < 1e-12);
            assert!((s - expected_sigma).abs() < 1e-12);
        }
    }

    #[test]
    fn bad_and_masked_pixels_are_dropped() {
        let px = pixel_centers(1, PixelOrdering::Ring).unwrap();
        let mut triple = flat_triple(1, 100.0, 100.0);
        triple.data[0] = UNSEEN;
        triple.background[1] = 0.0;
        triple.background[2] = 0.5;
        triple.data[2] = 0.5;
        triple.data[3] = 0.0;

        let mut cuts = full_sky_cuts();
        let m = relative_intensity(&triple, &px, 0.05, &cuts).unwrap();
        // 0: unseen, 1: bg=0, 3: sigma=0
        assert_eq!(m.len(), 9);
        assert!(m.pix.contains(&2));

        cuts.mask = true;
        let m = relative_intensity(&triple, &px, 0.05, &cuts).unwrap();
        assert_eq!(m.len(), 8);
        assert!(!m.pix.contains(&2));
    }

    #[test]
    fn smoothing_spreads_a_spike_but_keeps_flat_ratios() {
        let px = pixel_centers(4, PixelOrdering::Ring).unwrap();
        let mut triple = flat_triple(4, 100.0, 100.0);
        let spike = 100;
        triple.data[spike] = 400.0;

        let raw = relative_intensity(&triple, &px, 0.05, &full_sky_cuts()).unwrap();
        let raw_excess = raw.ri.iter().filter(|ri| **ri > 1e-12).count();
        assert_eq!(raw_excess, 1);

        let cuts = SkyCuts {
            smooth_radius: 20.0,
            ..full_sky_cuts()
        };
        let m = relative_intensity(&triple, &px, 0.05, &cuts).unwrap();
        assert_eq!(m.len(), px.len());

        let vectors = px.unit_vectors();
        let reach = 20f64.to_radians().cos();
        let mut spread = 0;
        for (&i, ri) in m.pix.iter().zip(&m.ri) {
            if vectors[i].dot(&vectors[spike]) >= reach {
                assert!(*ri > 0.0, "pixel {i} next to the spike has ri={ri}");
                spread += 1;
            } else {
                assert!(ri.abs() < 1e-12, "pixel {i} far from the spike has ri={ri}");
            }
        }
        assert!(spread > 1);
        // The spike itself is diluted by its neighbours.
        let at_spike = m.pix.iter().position(|&i| i == spike).unwrap();
        assert!(m.ri[at_spike] < raw.ri[raw.pix.iter().position(|&i| i == spike).unwrap()]);
    }

    #[test]
    fn zero_radius_leaves_counts_untouched() {
        let px = pixel_centers(1, PixelOrdering::Ring).unwrap();
        let mut triple = flat_triple(1, 100.0, 100.0);
        triple.data[3] = 250.0;
        assert_eq!(smooth_triple(&triple, &px, &full_sky_cuts()).unwrap(), triple);
    }

    #[test]
    fn threshold_and_scale_apply() {
        let px = pixel_centers(1, PixelOrdering::Ring).unwrap();
        let mut triple = flat_triple(1, 101.0, 100.0);
        triple.data[5] = 200.0;
        let cuts = SkyCuts {
            threshold: Some(0.5),
            scale: Some(1000.0),
            ..full_sky_cuts()
        };
        let m = relative_intensity(&triple, &px, 0.05, &cuts).unwrap();
        assert_eq!(m.len(), 11);
        assert!(m.ri.iter().all(|ri| (ri - 10.0).abs() < 1e-9));
    }
}
