//! HEALPix pixel geometry.

use nalgebra::Vector3;
use rayon::prelude::*;

use crate::domain::PixelOrdering;
use crate::error::AppError;
use crate::math::unit_vector;

/// Pixel centres of a full-sky HEALPix map.
#[derive(Debug, Clone)]
pub struct SkyPixels {
    pub nside: u32,
    pub ordering: PixelOrdering,
    /// Right ascension / longitude, radians in `[0, 2π)`.
    pub lon: Vec<f64>,
    /// Declination / latitude, radians.
    pub lat: Vec<f64>,
}

impl SkyPixels {
    pub fn len(&self) -> usize {
        self.lon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lon.is_empty()
    }

    pub fn unit_vectors(&self) -> Vec<Vector3<f64>> {
        self.lon
            .par_iter()
            .zip(self.lat.par_iter())
            .map(|(&lon, &lat)| unit_vector(lon, lat))
            .collect()
    }
}

/// `nside` such that `npix = 12 nside²`.
pub fn nside_from_npix(npix: usize) -> Result<u32, AppError> {
    let nside = ((npix as f64 / 12.0).sqrt()).round() as usize;
    if nside == 0 || 12 * nside * nside != npix {
        return Err(AppError::input(format!(
            "{npix} pixels is not a valid HEALPix map size (expected 12*nside^2)."
        )));
    }
    u32::try_from(nside).map_err(|_| AppError::input(format!("nside {nside} is out of range.")))
}

/// Compute pixel centres for every pixel of a map.
pub fn pixel_centers(nside: u32, ordering: PixelOrdering) -> Result<SkyPixels, AppError> {
    if nside == 0 {
        return Err(AppError::input("nside must be positive."));
    }
    let npix = 12 * nside as u64 * nside as u64;

    let centers: Vec<(f64, f64)> = match ordering {
        PixelOrdering::Ring => (0..npix)
            .into_par_iter()
            .map(|hash| cdshealpix::ring::center(nside, hash))
            .collect(),
        PixelOrdering::Nested => {
            if !nside.is_power_of_two() {
                return Err(AppError::input(format!(
                    "NESTED ordering requires a power-of-two nside, got {nside}."
                )));
            }
            let depth = nside.trailing_zeros() as u8;
            (0..npix)
                .into_par_iter()
                .map(|hash| cdshealpix::nested::center(depth, hash))
                .collect()
        }
    };

    let (lon, lat) = centers
        .into_iter()
        .map(|(lon, lat)| (lon.rem_euclid(std::f64::consts::TAU), lat))
        .unzip();

    Ok(SkyPixels {
        nside,
        ordering,
        lon,
        lat,
    })
}
