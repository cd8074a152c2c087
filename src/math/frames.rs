//! Celestial frame rotations (J2000 equatorial → galactic / ecliptic).

use nalgebra::{Matrix3, Vector3};

use crate::domain::CoordFrame;

/// Obliquity of the ecliptic at J2000, degrees.
const OBLIQUITY_J2000_DEG: f64 = 23.439_291_1;

/// Rotation matrix taking equatorial unit vectors into `frame`.
pub fn rotation_from_equatorial(frame: CoordFrame) -> Matrix3<f64> {
    match frame {
        CoordFrame::Equatorial => Matrix3::identity(),
        CoordFrame::Galactic => Matrix3::new(
            -0.054_875_560_4, -0.873_437_090_2, -0.483_835_015_5,
            0.494_109_427_9, -0.444_829_630_0, 0.746_982_244_5,
            -0.867_666_149_0, -0.198_076_373_4, 0.455_983_776_2,
        ),
        CoordFrame::Ecliptic => {
            let (s, c) = OBLIQUITY_J2000_DEG.to_radians().sin_cos();
            Matrix3::new(
                1.0, 0.0, 0.0,
                0.0, c, s,
                0.0, -s, c,
            )
        }
    }
}

/// Unit vector for longitude/latitude in radians.
pub fn unit_vector(lon: f64, lat: f64) -> Vector3<f64> {
    let (sl, cl) = lon.sin_cos();
    let (sb, cb) = lat.sin_cos();
    Vector3::new(cb * cl, cb * sl, sb)
}

/// Colatitude `θ` and longitude `φ ∈ [0, 2π)` of a unit vector.
pub fn theta_phi(v: &Vector3<f64>) -> (f64, f64) {
    let theta = v.z.clamp(-1.0, 1.0).acos();
    let phi = v.y.atan2(v.x).rem_euclid(std::f64::consts::TAU);
    (theta, phi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn galactic_pole_maps_to_b90() {
        let ngp = unit_vector(192.859_48_f64.to_radians(), 27.128_25_f64.to_radians());
        let g = rotation_from_equatorial(CoordFrame::Galactic) * ngp;
        let (theta, _) = theta_phi(&g);
        assert!(theta.to_degrees() < 1e-3, "theta={}", theta.to_degrees());
    }

    #[test]
    fn rotations_are_orthonormal() {
        for frame in [CoordFrame::Equatorial, CoordFrame::Galactic, CoordFrame::Ecliptic] {
            let r = rotation_from_equatorial(frame);
            let id = r * r.transpose();
            assert!((id - Matrix3::identity()).abs().max() < 1e-8);
        }
    }

    #[test]
    fn theta_phi_inverts_unit_vector() {
        let v = unit_vector(4.0, -0.5);
        let (theta, phi) = theta_phi(&v);
        assert!((phi - 4.0).abs() < 1e-12);
        assert!((theta - (std::f64::consts::FRAC_PI_2 + 0.5)).abs() < 1e-12);
    }
}
