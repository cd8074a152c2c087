//! Multipole fitting.
//!
//! Responsibilities:
//!
//! - weighted least-squares spherical-harmonic fits of one map (`fitter`)
//! - dipole amplitude/phase extraction from a fit (`dipole`)

pub mod dipole;
pub mod fitter;

pub use dipole::*;
pub use fitter::*;
