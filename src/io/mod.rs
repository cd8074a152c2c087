//! Input/output helpers.
//!
//! - HEALPix FITS map reading + summing (`skymap`)
//! - per-energy-bin file discovery (`energy`)
//! - CSV series export (`export`)
//! - results JSON read/write (`results`)

pub mod energy;
pub mod export;
pub mod results;
pub mod skymap;

pub use energy::*;
pub use export::*;
pub use results::*;
pub use skymap::*;
