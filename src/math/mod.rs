//! Mathematical utilities: Legendre functions, frame rotations and weighted least squares.

pub mod frames;
pub mod legendre;
pub mod ols;

pub use frames::*;
pub use legendre::*;
pub use ols::*;
