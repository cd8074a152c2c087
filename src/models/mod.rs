//! Multipole model implementation.
//!
//! The model is a pair of small, pure functions (design row + prediction) so
//! that the fitting code can stay generic over `lmax`.

pub mod multipole;

pub use multipole::*;
