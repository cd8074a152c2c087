//! Formatted terminal output for amplitude runs.

pub mod format;

pub use format::*;
