//! `sh-amplitude` library crate.
//!
//! The binary (`dipole-sh-fit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the map reading, fitting and plotting stages can be reused on their own

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod sky;
