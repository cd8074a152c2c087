//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - sky-map containers (`MapTriple`, `PixelOrdering`)
//! - the energy binning (`EnergyBin`, `energy_bins`)
//! - fit outputs (`FitParams`, `DipoleSummary`, `AmplitudeSeries`)
//! - run configuration (`RunConfig`, `FitOptions`, `PlotOptions`)

pub mod types;

pub use types::*;
