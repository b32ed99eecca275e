//! Battery dispatch simulator for renewable-energy sites.
//!
//! Reads per-location production series from a blob store, threads one
//! battery per location through the series, and reports production,
//! synthetic consumption, state of charge, and residual net energy for
//! every interval.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod runner;
/// Battery, consumption models, dispatch engine, and run summaries.
pub mod sim;
pub mod store;
