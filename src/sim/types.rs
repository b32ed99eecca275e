//! Core simulation types: readings in, dispatch records out.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One production sample as read from a location's CSV payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Opaque timestamp, passed through unmodified.
    pub timestamp: String,
    /// Energy produced during the interval (Wh).
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }
}

/// Complete record of one simulated interval.
///
/// Serialized with camelCase field names, which is the contract the
/// dashboard charts consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    /// Timestamp copied from the input reading.
    pub timestamp: String,
    /// Production for the interval (MWh).
    pub production: f64,
    /// Synthetic consumption for the interval (MWh).
    pub consumption: f64,
    /// Battery charge after this interval (MWh).
    pub battery_charge: f64,
    /// Residual net energy after the battery absorbed or covered what it could (MWh).
    pub net_energy: f64,
}

impl fmt::Display for DispatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | prod={:>9.4} MWh | cons={:>9.4} MWh | charge={:>10.4} MWh | net={:>9.4} MWh",
            self.timestamp, self.production, self.consumption, self.battery_charge, self.net_energy
        )
    }
}

/// Dispatch series for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResult {
    pub location: String,
    pub hourly_data: Vec<DispatchResult>,
}

/// One file to simulate: `simulations/<location>/<filename>` in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRequest {
    pub location: String,
    pub filename: String,
}

impl FileRequest {
    pub fn new(location: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            filename: filename.into(),
        }
    }
}

/// Battery and unit-conversion parameters for one run.
///
/// # Examples
///
/// ```
/// use dispatch_sim::sim::types::SimParams;
///
/// let params = SimParams::default();
/// assert_eq!(params.capacity_mwh, 1000.0);
/// assert_eq!(params.initial_charge_mwh(), 500.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimParams {
    /// Battery capacity (MWh).
    pub capacity_mwh: f64,
    /// Efficiency applied on both the charge and discharge leg (0, 1].
    pub efficiency: f64,
    /// Initial state of charge as a fraction of capacity.
    pub initial_soc: f64,
    /// Divisor converting a reading's value into MWh.
    pub production_divisor: f64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            capacity_mwh: 1000.0,
            efficiency: 0.9,
            initial_soc: 0.5,
            production_divisor: 1000.0,
        }
    }
}

impl SimParams {
    /// Charge every location's battery starts from (MWh).
    pub fn initial_charge_mwh(&self) -> f64 {
        self.capacity_mwh * self.initial_soc
    }
}
