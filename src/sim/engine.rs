//! Dispatch engine that threads one battery through a location's readings.

use super::battery::BatteryState;
use super::consumption::ConsumptionModel;
use super::types::{DispatchResult, Reading, SimParams};

/// Simulation engine for a single location.
///
/// Generic over `M: ConsumptionModel` for static dispatch. Owns a fresh
/// battery; locations never share one.
pub struct Engine<M: ConsumptionModel> {
    params: SimParams,
    battery: BatteryState,
    consumption: M,
}

impl<M: ConsumptionModel> Engine<M> {
    /// Creates an engine with a battery at the configured initial charge.
    ///
    /// # Arguments
    ///
    /// * `params` - Battery and unit-conversion parameters
    /// * `consumption` - Source of per-interval consumption
    pub fn new(params: SimParams, consumption: M) -> Self {
        Self {
            battery: BatteryState::from_params(&params),
            params,
            consumption,
        }
    }

    /// Executes one interval and returns its record.
    ///
    /// The battery state carried into the next call is the state after this one.
    pub fn step(&mut self, reading: &Reading) -> DispatchResult {
        // 1. Production in MWh
        let production = reading.value / self.params.production_divisor;

        // 2. Synthetic consumption
        let consumption = self
            .consumption
            .consumption_mwh(production, &reading.timestamp);

        // 3. Battery absorbs surplus or covers deficit
        let net_energy = self.battery.dispatch(production - consumption);

        DispatchResult {
            timestamp: reading.timestamp.clone(),
            production,
            consumption,
            battery_charge: self.battery.charge_mwh(),
            net_energy,
        }
    }

    /// Executes every reading in order and returns one record per reading.
    pub fn run(&mut self, readings: &[Reading]) -> Vec<DispatchResult> {
        readings.iter().map(|r| self.step(r)).collect()
    }

    /// Returns a reference to the battery.
    pub fn battery(&self) -> &BatteryState {
        &self.battery
    }

    /// Returns the run parameters.
    pub fn params(&self) -> &SimParams {
        &self.params
    }
}

/// Simulates one location from a fresh battery.
pub fn simulate_location<M: ConsumptionModel>(
    readings: &[Reading],
    params: SimParams,
    consumption: M,
) -> Vec<DispatchResult> {
    Engine::new(params, consumption).run(readings)
}
