use super::types::SimParams;

/// A battery whose charge is tracked in MWh over one simulation run.
///
/// `BatteryState` absorbs surplus energy and covers deficits, one interval
/// at a time. The same efficiency is applied on the charge leg and on the
/// discharge leg. Charge never leaves `[0, capacity_mwh]`.
///
/// # Sign Convention
/// - Positive net energy: surplus available for charging
/// - Negative net energy: deficit to be covered by discharging
#[derive(Debug, Clone)]
pub struct BatteryState {
    /// Battery capacity in megawatt-hours.
    pub capacity_mwh: f64,

    /// Per-leg efficiency (0..1.0].
    pub efficiency: f64,

    /// Stored energy in megawatt-hours.
    charge_mwh: f64,
}

impl BatteryState {
    /// Creates a battery holding `initial_soc * capacity_mwh`.
    ///
    /// # Arguments
    ///
    /// * `capacity_mwh` - Battery capacity in MWh (must be >= 0)
    /// * `efficiency` - Per-leg efficiency (0..1.0]
    /// * `initial_soc` - Initial state of charge as a fraction (0.0 to 1.0)
    ///
    /// # Panics
    ///
    /// Panics if capacity is negative, efficiency is outside (0, 1], or SOC out of range.
    pub fn new(capacity_mwh: f64, efficiency: f64, initial_soc: f64) -> Self {
        assert!(capacity_mwh >= 0.0 && capacity_mwh.is_finite());
        assert!(efficiency > 0.0 && efficiency <= 1.0);
        assert!((0.0..=1.0).contains(&initial_soc));

        Self {
            capacity_mwh,
            efficiency,
            charge_mwh: capacity_mwh * initial_soc,
        }
    }

    /// Creates a battery from run parameters.
    pub fn from_params(params: &SimParams) -> Self {
        Self::new(params.capacity_mwh, params.efficiency, params.initial_soc)
    }

    /// Current stored energy (MWh).
    pub fn charge_mwh(&self) -> f64 {
        self.charge_mwh
    }

    /// State of charge as a fraction of capacity (0.0 for an empty-capacity battery).
    pub fn soc(&self) -> f64 {
        if self.capacity_mwh > 0.0 {
            self.charge_mwh / self.capacity_mwh
        } else {
            0.0
        }
    }

    /// Applies one interval's net energy and returns the residual net energy.
    ///
    /// Surplus charges the battery up to its headroom; the energy drawn to
    /// store `x` MWh is `x / efficiency`. A deficit discharges up to the stored
    /// charge; discharging `y` MWh covers `y * efficiency` of the deficit.
    pub fn dispatch(&mut self, net_energy_mwh: f64) -> f64 {
        let mut net = net_energy_mwh;
        if net > 0.0 {
            // Charging, limited by headroom
            let headroom = (self.capacity_mwh - self.charge_mwh).max(0.0);
            let charge_amount = (net * self.efficiency).min(headroom);
            self.charge_mwh += charge_amount;
            net -= charge_amount / self.efficiency;
        } else {
            // Discharging, limited by stored energy
            let discharge_needed = -net;
            let discharge_amount = discharge_needed.min(self.charge_mwh);
            self.charge_mwh -= discharge_amount;
            net += discharge_amount * self.efficiency;
        }
        self.charge_mwh = self.charge_mwh.clamp(0.0, self.capacity_mwh);
        net
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_battery_starts_at_initial_soc() {
        let battery = BatteryState::new(1000.0, 0.9, 0.5);
        assert_eq!(battery.capacity_mwh, 1000.0);
        assert_eq!(battery.efficiency, 0.9);
        assert_eq!(battery.charge_mwh(), 500.0);
        assert_eq!(battery.soc(), 0.5);
    }

    #[test]
    #[should_panic]
    fn test_invalid_efficiency_zero() {
        BatteryState::new(1000.0, 0.0, 0.5);
    }

    #[test]
    #[should_panic]
    fn test_invalid_soc_high() {
        BatteryState::new(1000.0, 0.9, 1.1);
    }

    #[test]
    #[should_panic]
    fn test_invalid_capacity_negative() {
        BatteryState::new(-1.0, 0.9, 0.5);
    }

    #[test]
    fn test_surplus_clamped_by_headroom() {
        // 600 MWh surplus, 540 storable but only 500 of headroom
        let mut battery = BatteryState::new(1000.0, 0.9, 0.5);
        let net = battery.dispatch(600.0);
        assert_eq!(battery.charge_mwh(), 1000.0);
        assert!((net - (600.0 - 500.0 / 0.9)).abs() < 1e-9);
        assert!((net - 44.444).abs() < 1e-3);
    }

    #[test]
    fn test_surplus_fully_absorbed() {
        let mut battery = BatteryState::new(1000.0, 0.9, 0.5);
        let net = battery.dispatch(100.0);
        assert!((battery.charge_mwh() - 590.0).abs() < 1e-9);
        assert!(net.abs() < 1e-9);
    }

    #[test]
    fn test_deficit_on_empty_battery() {
        let mut battery = BatteryState::new(1000.0, 0.9, 0.0);
        let net = battery.dispatch(-200.0);
        assert_eq!(battery.charge_mwh(), 0.0);
        assert_eq!(net, -200.0);
    }

    #[test]
    fn test_deficit_partially_covered() {
        let mut battery = BatteryState::new(1000.0, 0.9, 0.5);
        let net = battery.dispatch(-100.0);
        assert!((battery.charge_mwh() - 400.0).abs() < 1e-9);
        // 100 discharged covers 90 of the deficit
        assert!((net + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_deficit_limited_by_stored_charge() {
        let mut battery = BatteryState::new(100.0, 1.0, 0.3);
        let net = battery.dispatch(-50.0);
        assert_eq!(battery.charge_mwh(), 0.0);
        assert!((net + 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_battery_passes_surplus_through() {
        let mut battery = BatteryState::new(10.0, 0.9, 1.0);
        let net = battery.dispatch(3.0);
        assert_eq!(battery.charge_mwh(), 10.0);
        assert_eq!(net, 3.0);
    }

    #[test]
    fn test_zero_net_energy_is_a_no_op() {
        let mut battery = BatteryState::new(10.0, 0.9, 0.4);
        let net = battery.dispatch(0.0);
        assert_eq!(net, 0.0);
        assert_eq!(battery.charge_mwh(), 4.0);
    }

    #[test]
    fn test_charge_stays_in_bounds_over_cycle() {
        let mut battery = BatteryState::new(5.0, 0.85, 0.5);
        let profile = [3.0, 4.0, -1.0, -7.0, -2.0, 9.0, 0.5, -0.25];
        for net in profile.iter().cycle().take(200) {
            battery.dispatch(*net);
            assert!(battery.charge_mwh() >= 0.0);
            assert!(battery.charge_mwh() <= battery.capacity_mwh);
        }
    }
}
