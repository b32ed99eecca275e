//! Post-hoc summary of a location's dispatch results.

use std::fmt;

use serde::Serialize;

use super::types::DispatchResult;

/// Aggregate indicators derived from one location's dispatch series.
///
/// Computed post-hoc from `&[DispatchResult]` so the summary can never
/// disagree with the per-interval records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSummary {
    /// Number of simulated intervals.
    pub intervals: usize,
    /// Total production (MWh).
    pub total_production_mwh: f64,
    /// Total synthetic consumption (MWh).
    pub total_consumption_mwh: f64,
    /// Energy added to the battery (MWh, stored side).
    pub total_charged_mwh: f64,
    /// Energy removed from the battery (MWh, stored side).
    pub total_discharged_mwh: f64,
    /// Surplus the battery could not absorb (MWh, sum of positive net energy).
    pub residual_surplus_mwh: f64,
    /// Deficit the battery could not cover (MWh, magnitude of negative net energy).
    pub unmet_deficit_mwh: f64,
    /// Lowest battery charge seen (MWh).
    pub min_charge_mwh: f64,
    /// Highest battery charge seen (MWh).
    pub max_charge_mwh: f64,
    /// Battery charge after the last interval (MWh).
    pub final_charge_mwh: f64,
    /// Equivalent full cycles: `(charged + discharged) / (2 * capacity)`.
    pub equivalent_full_cycles: f64,
}

impl LocationSummary {
    /// Computes the summary from a complete dispatch series.
    ///
    /// # Arguments
    ///
    /// * `results` - Dispatch records in simulation order
    /// * `initial_charge_mwh` - Battery charge before the first interval
    /// * `capacity_mwh` - Battery capacity for the cycle count
    pub fn from_results(
        results: &[DispatchResult],
        initial_charge_mwh: f64,
        capacity_mwh: f64,
    ) -> Self {
        let mut summary = Self {
            intervals: results.len(),
            total_production_mwh: 0.0,
            total_consumption_mwh: 0.0,
            total_charged_mwh: 0.0,
            total_discharged_mwh: 0.0,
            residual_surplus_mwh: 0.0,
            unmet_deficit_mwh: 0.0,
            min_charge_mwh: initial_charge_mwh,
            max_charge_mwh: initial_charge_mwh,
            final_charge_mwh: initial_charge_mwh,
            equivalent_full_cycles: 0.0,
        };

        let mut previous = initial_charge_mwh;
        for r in results {
            summary.total_production_mwh += r.production;
            summary.total_consumption_mwh += r.consumption;

            let delta = r.battery_charge - previous;
            if delta > 0.0 {
                summary.total_charged_mwh += delta;
            } else {
                summary.total_discharged_mwh -= delta;
            }
            previous = r.battery_charge;

            if r.net_energy > 0.0 {
                summary.residual_surplus_mwh += r.net_energy;
            } else {
                summary.unmet_deficit_mwh -= r.net_energy;
            }

            summary.min_charge_mwh = summary.min_charge_mwh.min(r.battery_charge);
            summary.max_charge_mwh = summary.max_charge_mwh.max(r.battery_charge);
        }
        summary.final_charge_mwh = previous;

        if capacity_mwh > 0.0 {
            summary.equivalent_full_cycles =
                (summary.total_charged_mwh + summary.total_discharged_mwh) / (2.0 * capacity_mwh);
        }

        summary
    }
}

impl fmt::Display for LocationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Dispatch Summary ---")?;
        writeln!(f, "Intervals:             {}", self.intervals)?;
        writeln!(f, "Production:            {:.3} MWh", self.total_production_mwh)?;
        writeln!(f, "Consumption:           {:.3} MWh", self.total_consumption_mwh)?;
        writeln!(
            f,
            "Battery charged:       {:.3} MWh / discharged {:.3} MWh ({:.2} equiv. cycles)",
            self.total_charged_mwh, self.total_discharged_mwh, self.equivalent_full_cycles
        )?;
        writeln!(f, "Residual surplus:      {:.3} MWh", self.residual_surplus_mwh)?;
        writeln!(f, "Unmet deficit:         {:.3} MWh", self.unmet_deficit_mwh)?;
        write!(
            f,
            "Charge range:          {:.3}..{:.3} MWh (final {:.3} MWh)",
            self.min_charge_mwh, self.max_charge_mwh, self.final_charge_mwh
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(production: f64, consumption: f64, charge: f64, net: f64) -> DispatchResult {
        DispatchResult {
            timestamp: String::new(),
            production,
            consumption,
            battery_charge: charge,
            net_energy: net,
        }
    }

    #[test]
    fn charge_deltas_split_into_charged_and_discharged() {
        let results = vec![
            make_result(2.0, 0.0, 7.0, 0.0),
            make_result(0.0, 1.0, 6.0, 0.0),
            make_result(0.0, 1.0, 4.0, 0.0),
        ];
        let kpi = LocationSummary::from_results(&results, 5.0, 10.0);
        assert!((kpi.total_charged_mwh - 2.0).abs() < 1e-9);
        assert!((kpi.total_discharged_mwh - 3.0).abs() < 1e-9);
        assert!((kpi.equivalent_full_cycles - 0.25).abs() < 1e-9);
        assert_eq!(kpi.min_charge_mwh, 4.0);
        assert_eq!(kpi.max_charge_mwh, 7.0);
        assert_eq!(kpi.final_charge_mwh, 4.0);
    }

    #[test]
    fn net_energy_split_into_surplus_and_deficit() {
        let results = vec![
            make_result(5.0, 0.0, 10.0, 1.5),
            make_result(0.0, 3.0, 0.0, -0.5),
            make_result(0.0, 3.0, 0.0, -2.0),
        ];
        let kpi = LocationSummary::from_results(&results, 10.0, 10.0);
        assert_eq!(kpi.residual_surplus_mwh, 1.5);
        assert_eq!(kpi.unmet_deficit_mwh, 2.5);
        assert_eq!(kpi.total_production_mwh, 5.0);
        assert_eq!(kpi.total_consumption_mwh, 6.0);
    }

    #[test]
    fn empty_results() {
        let kpi = LocationSummary::from_results(&[], 500.0, 1000.0);
        assert_eq!(kpi.intervals, 0);
        assert_eq!(kpi.final_charge_mwh, 500.0);
        assert_eq!(kpi.equivalent_full_cycles, 0.0);
    }

    #[test]
    fn zero_capacity_has_no_cycles() {
        let results = vec![make_result(1.0, 0.0, 0.0, 1.0)];
        let kpi = LocationSummary::from_results(&results, 0.0, 0.0);
        assert_eq!(kpi.equivalent_full_cycles, 0.0);
    }
}
