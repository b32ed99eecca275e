//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;

use dispatch_sim::runner::RunSettings;
use dispatch_sim::sim::types::SimParams;

/// Default battery (1000 MWh, 90% efficiency, 50% initial charge, Wh input).
pub fn default_params() -> SimParams {
    SimParams::default()
}

/// Default settings with a fixed seed so runs are reproducible.
pub fn seeded_settings(seed: u64) -> RunSettings {
    RunSettings {
        seed: Some(seed),
        ..RunSettings::default()
    }
}

/// A day of hourly PV production (Wh) with a bell-shaped daylight curve.
pub fn solar_day_csv(peak_wh: f64) -> String {
    let mut csv = String::from("time,P_Wh,G_i,H_sun\n");
    for h in 0..24 {
        let wh = if (6..18).contains(&h) {
            let x = (h as f64 - 6.0) / 12.0 * std::f64::consts::PI;
            peak_wh * x.sin()
        } else {
            0.0
        };
        csv.push_str(&format!("2022-06-21T{h:02}:10:00,{wh:.2},0,0\n"));
    }
    csv
}

/// Writes `content` to `<root>/simulations/<location>/<filename>`.
pub fn write_object(root: &Path, location: &str, filename: &str, content: &str) {
    let dir = root.join("simulations").join(location);
    std::fs::create_dir_all(&dir).expect("create object dir");
    std::fs::write(dir.join(filename), content).expect("write object");
}
