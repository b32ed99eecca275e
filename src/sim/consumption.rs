//! Synthetic consumption sources.
//!
//! Consumption is not measured; each interval draws a placeholder value
//! from one of these models. Random models own a seedable `StdRng` so runs
//! can be reproduced.

use chrono::{DateTime, NaiveDateTime, Timelike};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::warn;

use crate::config::ConsumptionConfig;

/// Trait for anything that produces a consumption value per interval.
pub trait ConsumptionModel {
    /// Returns the consumption (MWh) for one interval.
    ///
    /// # Arguments
    ///
    /// * `production_mwh` - Production of the same interval (MWh)
    /// * `timestamp` - Raw timestamp of the interval
    fn consumption_mwh(&mut self, production_mwh: f64, timestamp: &str) -> f64;

    /// Returns a short model name for logs and reports.
    fn model_name(&self) -> &'static str;
}

/// Consumption as a uniformly random share of production.
///
/// Each draw is `production * U(0, max_ratio)`.
#[derive(Debug, Clone)]
pub struct UniformShare {
    /// Upper bound (exclusive) of the production share.
    pub max_ratio: f64,
    rng: StdRng,
}

impl UniformShare {
    pub fn new(max_ratio: f64, rng: StdRng) -> Self {
        Self {
            max_ratio: max_ratio.max(0.0),
            rng,
        }
    }

    pub fn seeded(max_ratio: f64, seed: u64) -> Self {
        Self::new(max_ratio, StdRng::seed_from_u64(seed))
    }
}

impl ConsumptionModel for UniformShare {
    fn consumption_mwh(&mut self, production_mwh: f64, _timestamp: &str) -> f64 {
        let u: f64 = self.rng.random();
        production_mwh * u * self.max_ratio
    }

    fn model_name(&self) -> &'static str {
        "uniform"
    }
}

/// One hour-of-day band of the consumption profile (MWh).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileBand {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl ProfileBand {
    const fn new(mean: f64, min: f64, max: f64) -> Self {
        Self { mean, min, max }
    }
}

/// Time-of-day consumption drawn from clipped normal distributions.
///
/// Independent of production. Night hours are low, late morning peaks.
#[derive(Debug, Clone)]
pub struct HourlyProfile {
    /// Multiplier applied to every band.
    pub scale: f64,
    /// Standard deviation of the normal draw (MWh, before scaling).
    pub std_dev: f64,
    rng: StdRng,
}

impl HourlyProfile {
    pub const STD_DEV: f64 = 0.05;

    pub fn new(scale: f64, rng: StdRng) -> Self {
        Self {
            scale: scale.max(0.0),
            std_dev: Self::STD_DEV,
            rng,
        }
    }

    pub fn seeded(scale: f64, seed: u64) -> Self {
        Self::new(scale, StdRng::seed_from_u64(seed))
    }

    /// Returns the band for an hour of day; `None` selects the off-peak band.
    pub fn band(hour: Option<u32>) -> ProfileBand {
        match hour {
            Some(1..=6) => ProfileBand::new(0.075, 0.050, 0.100),
            Some(7..=8) => ProfileBand::new(0.200, 0.150, 0.300),
            Some(9..=12) => ProfileBand::new(0.550, 0.450, 0.700),
            Some(13..=14) => ProfileBand::new(0.500, 0.400, 0.600),
            _ => ProfileBand::new(0.150, 0.100, 0.200),
        }
    }
}

impl ConsumptionModel for HourlyProfile {
    fn consumption_mwh(&mut self, _production_mwh: f64, timestamp: &str) -> f64 {
        let band = Self::band(hour_of_day(timestamp));
        let draw = band.mean + gaussian_noise(&mut self.rng, self.std_dev);
        draw.clamp(band.min, band.max) * self.scale
    }

    fn model_name(&self) -> &'static str {
        "profile"
    }
}

/// Constant consumption every interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedConsumption {
    pub mwh: f64,
}

impl FixedConsumption {
    pub fn new(mwh: f64) -> Self {
        Self { mwh }
    }
}

impl ConsumptionModel for FixedConsumption {
    fn consumption_mwh(&mut self, _production_mwh: f64, _timestamp: &str) -> f64 {
        self.mwh
    }

    fn model_name(&self) -> &'static str {
        "fixed"
    }
}

/// Consumption model selected by configuration.
///
/// Enum rather than a trait object since the model set is fixed.
#[derive(Debug, Clone)]
pub enum Consumption {
    Uniform(UniformShare),
    Profile(HourlyProfile),
    Fixed(FixedConsumption),
}

impl Consumption {
    /// Builds the configured model.
    ///
    /// With `seed = None` the generator is seeded from OS entropy and
    /// draws are not reproducible.
    pub fn from_config(cfg: &ConsumptionConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        match cfg.model.as_str() {
            "profile" => Consumption::Profile(HourlyProfile::new(cfg.profile_scale, rng)),
            "fixed" => Consumption::Fixed(FixedConsumption::new(cfg.fixed_mwh)),
            "uniform" => Consumption::Uniform(UniformShare::new(cfg.max_ratio, rng)),
            other => {
                warn!(model = other, "unknown consumption model, falling back to uniform");
                Consumption::Uniform(UniformShare::new(cfg.max_ratio, rng))
            }
        }
    }
}

impl ConsumptionModel for Consumption {
    fn consumption_mwh(&mut self, production_mwh: f64, timestamp: &str) -> f64 {
        match self {
            Consumption::Uniform(m) => m.consumption_mwh(production_mwh, timestamp),
            Consumption::Profile(m) => m.consumption_mwh(production_mwh, timestamp),
            Consumption::Fixed(m) => m.consumption_mwh(production_mwh, timestamp),
        }
    }

    fn model_name(&self) -> &'static str {
        match self {
            Consumption::Uniform(m) => m.model_name(),
            Consumption::Profile(m) => m.model_name(),
            Consumption::Fixed(m) => m.model_name(),
        }
    }
}

/// Timestamp layouts accepted for hour-of-day lookup, tried in order after RFC 3339.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    // PVGIS hourly export
    "%Y%m%d:%H%M",
];

/// Extracts the hour of day from a raw timestamp, if it can be parsed.
pub fn hour_of_day(timestamp: &str) -> Option<u32> {
    let ts = timestamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.hour());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(ts, fmt).ok())
        .map(|dt| dt.hour())
}

/// Generates Gaussian noise using the Box-Muller transform.
///
/// # Arguments
///
/// * `rng` - Random number generator
/// * `std_dev` - Standard deviation of the noise
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
