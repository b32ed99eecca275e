//! TOML-based simulator configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::sim::types::SimParams;

/// Top-level configuration parsed from TOML.
///
/// All fields have defaults matching the `default` preset. Load from TOML
/// with [`SimulatorConfig::from_toml_file`] or use
/// [`SimulatorConfig::from_preset`] for a built-in preset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Global simulation parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Battery parameters, applied to every location.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Synthetic consumption model.
    #[serde(default)]
    pub consumption: ConsumptionConfig,
    /// Blob store location.
    #[serde(default)]
    pub store: StoreConfig,
    /// HTTP server parameters.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Global simulation parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed; absent means draws are seeded from OS entropy.
    pub seed: Option<u64>,
    /// Divisor converting input values into MWh.
    pub production_divisor: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            production_divisor: 1000.0,
        }
    }
}

/// Battery parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Total energy capacity (MWh).
    pub capacity_mwh: f64,
    /// Per-leg efficiency (0.0–1.0, exclusive of 0).
    pub efficiency: f64,
    /// Initial state of charge (0.0–1.0).
    pub initial_soc: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_mwh: 1000.0,
            efficiency: 0.9,
            initial_soc: 0.5,
        }
    }
}

/// Synthetic consumption model parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumptionConfig {
    /// Model: `"uniform"`, `"profile"`, or `"fixed"`.
    pub model: String,
    /// Upper bound of the production share for the uniform model.
    pub max_ratio: f64,
    /// Multiplier for the profile model's bands.
    pub profile_scale: f64,
    /// Constant consumption per interval for the fixed model (MWh).
    pub fixed_mwh: f64,
}

impl Default for ConsumptionConfig {
    fn default() -> Self {
        Self {
            model: "uniform".to_string(),
            max_ratio: 1.2,
            profile_scale: 1.0,
            fixed_mwh: 0.0,
        }
    }
}

/// Blob store location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Root directory of the filesystem store.
    pub root: PathBuf,
    /// Bucket directory under `root`.
    pub bucket: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
            bucket: "consumption_files".to_string(),
        }
    }
}

impl StoreConfig {
    /// Directory holding the bucket's objects.
    pub fn bucket_dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }
}

/// HTTP server parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen port.
    pub port: u16,
    /// Upper bound for one simulation request; 0 disables the timeout.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            request_timeout_secs: 30,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.efficiency"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl SimulatorConfig {
    /// Available preset names.
    pub const PRESETS: &'static [&'static str] = &["default", "community"];

    /// Allowed consumption model names.
    pub const CONSUMPTION_MODELS: &'static [&'static str] = &["uniform", "profile", "fixed"];

    /// Returns the community preset: small battery starting empty, time-of-day consumption.
    pub fn community() -> Self {
        Self {
            battery: BatteryConfig {
                capacity_mwh: 2.0,
                initial_soc: 0.0,
                ..BatteryConfig::default()
            },
            consumption: ConsumptionConfig {
                model: "profile".to_string(),
                ..ConsumptionConfig::default()
            },
            ..Self::default()
        }
    }

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default()),
            "community" => Ok(Self::community()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Battery and unit-conversion parameters for the engine.
    pub fn sim_params(&self) -> SimParams {
        SimParams {
            capacity_mwh: self.battery.capacity_mwh,
            efficiency: self.battery.efficiency,
            initial_soc: self.battery.initial_soc,
            production_divisor: self.simulation.production_divisor,
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigError {
                field: field.to_string(),
                message,
            });
        };

        let s = &self.simulation;
        if !(s.production_divisor > 0.0 && s.production_divisor.is_finite()) {
            push("simulation.production_divisor", "must be > 0".into());
        }

        let bat = &self.battery;
        if !(bat.capacity_mwh > 0.0 && bat.capacity_mwh.is_finite()) {
            push("battery.capacity_mwh", "must be > 0".into());
        }
        if !(bat.efficiency > 0.0 && bat.efficiency <= 1.0) {
            push("battery.efficiency", "must be in (0.0, 1.0]".into());
        }
        if !(0.0..=1.0).contains(&bat.initial_soc) {
            push("battery.initial_soc", "must be in [0.0, 1.0]".into());
        }

        let c = &self.consumption;
        if !Self::CONSUMPTION_MODELS.contains(&c.model.as_str()) {
            push(
                "consumption.model",
                format!(
                    "must be one of {}, got \"{}\"",
                    Self::CONSUMPTION_MODELS.join(", "),
                    c.model
                ),
            );
        }
        if !(c.max_ratio >= 0.0 && c.max_ratio.is_finite()) {
            push("consumption.max_ratio", "must be >= 0".into());
        }
        if !(c.profile_scale >= 0.0 && c.profile_scale.is_finite()) {
            push("consumption.profile_scale", "must be >= 0".into());
        }
        if !(c.fixed_mwh >= 0.0 && c.fixed_mwh.is_finite()) {
            push("consumption.fixed_mwh", "must be >= 0".into());
        }

        if self.store.bucket.trim().is_empty() {
            push("store.bucket", "must not be empty".into());
        }

        errors
    }
}
