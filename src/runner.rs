//! Multi-location simulation request.
//!
//! All payloads are fetched concurrently; a single missing file fails the
//! whole request. Each location is then simulated from its own fresh
//! battery and its own consumption generator. The run is one future, so
//! dropping it (or hitting the timeout) cancels every in-flight fetch.

use std::time::Duration;

use futures_util::future::try_join_all;
use tracing::{debug, info};

use crate::config::{ConsumptionConfig, SimulatorConfig};
use crate::error::{Result, SimError};
use crate::io::readings::parse_readings;
use crate::sim::consumption::Consumption;
use crate::sim::engine::simulate_location;
use crate::sim::types::{FileRequest, LocationResult, SimParams};
use crate::store::{BlobStore, object_path};

/// Everything a run needs besides the store and the file list.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Battery and unit-conversion parameters.
    pub params: SimParams,
    /// Consumption model for every location.
    pub consumption: ConsumptionConfig,
    /// Master seed; location `i` draws from `seed + i`.
    pub seed: Option<u64>,
    /// Upper bound for the whole run.
    pub timeout: Option<Duration>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::from_config(&SimulatorConfig::default())
    }
}

impl RunSettings {
    pub fn from_config(cfg: &SimulatorConfig) -> Self {
        let timeout = match cfg.server.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self {
            params: cfg.sim_params(),
            consumption: cfg.consumption.clone(),
            seed: cfg.simulation.seed,
            timeout,
        }
    }

    /// Builds the consumption model for the location at `index` in the request.
    pub fn consumption_for(&self, index: usize) -> Consumption {
        let seed = self.seed.map(|s| s.wrapping_add(index as u64));
        Consumption::from_config(&self.consumption, seed)
    }
}

/// Runs the simulation for every requested file, in request order.
///
/// # Errors
///
/// - `SimError::InvalidRequest` if a location or filename is not a valid path segment
/// - `SimError::FileNotFound` if any named file is absent from the store
/// - `SimError::Storage` if the store fails
/// - `SimError::Timeout` if the run exceeds `settings.timeout`
pub async fn run_simulation<S: BlobStore>(
    store: &S,
    files: &[FileRequest],
    settings: &RunSettings,
) -> Result<Vec<LocationResult>> {
    match settings.timeout {
        Some(limit) => tokio::time::timeout(limit, run_all(store, files, settings))
            .await
            .map_err(|_| SimError::Timeout { limit })?,
        None => run_all(store, files, settings).await,
    }
}

async fn run_all<S: BlobStore>(
    store: &S,
    files: &[FileRequest],
    settings: &RunSettings,
) -> Result<Vec<LocationResult>> {
    let paths = files
        .iter()
        .map(|f| object_path(&f.location, &f.filename))
        .collect::<Result<Vec<_>>>()?;

    let fetches = files.iter().zip(&paths).map(|(file, path)| async move {
        store
            .fetch(path)
            .await?
            .ok_or_else(|| SimError::FileNotFound {
                filename: file.filename.clone(),
            })
    });
    let payloads = try_join_all(fetches).await?;

    let results = files
        .iter()
        .zip(&payloads)
        .enumerate()
        .map(|(index, (file, payload))| {
            let readings = parse_readings(payload);
            debug!(
                location = %file.location,
                rows = readings.len(),
                "parsed payload"
            );
            let hourly_data =
                simulate_location(&readings, settings.params, settings.consumption_for(index));
            info!(
                location = %file.location,
                filename = %file.filename,
                intervals = hourly_data.len(),
                "simulated location"
            );
            LocationResult {
                location: file.location.clone(),
                hourly_data,
            }
        })
        .collect();

    Ok(results)
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::store::MemoryStore;

    /// Store whose fetches never finish within a test's patience.
    struct StalledStore;

    impl BlobStore for StalledStore {
        async fn fetch(&self, _path: &str) -> Result<Option<Vec<u8>>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Some(b"ts,v\nt0,1\n".to_vec()))
        }
    }

    /// Store whose backend is unreachable.
    struct OfflineStore;

    impl BlobStore for OfflineStore {
        async fn fetch(&self, path: &str) -> Result<Option<Vec<u8>>> {
            Err(SimError::Storage {
                path: path.to_string(),
                source: io::Error::other("backend offline"),
            })
        }
    }

    fn seeded_settings() -> RunSettings {
        RunSettings {
            seed: Some(42),
            ..RunSettings::default()
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_object("Rome", "a.csv", "ts,v\nt0,1000\nt1,2000\nt2,oops\n")
            .with_object("Catania", "b.csv", "ts,v\nt0,500\n")
            .with_object("Empty", "c.csv", "ts,v\n")
    }

    #[tokio::test]
    async fn results_follow_request_order() {
        let files = vec![
            FileRequest::new("Catania", "b.csv"),
            FileRequest::new("Rome", "a.csv"),
        ];
        let results = run_simulation(&store(), &files, &seeded_settings())
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].location, "Catania");
        assert_eq!(results[0].hourly_data.len(), 1);
        assert_eq!(results[1].location, "Rome");
        assert_eq!(results[1].hourly_data.len(), 2);
    }

    #[tokio::test]
    async fn each_location_starts_from_a_fresh_battery() {
        let mut settings = seeded_settings();
        settings.consumption.model = "fixed".to_string();
        settings.consumption.fixed_mwh = 0.0;
        let files = vec![
            FileRequest::new("Rome", "a.csv"),
            FileRequest::new("Catania", "b.csv"),
        ];
        let results = run_simulation(&store(), &files, &settings).await.unwrap();
        // Catania's first interval charges from 500, not from Rome's final charge
        let expected = 500.0 + 0.5 * 0.9;
        assert!((results[1].hourly_data[0].battery_charge - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn header_only_payload_yields_empty_series() {
        let files = vec![FileRequest::new("Empty", "c.csv")];
        let results = run_simulation(&store(), &files, &seeded_settings())
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].hourly_data.is_empty());
    }

    #[tokio::test]
    async fn missing_file_fails_whole_request() {
        let files = vec![
            FileRequest::new("Rome", "a.csv"),
            FileRequest::new("Rome", "missing.csv"),
        ];
        let err = run_simulation(&store(), &files, &seeded_settings())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "File not found: missing.csv");
    }

    #[tokio::test]
    async fn invalid_segment_is_rejected_before_fetching() {
        let files = vec![FileRequest::new("..", "a.csv")];
        let err = run_simulation(&store(), &files, &seeded_settings())
            .await
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn seeded_runs_are_reproducible() {
        let files = vec![FileRequest::new("Rome", "a.csv")];
        let a = run_simulation(&store(), &files, &seeded_settings())
            .await
            .unwrap();
        let b = run_simulation(&store(), &files, &seeded_settings())
            .await
            .unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn empty_request_succeeds() {
        let results = run_simulation(&store(), &[], &seeded_settings())
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn slow_store_hits_timeout() {
        let settings = RunSettings {
            timeout: Some(Duration::from_millis(10)),
            ..seeded_settings()
        };
        let files = vec![FileRequest::new("Rome", "a.csv")];
        let err = run_simulation(&StalledStore, &files, &settings)
            .await
            .unwrap_err();
        assert!(matches!(err, SimError::Timeout { limit } if limit == Duration::from_millis(10)));
    }

    #[tokio::test]
    async fn storage_failure_fails_whole_request() {
        let files = vec![FileRequest::new("Rome", "a.csv")];
        let err = run_simulation(&OfflineStore, &files, &seeded_settings())
            .await
            .unwrap_err();
        match err {
            SimError::Storage { path, .. } => assert_eq!(path, "simulations/Rome/a.csv"),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn zero_timeout_disables_limit() {
        let mut cfg = SimulatorConfig::default();
        cfg.server.request_timeout_secs = 0;
        assert!(RunSettings::from_config(&cfg).timeout.is_none());
        cfg.server.request_timeout_secs = 5;
        assert_eq!(
            RunSettings::from_config(&cfg).timeout,
            Some(Duration::from_secs(5))
        );
    }
}
