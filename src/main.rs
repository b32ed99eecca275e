//! Dispatch simulator entry point: CLI wiring, offline runs, and the API server.

use std::path::Path;
use std::process;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dispatch_sim::cli::{self, CliOptions};
use dispatch_sim::config::SimulatorConfig;
use dispatch_sim::io::export::export_csv;
use dispatch_sim::io::readings::read_readings_file;
use dispatch_sim::runner::RunSettings;
use dispatch_sim::sim::consumption::ConsumptionModel;
use dispatch_sim::sim::engine::Engine;
use dispatch_sim::sim::kpi::LocationSummary;

fn init_tracing() {
    // RUST_LOG overrides the default level, e.g. RUST_LOG=dispatch_sim=debug
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Loads config: `--config` takes priority, then `--preset`, then the default preset.
fn load_config(cli: &CliOptions) -> SimulatorConfig {
    let loaded = if let Some(ref path) = cli.config {
        SimulatorConfig::from_toml_file(path)
    } else if let Some(ref name) = cli.preset {
        SimulatorConfig::from_preset(name)
    } else {
        Ok(SimulatorConfig::default())
    };

    let mut config = loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(ref root) = cli.store_root {
        config.store.root = root.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    config
}

/// Simulates one local CSV, prints every interval and the summary.
fn run_offline(
    config: &SimulatorConfig,
    input: &Path,
    location: Option<&str>,
    out: Option<&Path>,
) -> dispatch_sim::error::Result<()> {
    let readings = read_readings_file(input)?;
    let location = location
        .map(str::to_string)
        .or_else(|| input.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "local".to_string());

    let settings = RunSettings::from_config(config);
    let consumption = settings.consumption_for(0);
    info!(
        %location,
        rows = readings.len(),
        model = consumption.model_name(),
        "running offline simulation"
    );

    let mut engine = Engine::new(settings.params, consumption);
    let results = engine.run(&readings);

    for r in &results {
        println!("{r}");
    }

    let params = engine.params();
    let summary =
        LocationSummary::from_results(&results, params.initial_charge_mwh(), params.capacity_mwh);
    println!("\n[{location}]\n{summary}");
    println!("Final state of charge: {:.1}%", engine.battery().soc() * 100.0);

    if let Some(path) = out {
        export_csv(&results, path)?;
        eprintln!("Results written to {}", path.display());
    }
    Ok(())
}

#[cfg(feature = "api")]
fn run_server(config: &SimulatorConfig) {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use dispatch_sim::api::{AppState, serve};
    use dispatch_sim::store::FsStore;

    let store = FsStore::new(config.store.bucket_dir());
    info!(root = %store.root().display(), "using filesystem blob store");

    let state = Arc::new(AppState {
        store,
        settings: RunSettings::from_config(config),
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to create tokio runtime: {e}");
        process::exit(1);
    });
    if let Err(e) = rt.block_on(serve(state, addr)) {
        tracing::error!(error = %e, "server error");
        process::exit(1);
    }
}

#[cfg(not(feature = "api"))]
fn run_server(_config: &SimulatorConfig) {
    eprintln!("error: --serve requires the `api` feature");
    process::exit(1);
}

fn main() {
    let cli = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };
    if cli.help {
        cli::print_usage();
        return;
    }

    init_tracing();
    let config = load_config(&cli);

    if let Some(ref input) = cli.input {
        if let Err(e) = run_offline(
            &config,
            input,
            cli.location.as_deref(),
            cli.out.as_deref(),
        ) {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }

    if cli.serve {
        run_server(&config);
    }
}
