//! HTTP API for running dispatch simulations.
//!
//! Provides:
//! - `POST /run-simulation`: simulate the named files, one battery per location
//! - `GET /health`: liveness probe
//!
//! Every response carries permissive CORS headers so the dashboard can call
//! the service from any origin.

mod handlers;
mod types;

pub use types::{ErrorResponse, HealthResponse, SimulationRequest, SimulationResponse};

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::runner::RunSettings;
use crate::store::BlobStore;

/// Application state shared across all request handlers.
///
/// Read-only after construction and wrapped in `Arc`; every request builds
/// its own batteries and generators, so no locks are needed.
pub struct AppState<S: BlobStore> {
    /// Where location payloads are fetched from.
    pub store: S,
    /// Battery, consumption, seed, and timeout settings.
    pub settings: RunSettings,
}

/// CORS policy: any origin, and the headers the dashboard's client library sends.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

/// Builds the axum router with all API routes.
pub fn router<S: BlobStore>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route(
            "/run-simulation",
            post(handlers::run_simulation_handler::<S>),
        )
        .route("/health", get(handlers::health))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds to the given address and serves the API until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve<S: BlobStore>(state: Arc<AppState<S>>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("dispatch simulator listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
