//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use super::AppState;
use super::types::{ErrorResponse, HealthResponse, SimulationRequest, SimulationResponse};
use crate::error::SimError;
use crate::runner::run_simulation;
use crate::store::BlobStore;

impl IntoResponse for SimError {
    fn into_response(self) -> Response {
        let status = match &self {
            SimError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SimError::FileNotFound { .. } => StatusCode::NOT_FOUND,
            SimError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            SimError::Storage { .. } | SimError::Csv(_) | SimError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Runs the battery dispatch simulation for the requested files.
///
/// `POST /run-simulation` → 200 + `SimulationResponse` JSON
/// Missing file → 404 + `ErrorResponse`
/// Unreadable body → 400 + `ErrorResponse`
pub async fn run_simulation_handler<S: BlobStore>(
    State(state): State<Arc<AppState<S>>>,
    body: Bytes,
) -> Result<Json<SimulationResponse>, SimError> {
    let request: SimulationRequest = serde_json::from_slice(&body)
        .map_err(|e| SimError::InvalidRequest(format!("malformed body: {e}")))?;

    match run_simulation(&state.store, &request.files, &state.settings).await {
        Ok(data) => Ok(Json(SimulationResponse::new(data))),
        Err(e) => {
            warn!(error = %e, files = request.files.len(), "simulation request failed");
            Err(e)
        }
    }
}

/// `GET /health` → 200 + `{"status":"ok"}`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}
