//! API request and response types.
//!
//! Field names are the contract the dashboard's simulation page consumes.

use serde::{Deserialize, Serialize};

use crate::sim::types::{FileRequest, LocationResult};

/// Body of `POST /run-simulation`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationRequest {
    /// Files to simulate, one per location.
    pub files: Vec<FileRequest>,
}

/// Successful simulation response.
#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    /// Always `true`.
    pub success: bool,
    /// One entry per requested file, in request order.
    pub data: Vec<LocationResult>,
}

impl SimulationResponse {
    pub fn new(data: Vec<LocationResult>) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure body for every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
