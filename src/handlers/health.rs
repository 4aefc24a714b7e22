//! Health check endpoint handler
//!
//! Always answers 200 while the process is up; storage connectivity is
//! reported alongside rather than failing the check.

use crate::handlers::AppState;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    /// `"connected"` or `"disconnected"`
    pub database: String,
}

/// GET /api/health handler
pub async fn handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = state.storage().is_connected().await;

    Json(HealthResponse {
        status: "OK".to_string(),
        message: "API is running".to_string(),
        database: connection_label(connected).to_string(),
    })
}

pub(crate) fn connection_label(connected: bool) -> &'static str {
    if connected { "connected" } else { "disconnected" }
}
