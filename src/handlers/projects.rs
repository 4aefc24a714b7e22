//! Projects listing handler

use crate::error::AppError;
use crate::handlers::AppState;
use crate::storage::Project;
use axum::{Json, extract::State};

/// GET /api/projects handler
pub async fn handler(State(state): State<AppState>) -> Result<Json<Vec<Project>>, AppError> {
    if !state.storage().is_connected().await {
        return Err(AppError::StorageUnavailable);
    }

    let projects = state.storage().projects().await?;
    tracing::debug!(project_count = projects.len(), "Listing projects");
    Ok(Json(projects))
}
