//! Health handler.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::schema::status::HealthResponse;
use crate::state::AppState;

/// Store counts; fails with 503 when the store is unreachable.
///
/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let response = service.health()?;
    Ok(Json(response))
}
