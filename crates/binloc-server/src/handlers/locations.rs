//! Location handlers (lookup, save, list).

use axum::extract::{Query, State};
use axum::Json;

use crate::error::ApiError;
use crate::schema::locations::{
    EntriesResponse, LocationQuery, LocationResponse, SaveLocationRequest, SaveLocationResponse,
};
use crate::state::AppState;

/// Current location of a part code; `location` is `null` if none is saved.
///
/// `GET /locations?part_code=...`
pub async fn get_location(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<LocationResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let response = service.get_location(&query.part_code)?;
    Ok(Json(response))
}

/// Saves the location of a registered part code.
///
/// `PUT /locations`
pub async fn save_location(
    State(state): State<AppState>,
    Json(req): Json<SaveLocationRequest>,
) -> Result<Json<SaveLocationResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let response = service.save_location(&req)?;
    Ok(Json(response))
}

/// Every registered code with its location.
///
/// `GET /entries`
pub async fn list_entries(
    State(state): State<AppState>,
) -> Result<Json<EntriesResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let response = service.entries()?;
    Ok(Json(response))
}
