//! Part-code handlers (resolve, register, import).

use axum::extract::{Query, State};
use axum::Json;

use crate::error::ApiError;
use crate::schema::parts::{
    ImportResponse, RegisterPartRequest, RegisterPartResponse, ResolveQuery, ResolveResponse,
};
use crate::state::AppState;

/// Resolves a scanned or typed query.
///
/// `GET /parts/resolve?q=...`
pub async fn resolve(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let response = service.resolve(&query.q)?;
    Ok(Json(response))
}

/// Registers an unmatched code after the user confirmed it.
///
/// `POST /parts`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterPartRequest>,
) -> Result<Json<RegisterPartResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let response = service.register_part(&req.part_code)?;
    Ok(Json(response))
}

/// Bulk-imports a CSV master list sent as the request body.
///
/// `POST /parts/import`
pub async fn import(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>, ApiError> {
    let mut service = state.service.lock().await;
    let response = service.import_csv(&body)?;
    Ok(Json(response))
}
