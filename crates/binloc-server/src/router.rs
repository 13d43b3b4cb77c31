//! Router assembly for the binloc HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Part codes travel in query strings and bodies, never in the path, so
/// codes containing `/` need no escaping.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::status::health))
        // Part codes
        .route("/parts", post(handlers::parts::register))
        .route("/parts/resolve", get(handlers::parts::resolve))
        .route("/parts/import", post(handlers::parts::import))
        // Locations
        .route(
            "/locations",
            get(handlers::locations::get_location).put(handlers::locations::save_location),
        )
        .route("/entries", get(handlers::locations::list_entries))
        .route("/export.csv", get(handlers::export::export_csv))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
