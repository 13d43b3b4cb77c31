//! Application state with a shared `LocationService`.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` for use with
//! axum handlers. Uses `tokio::sync::Mutex` (async-aware) instead of
//! `std::sync::Mutex` (blocking) so handlers await the lock without blocking
//! the tokio runtime.
//!
//! Each request holds the lock for its whole service call, so a single
//! upsert never interleaves with another. Separate requests are
//! last-write-wins: a location read by one client may be overwritten by
//! another before the first client saves.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::service::LocationService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared location service (async Mutex -- non-blocking await).
    pub service: Arc<tokio::sync::Mutex<LocationService>>,
}

impl AppState {
    /// Creates a new `AppState` with a `LocationService` built from `config`.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let service = LocationService::new(config)?;
        Ok(AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
        })
    }

    /// Creates a new `AppState` over an empty in-memory store (for testing).
    pub fn in_memory() -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(LocationService::in_memory())),
        }
    }
}
