//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use binloc_core::{CoreError, RequiredField};
use binloc_storage::{InventoryError, StorageError};

/// Shown with every storage failure.
const STORAGE_HINT: &str =
    "check that the database path exists, is writable, and is not locked by another process";

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "VALIDATION_FAILED", "CONFLICT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured details (e.g., the missing fields).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Required location fields were blank (422).
    #[error("validation failed")]
    ValidationFailed(Vec<RequiredField>),

    /// The write conflicts with registry state, e.g. an unregistered code (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backing store failed; the user may retry (503).
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorDetail {
                    code: "BAD_REQUEST".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
            ApiError::ValidationFailed(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorDetail {
                    code: "VALIDATION_FAILED".to_string(),
                    message: CoreError::MissingFields {
                        fields: fields.clone(),
                    }
                    .to_string(),
                    details: Some(serde_json::json!({ "missing": fields })),
                },
            ),
            ApiError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ApiErrorDetail {
                    code: "CONFLICT".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
            ApiError::StorageUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorDetail {
                    code: "STORAGE_UNAVAILABLE".to_string(),
                    message: msg.clone(),
                    details: Some(serde_json::json!({ "hint": STORAGE_HINT })),
                },
            ),
            ApiError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    details: None,
                },
            ),
        };

        if status.is_server_error() {
            tracing::error!(code = %detail.code, "{}", detail.message);
        }

        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MissingFields { fields } => ApiError::ValidationFailed(fields),
            CoreError::EmptyPartCode => ApiError::BadRequest(CoreError::EmptyPartCode.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::UnknownPartCode { .. } => ApiError::Conflict(format!(
                "{}; register it with POST /parts before saving a location",
                err
            )),
            StorageError::MissingColumn { .. } | StorageError::Csv(_) => {
                ApiError::BadRequest(err.to_string())
            }
            StorageError::Sqlite(_)
            | StorageError::Migration(_)
            | StorageError::Io(_)
            | StorageError::Corrupt { .. } => ApiError::StorageUnavailable(err.to_string()),
        }
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Validation(err) => err.into(),
            InventoryError::Storage(err) => err.into(),
        }
    }
}
