//! Part-code request/response types: resolution, registration, import.

use serde::{Deserialize, Serialize};

use binloc_storage::Resolution;

/// Query string for `GET /parts/resolve`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveQuery {
    /// Raw scanned or typed text.
    #[serde(default)]
    pub q: String,
}

/// Outcome of resolving a query, tagged by `status`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolveResponse {
    /// The query was blank.
    Idle,
    /// The query is a registered part code.
    Exact { part_code: String },
    /// Candidates the user must choose from.
    Suggestions {
        query: String,
        candidates: Vec<String>,
    },
    /// No match; the client may offer `POST /parts`.
    Unregistered { query: String },
}

impl From<Resolution> for ResolveResponse {
    fn from(resolution: Resolution) -> Self {
        match resolution {
            Resolution::Idle => ResolveResponse::Idle,
            Resolution::Exact(part_code) => ResolveResponse::Exact { part_code },
            Resolution::Suggestions { query, candidates } => {
                ResolveResponse::Suggestions { query, candidates }
            }
            Resolution::Unregistered(query) => ResolveResponse::Unregistered { query },
        }
    }
}

/// Request to register a part code by hand.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPartRequest {
    pub part_code: String,
}

/// Response from registering a part code.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterPartResponse {
    /// The trimmed code as stored.
    pub part_code: String,
    /// `false` when the code was already registered.
    pub created: bool,
}

/// Response from a CSV bulk import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    /// Distinct non-blank codes found in the upload.
    pub received: usize,
    /// Codes that were not registered before.
    pub inserted: usize,
    /// Registry size after the import.
    pub total: u64,
}
