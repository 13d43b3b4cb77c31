//! Service status types.

use serde::Serialize;

/// Response for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub backend: String,
    pub part_codes: u64,
    pub locations: u64,
    /// Cache lifetime of the part-code index; `null` when disabled.
    pub index_ttl_secs: Option<u64>,
}
