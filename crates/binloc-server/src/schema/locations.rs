//! Location request/response types.

use serde::{Deserialize, Serialize};

use binloc_core::{InventoryEntry, LocationDraft, LocationRecord};

/// Query string for `GET /locations`.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationQuery {
    pub part_code: String,
}

/// Current state of one part code.
#[derive(Debug, Clone, Serialize)]
pub struct LocationResponse {
    pub part_code: String,
    /// Whether the code is in the registry.
    pub registered: bool,
    /// `null` until a location has been saved.
    pub location: Option<LocationRecord>,
}

/// Request to save the location of a registered part code.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveLocationRequest {
    pub part_code: String,
    #[serde(flatten)]
    pub draft: LocationDraft,
}

/// Response from saving a location.
#[derive(Debug, Clone, Serialize)]
pub struct SaveLocationResponse {
    pub location: LocationRecord,
}

/// Response for `GET /entries`.
#[derive(Debug, Clone, Serialize)]
pub struct EntriesResponse {
    pub entries: Vec<InventoryEntry>,
}
