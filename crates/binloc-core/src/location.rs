//! Location records and the validation that guards every write.
//!
//! [`LocationDraft`] is what a caller submits: raw, untrimmed strings.
//! [`LocationDraft::validate`] turns it into [`LocationFields`], the only
//! input a store accepts, so no unvalidated value can reach a backend.

use chrono::{DateTime, Duration, DurationRound, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, RequiredField};
use crate::part::PartCode;

/// The physical storage address assigned to a part code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub part_code: String,
    pub row: String,
    pub rack: String,
    pub shelf: String,
    pub bin: Option<String>,
    /// Store time of the last write.
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
}

/// Unvalidated location input as typed by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDraft {
    #[serde(default)]
    pub row: String,
    #[serde(default)]
    pub rack: String,
    #[serde(default)]
    pub shelf: String,
    #[serde(default)]
    pub bin: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

/// Validated, trimmed location fields ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFields {
    row: String,
    rack: String,
    shelf: String,
    bin: Option<String>,
    updated_by: Option<String>,
}

impl LocationDraft {
    pub fn new(
        row: impl Into<String>,
        rack: impl Into<String>,
        shelf: impl Into<String>,
    ) -> Self {
        LocationDraft {
            row: row.into(),
            rack: rack.into(),
            shelf: shelf.into(),
            bin: None,
            updated_by: None,
        }
    }

    pub fn with_bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = Some(bin.into());
        self
    }

    pub fn with_updated_by(mut self, updated_by: impl Into<String>) -> Self {
        self.updated_by = Some(updated_by.into());
        self
    }

    /// Checks every required field and normalizes the optional ones.
    ///
    /// All blank required fields are collected before failing, so the error
    /// names each of them rather than just the first.
    pub fn validate(&self) -> Result<LocationFields, CoreError> {
        let row = self.row.trim();
        let rack = self.rack.trim();
        let shelf = self.shelf.trim();

        let missing: Vec<RequiredField> = RequiredField::ALL
            .into_iter()
            .zip([row, rack, shelf])
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| field)
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::MissingFields { fields: missing });
        }

        Ok(LocationFields {
            row: row.to_string(),
            rack: rack.to_string(),
            shelf: shelf.to_string(),
            bin: non_blank(self.bin.as_deref()),
            updated_by: non_blank(self.updated_by.as_deref()),
        })
    }
}

impl LocationFields {
    pub fn row(&self) -> &str {
        &self.row
    }

    pub fn rack(&self) -> &str {
        &self.rack
    }

    pub fn shelf(&self) -> &str {
        &self.shelf
    }

    pub fn bin(&self) -> Option<&str> {
        self.bin.as_deref()
    }

    pub fn updated_by(&self) -> Option<&str> {
        self.updated_by.as_deref()
    }

    /// Builds the record these fields produce for `part_code` at `updated_at`.
    pub fn into_record(self, part_code: &str, updated_at: DateTime<Utc>) -> LocationRecord {
        LocationRecord {
            part_code: part_code.to_string(),
            row: self.row,
            rack: self.rack,
            shelf: self.shelf,
            bin: self.bin,
            updated_at,
            updated_by: self.updated_by,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// One row of the registry/location join used for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub part: PartCode,
    pub location: Option<LocationRecord>,
}

/// The current time truncated to the microsecond precision every backend
/// stores.
pub fn now_micros() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(Duration::microseconds(1)).unwrap_or(now)
}

/// Returns the timestamp for a write that follows `previous`.
///
/// Timestamps carry microsecond precision. When the clock has not moved
/// past `previous` the result is `previous` plus one microsecond, so
/// `updated_at` strictly increases for a given record.
pub fn next_write_time(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = now_micros();
    match previous {
        Some(prev) if now <= prev => prev + Duration::microseconds(1),
        _ => now,
    }
}

/// Fixed-width RFC 3339 rendering used for storage and export.
///
/// Lexical order of the output equals chronological order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
