//! Core error types for binloc-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! validation failures of the inventory data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A location field that must be non-blank before a record can be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiredField {
    Row,
    Rack,
    Shelf,
}

impl RequiredField {
    /// All required fields, in the order they are checked and reported.
    pub const ALL: [RequiredField; 3] = [RequiredField::Row, RequiredField::Rack, RequiredField::Shelf];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredField::Row => "row",
            RequiredField::Rack => "rack",
            RequiredField::Shelf => "shelf",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core errors produced by the binloc-core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// One or more required location fields were blank after trimming.
    #[error("missing required field(s): {}", join_fields(fields))]
    MissingFields { fields: Vec<RequiredField> },

    /// A part code was empty after trimming.
    #[error("part code must not be empty")]
    EmptyPartCode,
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(RequiredField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
