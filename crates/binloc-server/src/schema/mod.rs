//! API request/response types for the binloc HTTP API.
//!
//! These are the JSON shapes exchanged with clients. Domain records from
//! binloc-core are embedded directly where their serde form is already the
//! wire form.

pub mod locations;
pub mod parts;
pub mod status;
