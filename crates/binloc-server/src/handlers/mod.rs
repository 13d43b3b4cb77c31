//! HTTP handler modules for the binloc API.
//!
//! Each sub-module implements thin handlers that parse requests, acquire the
//! service lock, delegate to [`LocationService`](crate::service::LocationService),
//! and return JSON responses. No business logic lives in handlers.

pub mod export;
pub mod locations;
pub mod parts;
pub mod status;
