//! HTTP/JSON API server for the binloc part-location inventory.
//!
//! Exposes part-code resolution, manual registration, CSV import, location
//! lookup and upsert, and export over a REST API. This crate contains the
//! server configuration, API schema types, error handling, and routes.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
