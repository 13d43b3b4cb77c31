//! Storage abstraction for the binloc part-code registry and location table.
//!
//! Provides the [`InventoryStore`] trait defining the storage contract that
//! all backends implement, plus the [`InMemoryStore`] and [`SqliteStore`] as
//! first-class backends.
//!
//! # Architecture
//!
//! - **Backends** implement [`InventoryStore`]: exact lookup, prefix scan,
//!   keyed upsert, conflict-ignoring bulk insert, counts and export.
//! - **Components** sit on top of any backend: [`PartCodeRegistry`] answers
//!   code queries (optionally from a cached [`CodeIndex`]) and
//!   [`LocationStore`] validates and writes location records.
//! - [`Inventory`] owns a backend and its index, hands out both components,
//!   and runs the resolution procedure.
//!
//! # Modules
//!
//! - [`error`]: StorageError and InventoryError
//! - [`traits`]: InventoryStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: SQL migrations and connection setup
//! - [`sqlite`]: SqliteStore implementation
//! - [`registry`]: PartCodeRegistry and CodeIndex
//! - [`locations`]: LocationStore
//! - [`inventory`]: Inventory and the resolution procedure
//! - [`csv_io`]: CSV import/export framing

pub mod csv_io;
pub mod error;
pub mod inventory;
pub mod locations;
pub mod memory;
pub mod registry;
pub mod schema;
pub mod sqlite;
pub mod traits;

// Re-export key types for ergonomic use.
pub use error::{InventoryError, StorageError};
pub use inventory::{Inventory, Registration, Resolution, SUGGESTION_LIMIT};
pub use locations::LocationStore;
pub use memory::InMemoryStore;
pub use registry::{CodeIndex, PartCodeRegistry};
pub use sqlite::SqliteStore;
pub use traits::InventoryStore;
