//! Storage error types for binloc-storage.
//!
//! [`StorageError`] covers every failure a backend or the CSV boundary can
//! produce. [`InventoryError`] is returned by operations that validate input
//! before touching storage, keeping the two failure kinds distinct.

use binloc_core::CoreError;
use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The SQLite backend reported a failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// A location write referenced a part code that is not registered.
    #[error("part code not registered: '{code}'")]
    UnknownPartCode { code: String },

    /// A stored value could not be decoded.
    #[error("corrupt stored value: {reason}")]
    Corrupt { reason: String },

    /// Reading or writing CSV failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying I/O failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV import lacked a required column.
    #[error("csv input must have a column named '{column}'")]
    MissingColumn { column: String },
}

/// Errors from inventory operations that validate before writing.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Input was rejected before any write was attempted.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
