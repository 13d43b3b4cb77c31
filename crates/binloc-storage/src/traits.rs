//! The [`InventoryStore`] trait defining the storage contract for part codes
//! and their locations.
//!
//! The trait is the whole capability set the inventory needs from a backend:
//! exact lookup, prefix scan, keyed upsert, conflict-ignoring bulk insert,
//! counts, and a full export. All backends (InMemoryStore, SqliteStore, etc.)
//! implement it, so they are swappable without changing orchestration logic.
//!
//! Prefix matching is case-sensitive and byte-wise on every backend.

use binloc_core::{CodeSource, InventoryEntry, LocationFields, LocationRecord, PartCode};

use crate::error::StorageError;

/// The storage contract for the part-code registry and location table.
///
/// The trait is synchronous. Writes take `&mut self`; callers that share a
/// store across tasks wrap it in a mutex.
pub trait InventoryStore {
    // -------------------------------------------------------------------
    // Part codes
    // -------------------------------------------------------------------

    /// Looks up a registered part code by exact, case-sensitive key.
    fn lookup_part(&self, code: &str) -> Result<Option<PartCode>, StorageError>;

    /// Returns up to `limit` registered codes starting with `prefix`, in
    /// ascending byte-wise order.
    fn scan_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StorageError>;

    /// Registers `code` unless it already exists.
    ///
    /// Returns `true` if a new row was inserted. An existing code keeps its
    /// original source and creation time.
    fn insert_part(&mut self, code: &str, source: CodeSource) -> Result<bool, StorageError>;

    /// Registers every code in `codes`, skipping those already present.
    ///
    /// Returns the number of newly inserted codes. Inputs are expected to be
    /// normalized already.
    fn insert_parts_ignoring_conflicts(
        &mut self,
        codes: &[String],
        source: CodeSource,
    ) -> Result<usize, StorageError>;

    /// Total number of registered part codes.
    fn count_parts(&self) -> Result<u64, StorageError>;

    /// Every registered code in ascending order.
    fn all_codes(&self) -> Result<Vec<String>, StorageError>;

    // -------------------------------------------------------------------
    // Locations
    // -------------------------------------------------------------------

    /// Looks up the location stored for a part code.
    fn lookup_location(&self, code: &str) -> Result<Option<LocationRecord>, StorageError>;

    /// Inserts or overwrites the single location for `code`.
    ///
    /// Fails with [`StorageError::UnknownPartCode`] if `code` is not
    /// registered. Sets `updated_at` from the store clock.
    fn upsert_location(
        &mut self,
        code: &str,
        fields: &LocationFields,
    ) -> Result<LocationRecord, StorageError>;

    /// Number of stored location records.
    fn count_locations(&self) -> Result<u64, StorageError>;

    /// Full outer join of part codes and locations.
    ///
    /// Located entries come first, newest `updated_at` first; entries with
    /// no location follow in registration order.
    fn export_all(&self) -> Result<Vec<InventoryEntry>, StorageError>;
}

impl<S: InventoryStore + ?Sized> InventoryStore for Box<S> {
    fn lookup_part(&self, code: &str) -> Result<Option<PartCode>, StorageError> {
        (**self).lookup_part(code)
    }

    fn scan_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StorageError> {
        (**self).scan_prefix(prefix, limit)
    }

    fn insert_part(&mut self, code: &str, source: CodeSource) -> Result<bool, StorageError> {
        (**self).insert_part(code, source)
    }

    fn insert_parts_ignoring_conflicts(
        &mut self,
        codes: &[String],
        source: CodeSource,
    ) -> Result<usize, StorageError> {
        (**self).insert_parts_ignoring_conflicts(codes, source)
    }

    fn count_parts(&self) -> Result<u64, StorageError> {
        (**self).count_parts()
    }

    fn all_codes(&self) -> Result<Vec<String>, StorageError> {
        (**self).all_codes()
    }

    fn lookup_location(&self, code: &str) -> Result<Option<LocationRecord>, StorageError> {
        (**self).lookup_location(code)
    }

    fn upsert_location(
        &mut self,
        code: &str,
        fields: &LocationFields,
    ) -> Result<LocationRecord, StorageError> {
        (**self).upsert_location(code, fields)
    }

    fn count_locations(&self) -> Result<u64, StorageError> {
        (**self).count_locations()
    }

    fn export_all(&self) -> Result<Vec<InventoryEntry>, StorageError> {
        (**self).export_all()
    }
}
