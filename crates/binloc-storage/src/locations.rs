//! Location store: one location record per part code.

use binloc_core::{InventoryEntry, LocationDraft, LocationRecord};

use crate::error::{InventoryError, StorageError};
use crate::registry::CodeIndex;
use crate::traits::InventoryStore;

/// Point lookup, validated upsert and export over an [`InventoryStore`].
///
/// Holds the inventory's [`CodeIndex`] only to invalidate it after writes.
pub struct LocationStore<'a, S: InventoryStore + ?Sized> {
    store: &'a mut S,
    index: &'a mut CodeIndex,
}

impl<'a, S: InventoryStore + ?Sized> LocationStore<'a, S> {
    pub fn new(store: &'a mut S, index: &'a mut CodeIndex) -> Self {
        LocationStore { store, index }
    }

    /// The stored location for `part_code`, if one has been saved.
    pub fn get(&self, part_code: &str) -> Result<Option<LocationRecord>, StorageError> {
        self.store.lookup_location(part_code)
    }

    /// Validates `draft` and writes it as the location of `part_code`.
    ///
    /// Validation runs to completion before the store is called, so a
    /// rejected draft never writes anything. Concurrent writers are
    /// last-write-wins.
    pub fn upsert(
        &mut self,
        part_code: &str,
        draft: &LocationDraft,
    ) -> Result<LocationRecord, InventoryError> {
        let fields = draft.validate()?;
        let record = self.store.upsert_location(part_code, &fields)?;
        self.index.invalidate();
        tracing::info!(
            part_code,
            row = %record.row,
            rack = %record.rack,
            shelf = %record.shelf,
            bin = record.bin.as_deref().unwrap_or(""),
            "saved location"
        );
        Ok(record)
    }

    /// Every registered code with its location, newest writes first.
    pub fn list_all(&self) -> Result<Vec<InventoryEntry>, StorageError> {
        self.store.export_all()
    }

    pub fn count(&self) -> Result<u64, StorageError> {
        self.store.count_locations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binloc_core::{CodeSource, CoreError, RequiredField};

    use crate::memory::InMemoryStore;

    fn seeded(codes: &[&str]) -> InMemoryStore {
        let mut store = InMemoryStore::new();
        for code in codes {
            store.insert_part(code, CodeSource::Imported).unwrap();
        }
        store
    }

    #[test]
    fn get_absent_is_not_an_error() {
        let mut store = seeded(&["P1"]);
        let mut index = CodeIndex::disabled();
        let locations = LocationStore::new(&mut store, &mut index);
        assert!(locations.get("P1").unwrap().is_none());
    }

    #[test]
    fn upsert_twice_keeps_latest_values() {
        let mut store = seeded(&["P1"]);
        let mut index = CodeIndex::disabled();
        let mut locations = LocationStore::new(&mut store, &mut index);

        locations
            .upsert("P1", &LocationDraft::new("R1", "K1", "S1").with_bin("B1"))
            .unwrap();
        locations
            .upsert("P1", &LocationDraft::new("R2", "K2", "S2"))
            .unwrap();

        assert_eq!(locations.count().unwrap(), 1);
        let rec = locations.get("P1").unwrap().unwrap();
        assert_eq!((rec.row.as_str(), rec.rack.as_str(), rec.shelf.as_str()), ("R2", "K2", "S2"));
        assert_eq!(rec.bin, None);
    }

    #[test]
    fn invalid_draft_writes_nothing() {
        let mut store = seeded(&["P1"]);
        let mut index = CodeIndex::disabled();
        let mut locations = LocationStore::new(&mut store, &mut index);

        let err = locations
            .upsert("P1", &LocationDraft::new("", "", "X"))
            .unwrap_err();
        match err {
            InventoryError::Validation(CoreError::MissingFields { fields }) => {
                assert_eq!(fields, vec![RequiredField::Row, RequiredField::Rack]);
            }
            other => panic!("expected MissingFields, got: {:?}", other),
        }
        assert!(locations.get("P1").unwrap().is_none());
    }

    #[test]
    fn invalid_draft_leaves_existing_record_untouched() {
        let mut store = seeded(&["P1"]);
        let mut index = CodeIndex::disabled();
        let mut locations = LocationStore::new(&mut store, &mut index);

        let saved = locations
            .upsert("P1", &LocationDraft::new("R1", "K1", "S1"))
            .unwrap();
        assert!(locations
            .upsert("P1", &LocationDraft::new("R2", " ", "S2"))
            .is_err());
        assert_eq!(locations.get("P1").unwrap().unwrap(), saved);
    }

    #[test]
    fn round_trip_preserves_fields() {
        let mut store = seeded(&["P1"]);
        let mut index = CodeIndex::disabled();
        let mut locations = LocationStore::new(&mut store, &mut index);

        let first = locations
            .upsert("P1", &LocationDraft::new("R0", "K0", "S0"))
            .unwrap();
        let draft = LocationDraft::new("R1", "K2", "S3")
            .with_bin("B4")
            .with_updated_by("alice");
        locations.upsert("P1", &draft).unwrap();

        let rec = locations.get("P1").unwrap().unwrap();
        assert_eq!(rec.row, "R1");
        assert_eq!(rec.rack, "K2");
        assert_eq!(rec.shelf, "S3");
        assert_eq!(rec.bin.as_deref(), Some("B4"));
        assert_eq!(rec.updated_by.as_deref(), Some("alice"));
        assert!(rec.updated_at > first.updated_at);
    }

    #[test]
    fn list_all_includes_unlocated_codes() {
        let mut store = seeded(&["A", "B", "C"]);
        let mut index = CodeIndex::disabled();
        let mut locations = LocationStore::new(&mut store, &mut index);
        locations
            .upsert("B", &LocationDraft::new("R", "K", "S"))
            .unwrap();

        let entries = locations.list_all().unwrap();
        assert_eq!(entries.len(), 3);
        let unlocated: Vec<&str> = entries
            .iter()
            .filter(|e| e.location.is_none())
            .map(|e| e.part.code.as_str())
            .collect();
        assert_eq!(unlocated, vec!["A", "C"]);
        assert_eq!(entries[0].part.code, "B");
    }
}
