//! In-memory implementation of [`InventoryStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests, ephemeral sessions,
//! and anywhere persistence isn't needed. It keeps part codes in a BTreeMap
//! so prefix scans are ordered range reads, with the same semantics as the
//! SQLite backend.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use binloc_core::{
    next_write_time, now_micros, CodeSource, InventoryEntry, LocationFields, LocationRecord,
    PartCode,
};

use crate::error::StorageError;
use crate::traits::InventoryStore;

/// A registered part code plus its registration sequence number.
#[derive(Debug, Clone)]
struct StoredPart {
    part: PartCode,
    seq: u64,
}

/// In-memory backend. All data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// Part codes keyed by code, ordered byte-wise.
    parts: BTreeMap<String, StoredPart>,
    /// Locations keyed by part code.
    locations: HashMap<String, LocationRecord>,
    /// Next registration sequence number
    next_seq: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InventoryStore for InMemoryStore {
    fn lookup_part(&self, code: &str) -> Result<Option<PartCode>, StorageError> {
        Ok(self.parts.get(code).map(|stored| stored.part.clone()))
    }

    fn scan_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StorageError> {
        Ok(self
            .parts
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(code, _)| code)
            .take_while(|code| code.starts_with(prefix))
            .take(limit)
            .cloned()
            .collect())
    }

    fn insert_part(&mut self, code: &str, source: CodeSource) -> Result<bool, StorageError> {
        if self.parts.contains_key(code) {
            return Ok(false);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.parts.insert(
            code.to_string(),
            StoredPart {
                part: PartCode {
                    code: code.to_string(),
                    source,
                    created_at: now_micros(),
                },
                seq,
            },
        );
        Ok(true)
    }

    fn insert_parts_ignoring_conflicts(
        &mut self,
        codes: &[String],
        source: CodeSource,
    ) -> Result<usize, StorageError> {
        let mut inserted = 0;
        for code in codes {
            if self.insert_part(code, source)? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    fn count_parts(&self) -> Result<u64, StorageError> {
        Ok(self.parts.len() as u64)
    }

    fn all_codes(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.parts.keys().cloned().collect())
    }

    fn lookup_location(&self, code: &str) -> Result<Option<LocationRecord>, StorageError> {
        Ok(self.locations.get(code).cloned())
    }

    fn upsert_location(
        &mut self,
        code: &str,
        fields: &LocationFields,
    ) -> Result<LocationRecord, StorageError> {
        if !self.parts.contains_key(code) {
            return Err(StorageError::UnknownPartCode {
                code: code.to_string(),
            });
        }
        let previous = self.locations.get(code).map(|rec| rec.updated_at);
        let record = fields.clone().into_record(code, next_write_time(previous));
        self.locations.insert(code.to_string(), record.clone());
        Ok(record)
    }

    fn count_locations(&self) -> Result<u64, StorageError> {
        Ok(self.locations.len() as u64)
    }

    fn export_all(&self) -> Result<Vec<InventoryEntry>, StorageError> {
        let mut stored: Vec<&StoredPart> = self.parts.values().collect();
        stored.sort_by(|a, b| {
            let a_at = self.locations.get(&a.part.code).map(|rec| rec.updated_at);
            let b_at = self.locations.get(&b.part.code).map(|rec| rec.updated_at);
            // Some(_) before None, newest first, then registration order.
            b_at.is_some()
                .cmp(&a_at.is_some())
                .then_with(|| b_at.cmp(&a_at))
                .then_with(|| a.seq.cmp(&b.seq))
        });

        Ok(stored
            .into_iter()
            .map(|s| InventoryEntry {
                part: s.part.clone(),
                location: self.locations.get(&s.part.code).cloned(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binloc_core::LocationDraft;

    fn fields(row: &str, rack: &str, shelf: &str) -> LocationFields {
        LocationDraft::new(row, rack, shelf).validate().unwrap()
    }

    fn store_with(codes: &[&str]) -> InMemoryStore {
        let mut store = InMemoryStore::new();
        let codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        store
            .insert_parts_ignoring_conflicts(&codes, CodeSource::Imported)
            .unwrap();
        store
    }

    #[test]
    fn test_insert_part_is_idempotent() {
        let mut store = InMemoryStore::new();
        assert!(store.insert_part("A1", CodeSource::Imported).unwrap());
        let first = store.lookup_part("A1").unwrap().unwrap();

        assert!(!store.insert_part("A1", CodeSource::Manual).unwrap());
        let again = store.lookup_part("A1").unwrap().unwrap();
        assert_eq!(again, first);
        assert_eq!(again.source, CodeSource::Imported);
        assert_eq!(store.count_parts().unwrap(), 1);
    }

    #[test]
    fn test_created_at_matches_sqlite_precision() {
        use crate::sqlite::SqliteStore;

        let memory = store_with(&["P1"]);
        let mut sqlite = SqliteStore::in_memory().unwrap();
        sqlite.insert_part("P1", CodeSource::Imported).unwrap();

        for part in [
            memory.lookup_part("P1").unwrap().unwrap(),
            sqlite.lookup_part("P1").unwrap().unwrap(),
        ] {
            assert_eq!(part.created_at.timestamp_subsec_nanos() % 1_000, 0);
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let store = store_with(&["ab1"]);
        assert!(store.lookup_part("ab1").unwrap().is_some());
        assert!(store.lookup_part("AB1").unwrap().is_none());
    }

    #[test]
    fn test_scan_prefix_ordered_and_limited() {
        let store = store_with(&["M5", "A2", "Z9", "A1", "B1", "a1"]);
        assert_eq!(store.scan_prefix("A", 10).unwrap(), vec!["A1", "A2"]);
        assert_eq!(store.scan_prefix("A", 1).unwrap(), vec!["A1"]);
        assert!(store.scan_prefix("Q", 10).unwrap().is_empty());
    }

    #[test]
    fn test_upsert_requires_registered_code() {
        let mut store = InMemoryStore::new();
        let result = store.upsert_location("NOPE", &fields("R", "K", "S"));
        match result.unwrap_err() {
            StorageError::UnknownPartCode { code } => assert_eq!(code, "NOPE"),
            other => panic!("expected UnknownPartCode, got: {:?}", other),
        }
        assert_eq!(store.count_locations().unwrap(), 0);
    }

    #[test]
    fn test_upsert_overwrites_in_place() {
        let mut store = store_with(&["P1"]);
        let first = store.upsert_location("P1", &fields("R1", "K1", "S1")).unwrap();
        let second = store.upsert_location("P1", &fields("R2", "K2", "S2")).unwrap();

        assert_eq!(store.count_locations().unwrap(), 1);
        assert!(second.updated_at > first.updated_at);
        let loaded = store.lookup_location("P1").unwrap().unwrap();
        assert_eq!(loaded, second);
        assert_eq!(loaded.row, "R2");
    }

    #[test]
    fn test_export_orders_located_first() {
        let mut store = store_with(&["C", "A", "B", "D"]);
        store.upsert_location("B", &fields("R", "K", "S")).unwrap();
        store.upsert_location("D", &fields("R", "K", "S")).unwrap();

        let codes: Vec<String> = store
            .export_all()
            .unwrap()
            .into_iter()
            .map(|e| e.part.code)
            .collect();
        // D written last, then B; unlocated C and A keep registration order.
        assert_eq!(codes, vec!["D", "B", "C", "A"]);
    }
}
