//! Part-code registry: the master list of valid codes.
//!
//! [`PartCodeRegistry`] is a borrowed view over an [`InventoryStore`] and the
//! [`CodeIndex`] owned by the surrounding inventory. The index is an optional
//! time-bounded snapshot of every code; while it is fresh, exact and prefix
//! queries are answered without touching the store. Every mutation drops it.

use std::collections::BTreeSet;
use std::ops::Bound;
use std::time::{Duration, Instant};

use binloc_core::{normalize_code, normalize_codes, CodeSource, CoreError};

use crate::error::{InventoryError, StorageError};
use crate::traits::InventoryStore;

/// Cached snapshot of all registered codes.
#[derive(Debug)]
pub struct CodeIndex {
    ttl: Option<Duration>,
    snapshot: Option<Snapshot>,
}

#[derive(Debug)]
struct Snapshot {
    built_at: Instant,
    codes: BTreeSet<String>,
}

impl CodeIndex {
    /// An index that keeps snapshots for `ttl`. `None` disables caching.
    pub fn new(ttl: Option<Duration>) -> Self {
        CodeIndex {
            ttl: ttl.filter(|ttl| !ttl.is_zero()),
            snapshot: None,
        }
    }

    /// An index that never caches; every query goes to the store.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Drops the snapshot so the next query reads the store.
    pub fn invalidate(&mut self) {
        if self.snapshot.take().is_some() {
            tracing::debug!("part code index invalidated");
        }
    }

    /// Whether a snapshot is present and younger than the TTL.
    pub fn is_fresh(&self) -> bool {
        match (&self.snapshot, self.ttl) {
            (Some(snapshot), Some(ttl)) => snapshot.built_at.elapsed() < ttl,
            _ => false,
        }
    }

    /// Returns the fresh snapshot, rebuilding it from `store` if stale.
    ///
    /// Returns `None` when caching is disabled.
    fn codes<S: InventoryStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Result<Option<&BTreeSet<String>>, StorageError> {
        if self.ttl.is_none() {
            return Ok(None);
        }
        if !self.is_fresh() {
            let codes: BTreeSet<String> = store.all_codes()?.into_iter().collect();
            tracing::debug!(codes = codes.len(), "part code index rebuilt");
            self.snapshot = Some(Snapshot {
                built_at: Instant::now(),
                codes,
            });
        }
        Ok(self.snapshot.as_ref().map(|snapshot| &snapshot.codes))
    }
}

impl Default for CodeIndex {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Exact and prefix queries plus registration, over a store and its index.
pub struct PartCodeRegistry<'a, S: InventoryStore + ?Sized> {
    store: &'a mut S,
    index: &'a mut CodeIndex,
}

impl<'a, S: InventoryStore + ?Sized> PartCodeRegistry<'a, S> {
    pub fn new(store: &'a mut S, index: &'a mut CodeIndex) -> Self {
        PartCodeRegistry { store, index }
    }

    /// Normalizes `codes` and registers each as imported.
    ///
    /// Blank and repeated values are dropped, first occurrence kept. Codes
    /// already registered are left untouched. Returns the number of newly
    /// registered codes.
    pub fn bulk_import<I, T>(&mut self, codes: I) -> Result<usize, StorageError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let codes = normalize_codes(codes);
        if codes.is_empty() {
            return Ok(0);
        }
        let inserted = self
            .store
            .insert_parts_ignoring_conflicts(&codes, CodeSource::Imported)?;
        self.index.invalidate();
        tracing::info!(
            offered = codes.len(),
            inserted,
            "bulk imported part codes"
        );
        Ok(inserted)
    }

    /// Exact, case-sensitive membership test. `code` is not re-trimmed.
    pub fn exists(&mut self, code: &str) -> Result<bool, StorageError> {
        if code.is_empty() {
            return Ok(false);
        }
        if let Some(codes) = self.index.codes(&*self.store)? {
            return Ok(codes.contains(code));
        }
        Ok(self.store.lookup_part(code)?.is_some())
    }

    /// Registers `code` if absent. Retrying with the same code is a no-op.
    ///
    /// Returns `true` if the code was newly registered.
    pub fn add(&mut self, code: &str, source: CodeSource) -> Result<bool, InventoryError> {
        let code = normalize_code(code).ok_or(CoreError::EmptyPartCode)?;
        let inserted = self.store.insert_part(code, source)?;
        self.index.invalidate();
        if inserted {
            tracing::info!(code, %source, "registered part code");
        }
        Ok(inserted)
    }

    /// Up to `limit` codes starting with `prefix`, ascending, case-sensitive.
    ///
    /// An empty prefix yields no suggestions rather than the whole registry.
    pub fn suggest_by_prefix(
        &mut self,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<String>, StorageError> {
        if prefix.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        if let Some(codes) = self.index.codes(&*self.store)? {
            return Ok(codes
                .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
                .take_while(|code| code.starts_with(prefix))
                .take(limit)
                .cloned()
                .collect());
        }
        self.store.scan_prefix(prefix, limit)
    }

    pub fn count(&self) -> Result<u64, StorageError> {
        self.store.count_parts()
    }

    pub fn invalidate(&mut self) {
        self.index.invalidate();
    }
}
