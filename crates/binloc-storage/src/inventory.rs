//! [`Inventory`]: a store plus its code index, and the resolution procedure
//! that turns a scanned or typed string into a part code.
//!
//! # Resolution
//!
//! 1. The query is trimmed; an empty query resolves to [`Resolution::Idle`].
//! 2. An exact registry match wins outright ([`Resolution::Exact`]), even if
//!    the same string is also a prefix of other codes.
//! 3. Otherwise up to [`SUGGESTION_LIMIT`] prefix matches are offered
//!    ([`Resolution::Suggestions`]). The caller must let the user pick one;
//!    the first candidate is never chosen automatically.
//! 4. With no match at all the query is [`Resolution::Unregistered`] and can
//!    only become a part code through [`Inventory::register_manual`].

use std::time::Duration;

use binloc_core::{normalize_code, CodeSource, CoreError};

use crate::error::{InventoryError, StorageError};
use crate::locations::LocationStore;
use crate::registry::{CodeIndex, PartCodeRegistry};
use crate::traits::InventoryStore;

/// Maximum number of prefix suggestions offered for one query.
pub const SUGGESTION_LIMIT: usize = 50;

/// Outcome of resolving a raw query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing to resolve: the query was blank.
    Idle,
    /// The query is a registered part code.
    Exact(String),
    /// Registered codes starting with the query, ascending.
    Suggestions { query: String, candidates: Vec<String> },
    /// No registered code equals or starts with the query.
    Unregistered(String),
}

impl Resolution {
    /// The resolved part code, only for an exact match.
    pub fn part_code(&self) -> Option<&str> {
        match self {
            Resolution::Exact(code) => Some(code),
            _ => None,
        }
    }
}

/// Result of [`Inventory::register_manual`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// The trimmed code as stored.
    pub part_code: String,
    /// `false` when the code was already registered.
    pub created: bool,
}

/// A backing store together with the registry's cached code index.
pub struct Inventory<S: InventoryStore> {
    store: S,
    index: CodeIndex,
}

impl<S: InventoryStore> Inventory<S> {
    /// Wraps `store` with caching disabled.
    pub fn new(store: S) -> Self {
        Inventory {
            store,
            index: CodeIndex::disabled(),
        }
    }

    /// Wraps `store` with a code index kept for `ttl`.
    pub fn with_index_ttl(store: S, ttl: Option<Duration>) -> Self {
        Inventory {
            store,
            index: CodeIndex::new(ttl),
        }
    }

    pub fn registry(&mut self) -> PartCodeRegistry<'_, S> {
        PartCodeRegistry::new(&mut self.store, &mut self.index)
    }

    pub fn locations(&mut self) -> LocationStore<'_, S> {
        LocationStore::new(&mut self.store, &mut self.index)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lifetime of cached code snapshots; `None` when caching is off.
    pub fn index_ttl(&self) -> Option<Duration> {
        self.index.ttl()
    }

    /// Drops the cached code index.
    pub fn invalidate(&mut self) {
        self.index.invalidate();
    }

    /// Resolves a raw query against the registry.
    pub fn resolve(&mut self, raw: &str) -> Result<Resolution, StorageError> {
        let Some(query) = normalize_code(raw) else {
            return Ok(Resolution::Idle);
        };

        let mut registry = self.registry();
        if registry.exists(query)? {
            return Ok(Resolution::Exact(query.to_string()));
        }

        let candidates = registry.suggest_by_prefix(query, SUGGESTION_LIMIT)?;
        if candidates.is_empty() {
            tracing::debug!(query, "query matched no part code");
            Ok(Resolution::Unregistered(query.to_string()))
        } else {
            Ok(Resolution::Suggestions {
                query: query.to_string(),
                candidates,
            })
        }
    }

    /// Confirms a candidate the user picked, returning it if registered.
    pub fn select(&mut self, raw: &str) -> Result<Option<String>, StorageError> {
        let Some(code) = normalize_code(raw) else {
            return Ok(None);
        };
        if self.registry().exists(code)? {
            Ok(Some(code.to_string()))
        } else {
            Ok(None)
        }
    }

    /// Registers an unmatched query as a manual part code.
    ///
    /// Called only after the user explicitly confirms. Safe to retry.
    pub fn register_manual(&mut self, raw: &str) -> Result<Registration, InventoryError> {
        let code = normalize_code(raw).ok_or(CoreError::EmptyPartCode)?;
        let created = self.registry().add(code, CodeSource::Manual)?;
        Ok(Registration {
            part_code: code.to_string(),
            created,
        })
    }
}
