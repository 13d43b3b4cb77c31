//! LocationService: the single coordinator between HTTP handlers and the
//! inventory storage crate.
//!
//! All business logic flows through [`LocationService`]. Handlers are thin
//! wrappers that delegate to these methods. Errors from every layer are
//! converted to [`ApiError`] here, so nothing below the handlers can crash
//! the process.

use std::fs::File;
use std::path::Path;

use binloc_core::{normalize_code, CoreError};
use binloc_storage::csv_io;
use binloc_storage::{InMemoryStore, Inventory, InventoryStore, SqliteStore};

use crate::config::{Backend, ServerConfig};
use crate::error::ApiError;
use crate::schema::locations::{
    EntriesResponse, LocationResponse, SaveLocationRequest, SaveLocationResponse,
};
use crate::schema::parts::{ImportResponse, RegisterPartResponse, ResolveResponse};
use crate::schema::status::HealthResponse;

/// Any backend, chosen at startup.
pub type DynStore = Box<dyn InventoryStore + Send>;

/// Resolution, registration and location writes over one inventory.
pub struct LocationService {
    inventory: Inventory<DynStore>,
    backend: Backend,
}

impl LocationService {
    /// Builds the service described by `config`, including the startup import.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let store: DynStore = match config.backend {
            Backend::Sqlite => Box::new(SqliteStore::new(&config.db_path).map_err(|e| {
                ApiError::StorageUnavailable(format!(
                    "failed to open database '{}': {}",
                    config.db_path, e
                ))
            })?),
            Backend::Memory => Box::new(InMemoryStore::new()),
        };

        let mut service = LocationService {
            inventory: Inventory::with_index_ttl(store, config.index_ttl),
            backend: config.backend,
        };

        if let Some(path) = &config.part_codes_csv {
            let imported = service.import_file(path)?;
            tracing::info!(
                path = %path.display(),
                inserted = imported.inserted,
                total = imported.total,
                "loaded part codes"
            );
        }

        Ok(service)
    }

    /// Creates a service over a fresh in-memory store with no index cache
    /// (for testing).
    pub fn in_memory() -> Self {
        LocationService {
            inventory: Inventory::new(Box::new(InMemoryStore::new())),
            backend: Backend::Memory,
        }
    }

    // -----------------------------------------------------------------------
    // Part codes
    // -----------------------------------------------------------------------

    pub fn resolve(&mut self, query: &str) -> Result<ResolveResponse, ApiError> {
        Ok(self.inventory.resolve(query)?.into())
    }

    /// Registers a code the user confirmed as new. Safe to retry.
    pub fn register_part(&mut self, raw: &str) -> Result<RegisterPartResponse, ApiError> {
        let registration = self.inventory.register_manual(raw)?;
        Ok(RegisterPartResponse {
            part_code: registration.part_code,
            created: registration.created,
        })
    }

    /// Bulk-imports the `part_code` column of CSV text.
    pub fn import_csv(&mut self, body: &str) -> Result<ImportResponse, ApiError> {
        let codes = csv_io::read_part_codes(body.as_bytes())?;
        self.import_codes(codes)
    }

    fn import_file(&mut self, path: &Path) -> Result<ImportResponse, ApiError> {
        let file = File::open(path).map_err(|e| {
            ApiError::BadRequest(format!(
                "part code list '{}' could not be opened: {}",
                path.display(),
                e
            ))
        })?;
        let codes = csv_io::read_part_codes(file)?;
        self.import_codes(codes)
    }

    fn import_codes(&mut self, codes: Vec<String>) -> Result<ImportResponse, ApiError> {
        let received = codes.len();
        let mut registry = self.inventory.registry();
        let inserted = registry.bulk_import(codes)?;
        let total = registry.count()?;
        Ok(ImportResponse {
            received,
            inserted,
            total,
        })
    }

    // -----------------------------------------------------------------------
    // Locations
    // -----------------------------------------------------------------------

    /// Current location of a code. A miss is a normal answer, not an error.
    pub fn get_location(&mut self, raw: &str) -> Result<LocationResponse, ApiError> {
        let part_code = normalize_code(raw).ok_or(CoreError::EmptyPartCode)?;
        let registered = self.inventory.registry().exists(part_code)?;
        let location = self.inventory.locations().get(part_code)?;
        Ok(LocationResponse {
            part_code: part_code.to_string(),
            registered,
            location,
        })
    }

    /// Validates and saves a location. Last write wins.
    pub fn save_location(
        &mut self,
        req: &SaveLocationRequest,
    ) -> Result<SaveLocationResponse, ApiError> {
        let part_code = normalize_code(&req.part_code).ok_or(CoreError::EmptyPartCode)?;
        let location = self.inventory.locations().upsert(part_code, &req.draft)?;
        Ok(SaveLocationResponse { location })
    }

    pub fn entries(&mut self) -> Result<EntriesResponse, ApiError> {
        let entries = self.inventory.locations().list_all()?;
        Ok(EntriesResponse { entries })
    }

    /// All entries as CSV text.
    pub fn export_csv(&mut self) -> Result<String, ApiError> {
        let entries = self.inventory.locations().list_all()?;
        Ok(csv_io::entries_to_string(&entries)?)
    }

    pub fn health(&mut self) -> Result<HealthResponse, ApiError> {
        let part_codes = self.inventory.registry().count()?;
        let locations = self.inventory.locations().count()?;
        Ok(HealthResponse {
            backend: self.backend.to_string(),
            part_codes,
            locations,
            index_ttl_secs: self.index_ttl_secs(),
        })
    }

    fn index_ttl_secs(&self) -> Option<u64> {
        self.inventory.index_ttl().map(|ttl| ttl.as_secs())
    }
}
