//! SQLite implementation of [`InventoryStore`].
//!
//! [`SqliteStore`] persists part codes and locations in a SQLite database
//! with WAL mode, transactions around every multi-statement write, and
//! automatic schema migrations. Timestamps are stored as fixed-width
//! RFC 3339 TEXT so that ordering by the column is chronological.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use binloc_core::{
    format_timestamp, next_write_time, now_micros, CodeSource, InventoryEntry, LocationFields,
    LocationRecord, PartCode,
};

use crate::error::StorageError;
use crate::traits::InventoryStore;

/// SQLite-backed implementation of [`InventoryStore`].
pub struct SqliteStore {
    conn: Connection,
}

/// Raw location columns as read from a row, before decoding.
type LocationColumns = (
    String,
    String,
    String,
    Option<String>,
    String,
    Option<String>,
);

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| StorageError::Corrupt {
                reason: format!("bad timestamp '{}': {}", raw, e),
            })
    }

    fn parse_source(raw: &str) -> Result<CodeSource, StorageError> {
        raw.parse::<CodeSource>()
            .map_err(|reason| StorageError::Corrupt { reason })
    }

    fn decode_part(
        code: String,
        source: &str,
        created_at: &str,
    ) -> Result<PartCode, StorageError> {
        Ok(PartCode {
            code,
            source: Self::parse_source(source)?,
            created_at: Self::parse_timestamp(created_at)?,
        })
    }

    fn decode_location(
        part_code: String,
        columns: LocationColumns,
    ) -> Result<LocationRecord, StorageError> {
        let (row, rack, shelf, bin, updated_at, updated_by) = columns;
        Ok(LocationRecord {
            part_code,
            row,
            rack,
            shelf,
            bin,
            updated_at: Self::parse_timestamp(&updated_at)?,
            updated_by,
        })
    }
}

impl InventoryStore for SqliteStore {
    fn lookup_part(&self, code: &str) -> Result<Option<PartCode>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT code, source, created_at FROM part_codes WHERE code = ?1",
                params![code],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((code, source, created_at)) => {
                Ok(Some(Self::decode_part(code, &source, &created_at)?))
            }
            None => Ok(None),
        }
    }

    fn scan_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<String>, StorageError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        // BINARY collation orders like Rust's byte-wise `str` ordering, so all
        // codes sharing the prefix form one contiguous run starting at it.
        let mut stmt = self
            .conn
            .prepare_cached("SELECT code FROM part_codes WHERE code >= ?1 ORDER BY code ASC")?;
        let mut rows = stmt.query(params![prefix])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let code: String = row.get(0)?;
            if !code.starts_with(prefix) {
                break;
            }
            out.push(code);
            if out.len() == limit {
                break;
            }
        }
        Ok(out)
    }

    fn insert_part(&mut self, code: &str, source: CodeSource) -> Result<bool, StorageError> {
        let changed = self.conn.execute(
            "INSERT INTO part_codes (code, source, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(code) DO NOTHING",
            params![code, source.as_str(), format_timestamp(&now_micros())],
        )?;
        Ok(changed > 0)
    }

    fn insert_parts_ignoring_conflicts(
        &mut self,
        codes: &[String],
        source: CodeSource,
    ) -> Result<usize, StorageError> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let created_at = format_timestamp(&now_micros());
            let mut stmt = tx.prepare_cached(
                "INSERT INTO part_codes (code, source, created_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(code) DO NOTHING",
            )?;
            for code in codes {
                inserted += stmt.execute(params![code, source.as_str(), created_at])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn count_parts(&self) -> Result<u64, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM part_codes", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn all_codes(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT code FROM part_codes ORDER BY code ASC")?;
        let codes = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(codes)
    }

    fn lookup_location(&self, code: &str) -> Result<Option<LocationRecord>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT row_loc, rack, shelf, bin, updated_at, updated_by
                 FROM locations WHERE part_code = ?1",
                params![code],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, Option<String>>(5)?,
                    ))
                },
            )
            .optional()?;

        row.map(|columns| Self::decode_location(code.to_string(), columns))
            .transpose()
    }

    fn upsert_location(
        &mut self,
        code: &str,
        fields: &LocationFields,
    ) -> Result<LocationRecord, StorageError> {
        let tx = self.conn.transaction()?;

        let registered: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM part_codes WHERE code = ?1)",
            params![code],
            |row| row.get(0),
        )?;
        if !registered {
            return Err(StorageError::UnknownPartCode {
                code: code.to_string(),
            });
        }

        let previous: Option<String> = tx
            .query_row(
                "SELECT updated_at FROM locations WHERE part_code = ?1",
                params![code],
                |row| row.get(0),
            )
            .optional()?;
        let previous = previous
            .as_deref()
            .map(Self::parse_timestamp)
            .transpose()?;
        let updated_at = next_write_time(previous);

        tx.execute(
            "INSERT INTO locations (part_code, row_loc, rack, shelf, bin, updated_at, updated_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(part_code) DO UPDATE SET
                 row_loc = excluded.row_loc,
                 rack = excluded.rack,
                 shelf = excluded.shelf,
                 bin = excluded.bin,
                 updated_at = excluded.updated_at,
                 updated_by = excluded.updated_by",
            params![
                code,
                fields.row(),
                fields.rack(),
                fields.shelf(),
                fields.bin(),
                format_timestamp(&updated_at),
                fields.updated_by(),
            ],
        )?;
        tx.commit()?;

        Ok(fields.clone().into_record(code, updated_at))
    }

    fn count_locations(&self) -> Result<u64, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn export_all(&self) -> Result<Vec<InventoryEntry>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT p.code, p.source, p.created_at,
                    l.row_loc, l.rack, l.shelf, l.bin, l.updated_at, l.updated_by
             FROM part_codes p
             LEFT JOIN locations l ON l.part_code = p.code
             ORDER BY (l.updated_at IS NULL) ASC, l.updated_at DESC, p.seq ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let part = (
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            );
            let updated_at: Option<String> = row.get(7)?;
            let location = match updated_at {
                Some(updated_at) => Some((
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    updated_at,
                    row.get::<_, Option<String>>(8)?,
                )),
                None => None,
            };
            Ok((part, location))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let ((code, source, created_at), location) = row?;
            let location = location
                .map(|columns| Self::decode_location(code.clone(), columns))
                .transpose()?;
            out.push(InventoryEntry {
                part: Self::decode_part(code, &source, &created_at)?,
                location,
            });
        }
        Ok(out)
    }
}
