//! CSV import of part-code master lists and export of saved locations.
//!
//! Import reads the `part_code` column of any CSV with a header row; other
//! columns are ignored. Export writes one row per registered code with the
//! fixed column order in [`EXPORT_HEADER`].

use std::io::{Read, Write};

use binloc_core::{format_timestamp, normalize_codes, InventoryEntry};

use crate::error::StorageError;

/// Name of the required import column.
pub const PART_CODE_COLUMN: &str = "part_code";

/// Export column order.
pub const EXPORT_HEADER: [&str; 7] = [
    "part_code",
    "row",
    "rack",
    "shelf",
    "bin",
    "updated_at",
    "updated_by",
];

/// Reads the normalized, deduplicated part codes from CSV input.
pub fn read_part_codes<R: Read>(reader: R) -> Result<Vec<String>, StorageError> {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let column = csv
        .headers()?
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == PART_CODE_COLUMN)
        .ok_or_else(|| StorageError::MissingColumn {
            column: PART_CODE_COLUMN.to_string(),
        })?;

    let mut raw = Vec::new();
    for record in csv.records() {
        let record = record?;
        if let Some(value) = record.get(column) {
            raw.push(value.to_string());
        }
    }
    Ok(normalize_codes(raw))
}

/// Writes `entries` as UTF-8 CSV. Absent values become empty cells.
pub fn write_entries<W: Write>(writer: W, entries: &[InventoryEntry]) -> Result<(), StorageError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(EXPORT_HEADER)?;

    for entry in entries {
        let code = entry.part.code.as_str();
        match &entry.location {
            Some(loc) => {
                let updated_at = format_timestamp(&loc.updated_at);
                csv.write_record([
                    code,
                    loc.row.as_str(),
                    loc.rack.as_str(),
                    loc.shelf.as_str(),
                    loc.bin.as_deref().unwrap_or(""),
                    updated_at.as_str(),
                    loc.updated_by.as_deref().unwrap_or(""),
                ])?;
            }
            None => csv.write_record([code, "", "", "", "", "", ""])?,
        }
    }

    csv.flush()?;
    Ok(())
}

/// Renders `entries` as a CSV string.
pub fn entries_to_string(entries: &[InventoryEntry]) -> Result<String, StorageError> {
    let mut buf = Vec::new();
    write_entries(&mut buf, entries)?;
    String::from_utf8(buf).map_err(|e| StorageError::Corrupt {
        reason: format!("export was not valid UTF-8: {}", e),
    })
}
