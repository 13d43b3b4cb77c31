//! Bin location command-line tool.
//!
//! Provides the `binloc` binary for working with a part-code inventory stored
//! in a SQLite database. Every subcommand goes through the same
//! `binloc_storage::Inventory` operations as the HTTP server, so a code
//! resolved or a location saved here behaves identically there.
//!
//! Output is JSON on stdout (CSV for `export`); diagnostics go to stderr.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde_json::json;

use binloc_core::{normalize_code, CoreError, LocationDraft};
use binloc_storage::csv_io;
use binloc_storage::{Inventory, InventoryError, Resolution, SqliteStore, StorageError};

/// Exit codes shared by every subcommand.
const EXIT_OK: i32 = 0;
const EXIT_INVALID: i32 = 1;
const EXIT_UNREGISTERED: i32 = 2;
const EXIT_STORAGE: i32 = 3;

/// Part-code lookup and bin location tracking.
#[derive(Parser)]
#[command(name = "binloc", about = "Part-code lookup and bin location tracking")]
struct Cli {
    /// Path to the inventory database file.
    #[arg(short, long, global = true, default_value = "binloc.db")]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Bulk-import part codes from the `part_code` column of a CSV file.
    Import {
        /// CSV file with a `part_code` header.
        file: PathBuf,
    },

    /// Resolve a scanned or typed string to a part code.
    Resolve {
        /// Raw query; surrounding whitespace is ignored.
        query: String,
    },

    /// Register a part code that is not in the imported list.
    Register {
        part_code: String,
    },

    /// Show the saved location of a part code.
    Show {
        part_code: String,
    },

    /// Save the location of a part code, replacing any previous one.
    Set {
        part_code: String,

        #[arg(long)]
        row: String,

        #[arg(long)]
        rack: String,

        #[arg(long)]
        shelf: String,

        #[arg(long)]
        bin: Option<String>,

        /// Free-text label of whoever made the change.
        #[arg(long)]
        updated_by: Option<String>,

        /// Register the part code first if it is unknown.
        #[arg(long)]
        register: bool,
    },

    /// Export every part code with its location as CSV.
    Export {
        /// Output file (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the number of part codes and saved locations.
    Count,
}

fn main() {
    let cli = Cli::parse();

    let mut inventory = match open_inventory(&cli.db) {
        Ok(inventory) => inventory,
        Err(code) => process::exit(code),
    };

    let exit_code = match cli.command {
        Commands::Import { file } => run_import(&mut inventory, &file),
        Commands::Resolve { query } => run_resolve(&mut inventory, &query),
        Commands::Register { part_code } => run_register(&mut inventory, &part_code),
        Commands::Show { part_code } => run_show(&mut inventory, &part_code),
        Commands::Set {
            part_code,
            row,
            rack,
            shelf,
            bin,
            updated_by,
            register,
        } => {
            let draft = LocationDraft {
                row,
                rack,
                shelf,
                bin,
                updated_by,
            };
            run_set(&mut inventory, &part_code, &draft, register)
        }
        Commands::Export { output } => run_export(&mut inventory, output.as_deref()),
        Commands::Count => run_count(&mut inventory),
    };
    process::exit(exit_code);
}

fn open_inventory(db_path: &str) -> Result<Inventory<SqliteStore>, i32> {
    match SqliteStore::new(db_path) {
        Ok(store) => Ok(Inventory::new(store)),
        Err(e) => {
            eprintln!("Error: failed to open database '{}': {}", db_path, e);
            Err(EXIT_STORAGE)
        }
    }
}

fn print_json(value: &serde_json::Value) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {}\"}}", e));
    println!("{}", json);
}

/// Reports `err` on stderr and returns its exit code.
fn report_storage(err: &StorageError) -> i32 {
    match err {
        StorageError::UnknownPartCode { .. } => {
            eprintln!("Error: {} (use `binloc register` or `set --register`)", err);
            EXIT_UNREGISTERED
        }
        StorageError::MissingColumn { .. } | StorageError::Csv(_) => {
            eprintln!("Error: {}", err);
            EXIT_INVALID
        }
        _ => {
            eprintln!("Storage error: {}", err);
            EXIT_STORAGE
        }
    }
}

fn report(err: &InventoryError) -> i32 {
    match err {
        InventoryError::Validation(e) => {
            eprintln!("Error: {}", e);
            EXIT_INVALID
        }
        InventoryError::Storage(e) => report_storage(e),
    }
}

/// Execute the import subcommand.
fn run_import(inventory: &mut Inventory<SqliteStore>, path: &Path) -> i32 {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: cannot open '{}': {}", path.display(), e);
            return EXIT_INVALID;
        }
    };
    let codes = match csv_io::read_part_codes(file) {
        Ok(codes) => codes,
        Err(e) => return report_storage(&e),
    };

    let received = codes.len();
    let mut registry = inventory.registry();
    let result = match registry.bulk_import(codes) {
        Ok(inserted) => registry.count().map(|total| (inserted, total)),
        Err(e) => Err(e),
    };
    match result {
        Ok((inserted, total)) => {
            print_json(&json!({
                "received": received,
                "inserted": inserted,
                "total": total,
            }));
            EXIT_OK
        }
        Err(e) => report_storage(&e),
    }
}

/// Execute the resolve subcommand.
///
/// Exits with 2 when nothing matches, so scripts can offer registration.
fn run_resolve(inventory: &mut Inventory<SqliteStore>, query: &str) -> i32 {
    let resolution = match inventory.resolve(query) {
        Ok(r) => r,
        Err(e) => return report_storage(&e),
    };
    match resolution {
        Resolution::Idle => {
            eprintln!("Error: empty query");
            EXIT_INVALID
        }
        Resolution::Exact(part_code) => {
            print_json(&json!({ "status": "exact", "part_code": part_code }));
            EXIT_OK
        }
        Resolution::Suggestions { query, candidates } => {
            print_json(&json!({
                "status": "suggestions",
                "query": query,
                "candidates": candidates,
            }));
            EXIT_OK
        }
        Resolution::Unregistered(query) => {
            print_json(&json!({ "status": "unregistered", "query": query }));
            EXIT_UNREGISTERED
        }
    }
}

/// Execute the register subcommand.
fn run_register(inventory: &mut Inventory<SqliteStore>, raw: &str) -> i32 {
    match inventory.register_manual(raw) {
        Ok(registration) => {
            print_json(&json!({
                "part_code": registration.part_code,
                "created": registration.created,
            }));
            EXIT_OK
        }
        Err(e) => report(&e),
    }
}

/// Execute the show subcommand.
fn run_show(inventory: &mut Inventory<SqliteStore>, raw: &str) -> i32 {
    let part_code = match inventory.select(raw) {
        Ok(Some(code)) => code,
        Ok(None) => {
            eprintln!("Error: part code '{}' is not registered", raw.trim());
            return EXIT_UNREGISTERED;
        }
        Err(e) => return report_storage(&e),
    };
    match inventory.locations().get(&part_code) {
        Ok(location) => {
            print_json(&json!({ "part_code": part_code, "location": location }));
            EXIT_OK
        }
        Err(e) => report_storage(&e),
    }
}

/// Execute the set subcommand.
fn run_set(
    inventory: &mut Inventory<SqliteStore>,
    raw: &str,
    draft: &LocationDraft,
    register: bool,
) -> i32 {
    // Validate before registering so a bad draft leaves no trace.
    if let Err(e) = draft.validate() {
        eprintln!("Error: {}", e);
        return EXIT_INVALID;
    }

    let part_code = if register {
        match inventory.register_manual(raw) {
            Ok(registration) => registration.part_code,
            Err(e) => return report(&e),
        }
    } else {
        match normalize_code(raw) {
            Some(code) => code.to_string(),
            None => {
                eprintln!("Error: {}", CoreError::EmptyPartCode);
                return EXIT_INVALID;
            }
        }
    };

    match inventory.locations().upsert(&part_code, draft) {
        Ok(record) => {
            print_json(&json!({ "location": record }));
            EXIT_OK
        }
        Err(e) => report(&e),
    }
}

/// Execute the export subcommand.
fn run_export(inventory: &mut Inventory<SqliteStore>, output: Option<&Path>) -> i32 {
    let entries = match inventory.locations().list_all() {
        Ok(entries) => entries,
        Err(e) => return report_storage(&e),
    };

    let written = match output {
        Some(path) => match File::create(path) {
            Ok(file) => csv_io::write_entries(file, &entries),
            Err(e) => {
                eprintln!("Error: cannot create '{}': {}", path.display(), e);
                return EXIT_STORAGE;
            }
        },
        None => csv_io::write_entries(io::stdout().lock(), &entries),
    };
    match written {
        Ok(()) => EXIT_OK,
        Err(e) => report_storage(&e),
    }
}

/// Execute the count subcommand.
fn run_count(inventory: &mut Inventory<SqliteStore>) -> i32 {
    let part_codes = match inventory.registry().count() {
        Ok(n) => n,
        Err(e) => return report_storage(&e),
    };
    match inventory.locations().count() {
        Ok(locations) => {
            print_json(&json!({ "part_codes": part_codes, "locations": locations }));
            EXIT_OK
        }
        Err(e) => report_storage(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory() -> Inventory<SqliteStore> {
        Inventory::new(SqliteStore::in_memory().unwrap())
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn set_parses_location_flags() {
        let cli = Cli::try_parse_from([
            "binloc", "--db", "x.db", "set", "P-1", "--row", "R1", "--rack", "K2", "--shelf",
            "S3", "--register",
        ])
        .unwrap();
        assert_eq!(cli.db, "x.db");
        match cli.command {
            Commands::Set {
                part_code,
                bin,
                register,
                ..
            } => {
                assert_eq!(part_code, "P-1");
                assert_eq!(bin, None);
                assert!(register);
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn set_exit_codes() {
        let mut inventory = inventory();
        let draft = LocationDraft::new("R1", "K2", "S3");

        assert_eq!(run_set(&mut inventory, "NEW", &draft, false), EXIT_UNREGISTERED);
        assert_eq!(
            run_set(&mut inventory, "NEW", &LocationDraft::new("", "K", "S"), true),
            EXIT_INVALID
        );
        // The invalid draft registered nothing.
        assert_eq!(inventory.registry().count().unwrap(), 0);

        assert_eq!(run_set(&mut inventory, " NEW ", &draft, true), EXIT_OK);
        assert_eq!(run_set(&mut inventory, "NEW", &draft, false), EXIT_OK);
        assert!(inventory.locations().get("NEW").unwrap().is_some());
    }

    #[test]
    fn resolve_exit_codes() {
        let mut inventory = inventory();
        inventory.registry().bulk_import(["AB1", "AB2"]).unwrap();

        assert_eq!(run_resolve(&mut inventory, "AB1"), EXIT_OK);
        assert_eq!(run_resolve(&mut inventory, "AB"), EXIT_OK);
        assert_eq!(run_resolve(&mut inventory, "ZZ"), EXIT_UNREGISTERED);
        assert_eq!(run_resolve(&mut inventory, "  "), EXIT_INVALID);
    }

    #[test]
    fn show_requires_registered_code() {
        let mut inventory = inventory();
        assert_eq!(run_show(&mut inventory, "P1"), EXIT_UNREGISTERED);
        assert_eq!(run_register(&mut inventory, "P1"), EXIT_OK);
        assert_eq!(run_show(&mut inventory, "P1"), EXIT_OK);
        assert_eq!(run_register(&mut inventory, " "), EXIT_INVALID);
    }

    #[test]
    fn import_missing_file_is_invalid() {
        let mut inventory = inventory();
        let code = run_import(&mut inventory, Path::new("/nonexistent/codes.csv"));
        assert_eq!(code, EXIT_INVALID);
    }
}
