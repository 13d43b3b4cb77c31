pub mod error;
pub mod location;
pub mod part;

// Re-export commonly used types
pub use error::{CoreError, RequiredField};
pub use location::{
    format_timestamp, next_write_time, now_micros, InventoryEntry, LocationDraft, LocationFields,
    LocationRecord,
};
pub use part::{normalize_code, normalize_codes, CodeSource, PartCode};
