//! Part codes: the master identifiers every location hangs off.
//!
//! A part code is a non-empty, trimmed, case-preserving string. Codes are
//! unique under exact string equality; no case folding happens anywhere.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// How a part code entered the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeSource {
    /// Loaded from the master list by a bulk import.
    Imported,
    /// Registered by hand after a scan found no match.
    Manual,
}

impl CodeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeSource::Imported => "imported",
            CodeSource::Manual => "manual",
        }
    }
}

impl fmt::Display for CodeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "imported" => Ok(CodeSource::Imported),
            "manual" => Ok(CodeSource::Manual),
            other => Err(format!("unknown part code source '{}'", other)),
        }
    }
}

/// A registered part code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartCode {
    pub code: String,
    pub source: CodeSource,
    /// Set once on registration, never updated.
    pub created_at: DateTime<Utc>,
}

/// Trims `raw` and returns it, or `None` when nothing is left.
pub fn normalize_code(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Normalizes a batch of raw codes for import.
///
/// Each value is trimmed, blanks are dropped, and duplicates are removed
/// keeping the first occurrence.
pub fn normalize_codes<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: IndexSet<String> = IndexSet::new();
    for value in raw {
        if let Some(code) = normalize_code(value.as_ref()) {
            if !seen.contains(code) {
                seen.insert(code.to_string());
            }
        }
    }
    seen.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_code_trims() {
        assert_eq!(normalize_code("  AB-12 \t"), Some("AB-12"));
        assert_eq!(normalize_code("   "), None);
        assert_eq!(normalize_code(""), None);
    }

    #[test]
    fn normalize_code_preserves_case() {
        assert_eq!(normalize_code("abC"), Some("abC"));
    }

    #[test]
    fn normalize_codes_dedupes_keeping_first() {
        let codes = normalize_codes(["B2", " A1", "", "B2 ", "a1", "A1"]);
        assert_eq!(codes, vec!["B2", "A1", "a1"]);
    }

    #[test]
    fn normalize_codes_empty_input() {
        let codes = normalize_codes(Vec::<String>::new());
        assert!(codes.is_empty());
    }

    #[test]
    fn code_source_parses_its_own_display() {
        for source in [CodeSource::Imported, CodeSource::Manual] {
            assert_eq!(source.to_string().parse::<CodeSource>().unwrap(), source);
        }
        assert!("scanned".parse::<CodeSource>().is_err());
    }
}
