//! Server configuration read from environment variables.
//!
//! | variable                | default     |
//! |-------------------------|-------------|
//! | `BINLOC_BACKEND`        | `sqlite`    |
//! | `BINLOC_DB_PATH`        | `binloc.db` |
//! | `BINLOC_PORT`           | `3000`      |
//! | `BINLOC_PART_CODES_CSV` | unset       |
//! | `BINLOC_INDEX_TTL_SECS` | `60`        |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default lifetime of the cached part-code index.
pub const DEFAULT_INDEX_TTL_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Which [`binloc_storage::InventoryStore`] implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Memory,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Sqlite => "sqlite",
            Backend::Memory => "memory",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "memory" => Ok(Backend::Memory),
            _ => Err("expected 'sqlite' or 'memory'".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub backend: Backend,
    /// SQLite database file; ignored by the memory backend.
    pub db_path: String,
    pub port: u16,
    /// Master list bulk-imported at startup.
    pub part_codes_csv: Option<PathBuf>,
    /// `None` disables the code index cache.
    pub index_ttl: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            backend: Backend::Sqlite,
            db_path: "binloc.db".to_string(),
            port: 3000,
            part_codes_csv: None,
            index_ttl: Some(Duration::from_secs(DEFAULT_INDEX_TTL_SECS)),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(value) = lookup("BINLOC_BACKEND") {
            config.backend = value
                .parse()
                .map_err(|reason| invalid("BINLOC_BACKEND", &value, reason))?;
        }
        if let Some(value) = lookup("BINLOC_DB_PATH") {
            config.db_path = value;
        }
        if let Some(value) = lookup("BINLOC_PORT") {
            config.port = value
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid("BINLOC_PORT", &value, e.to_string()))?;
        }
        if let Some(value) = lookup("BINLOC_PART_CODES_CSV") {
            if !value.trim().is_empty() {
                config.part_codes_csv = Some(PathBuf::from(value));
            }
        }
        if let Some(value) = lookup("BINLOC_INDEX_TTL_SECS") {
            let secs: u64 = value.trim().parse().map_err(|e: std::num::ParseIntError| {
                invalid("BINLOC_INDEX_TTL_SECS", &value, e.to_string())
            })?;
            config.index_ttl = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn invalid(var: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        reason,
    }
}
