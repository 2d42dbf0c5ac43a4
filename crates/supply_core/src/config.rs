//! Engine configuration.
//!
//! # Invariants
//! - Every field has a default; an empty file is a valid configuration.
//! - `sync_interval_ms` stays within `MIN_SYNC_INTERVAL_MS..=MAX_SYNC_INTERVAL_MS`.

use crate::logging::default_log_level;
use crate::store::DEFAULT_STORE_KEY;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MIN_SYNC_INTERVAL_MS: u64 = 100;
pub const MAX_SYNC_INTERVAL_MS: u64 = 60_000;

const DEFAULT_DB_FILE_NAME: &str = "bfb_supply.sqlite3";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(toml::de::Error),
    SyncIntervalOutOfRange(u64),
    EmptyStoreKey,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::SyncIntervalOutOfRange(value) => write!(
                f,
                "sync_interval_ms {value} out of range {MIN_SYNC_INTERVAL_MS}..={MAX_SYNC_INTERVAL_MS}"
            ),
            Self::EmptyStoreKey => write!(f, "store_key cannot be empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// SQLite file holding the durable slot.
    pub db_path: PathBuf,
    pub store_key: String,
    pub sync_interval_ms: u64,
    pub log_level: String,
    /// Rolling log directory; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            store_key: DEFAULT_STORE_KEY.to_string(),
            sync_interval_ms: 1000,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl EngineConfig {
    /// Parses and validates TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SYNC_INTERVAL_MS..=MAX_SYNC_INTERVAL_MS).contains(&self.sync_interval_ms) {
            return Err(ConfigError::SyncIntervalOutOfRange(self.sync_interval_ms));
        }
        if self.store_key.trim().is_empty() {
            return Err(ConfigError::EmptyStoreKey);
        }
        Ok(())
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_millis(self.sync_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig};
    use std::path::PathBuf;

    #[test]
    fn empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.store_key, "bfb_supply_data_v1");
        assert_eq!(config.sync_interval().as_millis(), 1000);
    }

    #[test]
    fn fields_override_defaults() {
        let config = EngineConfig::from_toml_str(
            "db_path = \"/tmp/site.sqlite3\"\nsync_interval_ms = 250\nlog_dir = \"/tmp/logs\"\n",
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/site.sqlite3"));
        assert_eq!(config.sync_interval_ms, 250);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
    }

    #[test]
    fn out_of_range_interval_and_unknown_keys_are_rejected() {
        assert!(matches!(
            EngineConfig::from_toml_str("sync_interval_ms = 5"),
            Err(ConfigError::SyncIntervalOutOfRange(5))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("store_key = \"  \""),
            Err(ConfigError::EmptyStoreKey)
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("colour = \"red\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
