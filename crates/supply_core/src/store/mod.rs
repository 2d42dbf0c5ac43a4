//! Durable whole-dataset persistence.
//!
//! # Responsibility
//! - Persist the full `Dataset` as one serialized blob under a fixed,
//!   versioned key.
//! - Seed on first run, re-seed on corrupt records, and persist migration
//!   repairs before handing data to callers.
//!
//! # Invariants
//! - Every write replaces the whole blob; last write wins.
//! - No locking or compare-and-swap: two handles interleaving
//!   read-modify-write cycles can overwrite each other's effect.
//! - Corruption is repaired, never surfaced as an error.
//!
//! # See also
//! - `crate::migrate`

use crate::migrate::migrate;
use crate::model::dataset::Dataset;
use crate::model::seed::default_seed;
use chrono::Utc;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

mod memory;
mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

/// Versioned key of the durable dataset slot.
pub const DEFAULT_STORE_KEY: &str = "bfb_supply_data_v1";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage backend failure. Corrupt data is not an error here.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// The storage file was written by a newer binary.
    UnsupportedLayout { found: u32, supported: u32 },
    Serialize(serde_json::Error),
    /// A backend lock was poisoned by a panicking writer.
    Poisoned(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedLayout { found, supported } => write!(
                f,
                "storage layout version {found} is newer than supported {supported}"
            ),
            Self::Serialize(err) => write!(f, "failed to serialize dataset: {err}"),
            Self::Poisoned(backend) => write!(f, "{backend} backend lock poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::UnsupportedLayout { .. } | Self::Poisoned(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Narrow capability over one durable key-value slot.
///
/// Reads hand back raw bytes; whether they decode as text is the store's
/// concern, so an undecodable slot counts as corrupt rather than failing.
pub trait BlobBackend {
    fn read_blob(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;
    fn write_blob(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// Whole-dataset load/save contract used by every mutation and view.
pub trait Store {
    /// Loads the current dataset, seeding or repairing as needed.
    fn load(&self) -> StoreResult<Dataset>;
    /// Replaces the persisted dataset with `dataset`.
    fn save(&self, dataset: &Dataset) -> StoreResult<()>;
}

impl<S: Store + ?Sized> Store for &S {
    fn load(&self) -> StoreResult<Dataset> {
        (**self).load()
    }

    fn save(&self, dataset: &Dataset) -> StoreResult<()> {
        (**self).save(dataset)
    }
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn load(&self) -> StoreResult<Dataset> {
        (**self).load()
    }

    fn save(&self, dataset: &Dataset) -> StoreResult<()> {
        (**self).save(dataset)
    }
}

/// `Store` implementation over any `BlobBackend`.
#[derive(Debug, Clone)]
pub struct DatasetStore<B: BlobBackend> {
    backend: B,
    key: String,
}

impl<B: BlobBackend> DatasetStore<B> {
    /// Creates a store on the default versioned key.
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, DEFAULT_STORE_KEY)
    }

    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn reseed(&self, reason: &str) -> StoreResult<Dataset> {
        let seed = default_seed();
        self.save(&seed)?;
        info!("event=store_load module=store status=seeded reason={reason}");
        Ok(seed)
    }
}

impl<B: BlobBackend> Store for DatasetStore<B> {
    fn load(&self) -> StoreResult<Dataset> {
        let started_at = Instant::now();
        let raw = match self.backend.read_blob(&self.key) {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    "event=store_load module=store status=error error_code=read_failed error={}",
                    err
                );
                return Err(err);
            }
        };

        let Some(bytes) = raw else {
            return self.reseed("missing");
        };

        let decoded = std::str::from_utf8(&bytes).map(serde_json::from_str::<serde_json::Value>);
        let value = match decoded {
            Ok(Ok(value)) => value,
            Ok(Err(_)) | Err(_) => {
                warn!(
                    "event=store_load module=store status=corrupt bytes={}",
                    bytes.len()
                );
                return self.reseed("corrupt");
            }
        };

        let outcome = migrate(value, Utc::now());
        if outcome.changed() {
            self.save(&outcome.dataset)?;
        }
        debug!(
            "event=store_load module=store status=ok repaired={} duration_ms={}",
            outcome.changed(),
            started_at.elapsed().as_millis()
        );
        Ok(outcome.dataset)
    }

    fn save(&self, dataset: &Dataset) -> StoreResult<()> {
        let text = serde_json::to_string(dataset).map_err(StoreError::Serialize)?;
        match self.backend.write_blob(&self.key, &text) {
            Ok(()) => {
                debug!(
                    "event=store_save module=store status=ok bytes={}",
                    text.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error error_code=write_failed error={}",
                    err
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BlobBackend, DatasetStore, MemoryBackend, Store, DEFAULT_STORE_KEY};
    use crate::model::seed::default_seed;

    #[test]
    fn first_load_writes_the_seed() {
        let backend = MemoryBackend::new();
        let store = DatasetStore::new(backend.clone());

        let loaded = store.load().unwrap();
        assert_eq!(loaded, default_seed());
        assert!(backend.read_blob(DEFAULT_STORE_KEY).unwrap().is_some());
    }

    #[test]
    fn corrupt_blob_is_replaced_with_seed() {
        let backend = MemoryBackend::new();
        backend.write_blob(DEFAULT_STORE_KEY, "{not json").unwrap();
        let store = DatasetStore::new(backend.clone());

        assert_eq!(store.load().unwrap(), default_seed());
        let repaired = backend.read_blob(DEFAULT_STORE_KEY).unwrap().unwrap();
        assert!(serde_json::from_slice::<serde_json::Value>(&repaired).is_ok());
    }

    #[test]
    fn repaired_blob_is_persisted_once() {
        let backend = MemoryBackend::new();
        backend
            .write_blob(DEFAULT_STORE_KEY, r#"{"orders": [], "inventory": []}"#)
            .unwrap();
        let store = DatasetStore::new(backend.clone());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.buildings, default_seed().buildings);
        let writes_after_first = backend.write_count();

        store.load().unwrap();
        assert_eq!(backend.write_count(), writes_after_first);
    }

    #[test]
    fn stores_on_different_keys_do_not_share_data() {
        let backend = MemoryBackend::new();
        let first = DatasetStore::with_key(backend.clone(), "a");
        let second = DatasetStore::with_key(backend, "b");

        let mut dataset = first.load().unwrap();
        dataset.orders.clear();
        first.save(&dataset).unwrap();

        assert_eq!(second.load().unwrap().orders.len(), 3);
    }
}
