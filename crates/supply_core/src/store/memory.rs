//! In-memory blob backend.
//!
//! Clones share one underlying map, so two clones behave like two tabs over
//! the same origin storage.

use super::{BlobBackend, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MemorySlots {
    blobs: HashMap<String, String>,
    writes: usize,
}

/// Shared in-memory key-value slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slots: Arc<Mutex<MemorySlots>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes across all keys.
    pub fn write_count(&self) -> usize {
        self.slots.lock().map_or(0, |slots| slots.writes)
    }
}

impl BlobBackend for MemoryBackend {
    fn read_blob(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let slots = self
            .slots
            .lock()
            .map_err(|_| StoreError::Poisoned("memory"))?;
        Ok(slots.blobs.get(key).map(|blob| blob.clone().into_bytes()))
    }

    fn write_blob(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| StoreError::Poisoned("memory"))?;
        slots.blobs.insert(key.to_string(), value.to_string());
        slots.writes += 1;
        Ok(())
    }
}
