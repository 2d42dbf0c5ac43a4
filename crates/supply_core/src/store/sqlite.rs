//! SQLite-backed blob backend.
//!
//! # Invariants
//! - One row per key in `kv_store`; writes upsert the whole value.
//! - Several backends opened on one file are independent handles (like
//!   browser tabs) and race with last-write-wins semantics.

use super::{BlobBackend, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug)]
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Opens (creating if needed) the storage file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl BlobBackend for SqliteBackend {
    fn read_blob(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Poisoned("sqlite"))?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| Ok(slot_bytes(row.get_ref(0)?)),
            )
            .optional()?;
        Ok(value)
    }

    fn write_blob(&self, key: &str, value: &str) -> StoreResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Poisoned("sqlite"))?;
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Raw bytes of a slot value whatever its storage class. Other tools can
/// leave a BLOB or non-UTF-8 TEXT in the column; those must reach the store
/// as bytes so it can treat them as corrupt.
fn slot_bytes(value: ValueRef<'_>) -> Vec<u8> {
    match value {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => bytes.to_vec(),
        ValueRef::Integer(number) => number.to_string().into_bytes(),
        ValueRef::Real(number) => number.to_string().into_bytes(),
        ValueRef::Null => Vec::new(),
    }
}
