//! Connection bootstrap utilities for SQLite.
//!
//! # Invariants
//! - Returned connections have the `kv_store` table in place.
//! - A file stamped with a newer layout than [`KV_LAYOUT_VERSION`] is refused
//!   before any blob is read.
//! - Returned connections wait on a busy file instead of failing immediately,
//!   so several handles on one file can write in turn.

use crate::store::{StoreError, StoreResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Layout version of the `kv_store` table written by this binary.
pub const KV_LAYOUT_VERSION: u32 = 1;

const KV_TABLE_SQL: &str = include_str!("kv_store.sql");
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file and prepares the key-value slot table.
///
/// # Side effects
/// - Creates the file when missing.
/// - Emits `store_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> StoreResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens an in-memory SQLite database with the key-value slot table.
pub fn open_db_in_memory() -> StoreResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StoreResult<Connection> {
    let started_at = Instant::now();
    info!("event=store_open module=db status=start mode={mode}");

    let result = open()
        .map_err(StoreError::from)
        .and_then(|mut conn| prepare_kv_table(&mut conn).map(|()| conn));

    match result {
        Ok(conn) => {
            info!(
                "event=store_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            let code = match &err {
                StoreError::UnsupportedLayout { .. } => "layout_unsupported",
                _ => "db_open_failed",
            };
            error!(
                "event=store_open module=db status=error mode={} duration_ms={} error_code={} error={}",
                mode,
                started_at.elapsed().as_millis(),
                code,
                err
            );
            Err(err)
        }
    }
}

fn prepare_kv_table(conn: &mut Connection) -> StoreResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;

    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if found > KV_LAYOUT_VERSION {
        return Err(StoreError::UnsupportedLayout {
            found,
            supported: KV_LAYOUT_VERSION,
        });
    }
    if found == KV_LAYOUT_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(KV_TABLE_SQL)?;
    tx.pragma_update(None, "user_version", KV_LAYOUT_VERSION)?;
    tx.commit()?;
    Ok(())
}
