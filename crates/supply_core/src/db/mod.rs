//! SQLite bootstrap for the durable key-value slot.
//!
//! The storage file holds a single `kv_store` table; its layout version is
//! mirrored to `PRAGMA user_version`. Dataset shape repair lives in
//! `crate::migrate`, not here.

mod open;

pub use open::{open_db, open_db_in_memory, KV_LAYOUT_VERSION};
