//! Periodic re-read so passive views observe writes made elsewhere.
//!
//! # Invariants
//! - Each tick runs the same load-and-derive path as a manual refresh.
//! - There is no notification channel; polling is the only mechanism.
//! - Stopping (or dropping) the loop ends polling before it returns.

mod poller;

pub use poller::{SyncLoop, DEFAULT_SYNC_INTERVAL};
