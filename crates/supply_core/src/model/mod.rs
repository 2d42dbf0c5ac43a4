//! Canonical dataset model shared by every view.
//!
//! # Responsibility
//! - Define the root `Dataset` aggregate and its record types.
//! - Provide the default seed used on first run, reset and corrupt-record recovery.
//!
//! # Invariants
//! - `Dataset` is the only unit of persistence; records never persist on their own.
//! - Order ids are unique within `Dataset::orders`.
//! - Records are never physically deleted; delivered orders stay as history.
//! - Unknown fields are kept in `extra` maps and written back unchanged.

pub mod building;
pub mod dataset;
pub mod date;
pub mod inventory;
pub mod order;
pub mod seed;
