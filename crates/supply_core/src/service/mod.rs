//! Mutation operations and the service facade views call into.
//!
//! # Responsibility
//! - Define the only sanctioned ways to change the dataset.
//! - Run every mutation as load -> apply one transformation -> save.
//!
//! # Invariants
//! - Invalid input performs no write and is reported to the caller.
//! - Persistence is always whole-dataset replace-on-write.

pub mod error;
pub mod mutation;
pub mod supply_service;
pub mod transfer;
