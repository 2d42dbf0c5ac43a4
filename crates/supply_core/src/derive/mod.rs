//! Derived views computed from the current dataset.
//!
//! # Responsibility
//! - Compute KPIs, stock bands, chart tallies, badge categories and the
//!   filtered/sorted order lists every view renders.
//!
//! # Invariants
//! - Pure functions: no storage access, no clock, no caching across calls.
//! - Inputs are never mutated; filtering and sorting work on borrowed rows.

pub mod badge;
pub mod charts;
pub mod kpi;
pub mod orders;
pub mod snapshot;
