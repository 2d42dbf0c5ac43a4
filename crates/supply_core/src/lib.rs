//! Persistent state engine for the BFB supply portal.
//! This crate is the single source of truth for dataset invariants; views
//! only read snapshots and call mutation operations.

pub mod config;
pub mod db;
pub mod derive;
pub mod logging;
pub mod migrate;
pub mod model;
pub mod service;
pub mod store;
pub mod sync;

pub use config::{ConfigError, EngineConfig};
pub use derive::badge::{order_badge, stock_badge, BadgeTone};
pub use derive::charts::{compute_charts, ChartTallies};
pub use derive::kpi::{compute_kpis, Kpis};
pub use derive::orders::{query_orders, SortDirection, SortKey, SortState};
pub use derive::snapshot::{InventoryRow, OrderRow, ViewQuery, ViewSnapshot};
pub use logging::{default_log_level, init_logging, logging_status};
pub use migrate::{migrate, MigrationOutcome, Repair};
pub use model::building::{Building, BuildingStatus};
pub use model::dataset::Dataset;
pub use model::inventory::{InventoryItem, QtyAdjustment, StockBand};
pub use model::order::{NewOrder, Order, OrderId, OrderStatus, OrderValidationError};
pub use model::seed::default_seed;
pub use service::error::{ImportError, ServiceError, ServiceResult};
pub use service::supply_service::{ExportDocument, SupplyService};
pub use store::{
    BlobBackend, DatasetStore, MemoryBackend, SqliteBackend, Store, StoreError, StoreResult,
    DEFAULT_STORE_KEY,
};
pub use sync::{SyncLoop, DEFAULT_SYNC_INTERVAL};

/// Opens the SQLite-backed store described by `config`.
pub fn open_store(config: &EngineConfig) -> StoreResult<DatasetStore<SqliteBackend>> {
    let backend = SqliteBackend::open(&config.db_path)?;
    Ok(DatasetStore::with_key(backend, config.store_key.clone()))
}

/// Returns the engine crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
