//! Use-case facade over an injected `Store`.
//!
//! # Responsibility
//! - Expose pull-based snapshots and the mutation operations.
//! - Run each mutation as a fresh load, one transformation, one save.
//!
//! # Invariants
//! - No dataset is cached between calls; every call re-reads the store.
//! - Unchanged or rejected mutations do not write.
//! - Concurrent services on one durable slot are last-write-wins.

use crate::derive::snapshot::{ViewQuery, ViewSnapshot};
use crate::model::dataset::Dataset;
use crate::model::inventory::QtyAdjustment;
use crate::model::order::{NewOrder, OrderId};
use crate::model::seed::default_seed;
use crate::service::error::{ImportError, ServiceResult};
use crate::service::mutation::{self, Change};
use crate::service::transfer::{export_file_name, export_json, parse_import};
use crate::store::{Store, StoreError};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::path::Path;
use std::time::Instant;

/// A ready-to-download export document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub file_name: String,
    pub contents: String,
}

pub struct SupplyService<S: Store> {
    store: S,
}

impl<S: Store> SupplyService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current dataset, freshly loaded.
    pub fn dataset(&self) -> ServiceResult<Dataset> {
        Ok(self.store.load()?)
    }

    /// Pull + derive for every view. Shared by manual refresh and the sync loop.
    pub fn snapshot(&self, query: &ViewQuery) -> ServiceResult<ViewSnapshot> {
        Ok(ViewSnapshot::derive(self.store.load()?, query))
    }

    /// Creates an order and returns its assigned id.
    pub fn create_order(&self, input: &NewOrder) -> ServiceResult<OrderId> {
        self.mutate("order_create", |dataset, now| {
            mutation::create_order(dataset, input, now).map(|id| (id, Change::Applied))
        })
    }

    pub fn mark_delivered(&self, id: OrderId) -> ServiceResult<()> {
        self.mutate("order_deliver", |dataset, now| {
            mutation::mark_delivered(dataset, id, now).map(|change| ((), change))
        })
    }

    pub fn update_eta(&self, id: OrderId, eta: &str) -> ServiceResult<()> {
        self.mutate("order_eta_update", |dataset, now| {
            mutation::update_eta(dataset, id, eta, now).map(|change| ((), change))
        })
    }

    pub fn report_delay(
        &self,
        id: OrderId,
        reason: &str,
        new_eta: Option<&str>,
    ) -> ServiceResult<()> {
        self.mutate("order_delay", |dataset, now| {
            mutation::report_delay(dataset, id, reason, new_eta, now).map(|change| ((), change))
        })
    }

    pub fn adjust_quantity(&self, name: &str, adjustment: QtyAdjustment) -> ServiceResult<()> {
        self.mutate("inventory_adjust", |dataset, now| {
            mutation::adjust_quantity(dataset, name, adjustment, now).map(|change| ((), change))
        })
    }

    /// Replaces the dataset with a validated import payload.
    pub fn import_json(&self, text: &str) -> ServiceResult<()> {
        let dataset = match parse_import(text, Utc::now()) {
            Ok(dataset) => dataset,
            Err(err) => {
                warn!(
                    "event=dataset_import module=service status=rejected bytes={} error={}",
                    text.len(),
                    err
                );
                return Err(err.into());
            }
        };
        self.store.save(&dataset)?;
        info!(
            "event=dataset_import module=service status=ok orders={} items={}",
            dataset.orders.len(),
            dataset.inventory.len()
        );
        Ok(())
    }

    /// Reads an import file, then behaves like [`Self::import_json`].
    pub fn import_file(&self, path: impl AsRef<Path>) -> ServiceResult<()> {
        let text = std::fs::read_to_string(path).map_err(ImportError::Io)?;
        self.import_json(&text)
    }

    /// Replaces the dataset with a fresh copy of the default seed.
    pub fn reset(&self) -> ServiceResult<()> {
        self.store.save(&default_seed())?;
        info!("event=dataset_reset module=service status=ok");
        Ok(())
    }

    /// Pretty-printed export named with today's date.
    pub fn export(&self) -> ServiceResult<ExportDocument> {
        let dataset = self.store.load()?;
        let contents = export_json(&dataset).map_err(StoreError::Serialize)?;
        let file_name = export_file_name(Utc::now().date_naive());
        info!(
            "event=dataset_export module=service status=ok bytes={}",
            contents.len()
        );
        Ok(ExportDocument {
            file_name,
            contents,
        })
    }

    fn mutate<T>(
        &self,
        event: &'static str,
        apply: impl FnOnce(&mut Dataset, DateTime<Utc>) -> ServiceResult<(T, Change)>,
    ) -> ServiceResult<T> {
        let started_at = Instant::now();
        let mut dataset = self.store.load()?;

        let (value, change) = match apply(&mut dataset, Utc::now()) {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    "event={} module=service status=rejected error_code={}",
                    event,
                    err.code()
                );
                return Err(err);
            }
        };

        if change == Change::Applied {
            self.store.save(&dataset)?;
        }
        info!(
            "event={} module=service status=ok changed={} duration_ms={}",
            event,
            change == Change::Applied,
            started_at.elapsed().as_millis()
        );
        Ok(value)
    }
}

