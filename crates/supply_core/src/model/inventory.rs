//! Warehouse inventory record and stock bands.
//!
//! # Invariants
//! - `name` is the unique key within `Dataset::inventory`.
//! - `qty` never goes below 0; there is no upper bound.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Persisted inventory item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub qty: u32,
    pub low_threshold: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InventoryItem {
    /// Derived stock band; never persisted.
    pub fn band(&self) -> StockBand {
        StockBand::classify(self.qty, self.low_threshold)
    }
}

/// Derived stock level classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockBand {
    Ok,
    Low,
    Reorder,
}

impl StockBand {
    /// `Reorder` at 0, `Low` up to and including the threshold, else `Ok`.
    pub fn classify(qty: u32, low_threshold: u32) -> Self {
        if qty == 0 {
            Self::Reorder
        } else if qty <= low_threshold {
            Self::Low
        } else {
            Self::Ok
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Low => "Low",
            Self::Reorder => "Reorder",
        }
    }

    /// Whether the item counts toward the low-stock KPI.
    pub fn needs_attention(self) -> bool {
        !matches!(self, Self::Ok)
    }
}

impl Display for StockBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a single-step quantity adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QtyAdjustment {
    Increment,
    Decrement,
}

impl QtyAdjustment {
    /// Applies one step to `qty`, flooring at 0.
    pub fn apply(self, qty: u32) -> u32 {
        match self {
            Self::Increment => qty.saturating_add(1),
            Self::Decrement => qty.saturating_sub(1),
        }
    }
}
