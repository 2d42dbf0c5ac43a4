//! Supplier order record.
//!
//! # Responsibility
//! - Define the persisted order shape and its status vocabulary.
//! - Validate creation input before it reaches the dataset.
//!
//! # Invariants
//! - `status == Delivered` implies `delivered_at.is_some()`.
//! - `status == Delayed` implies `delay_reason.is_some()`.
//! - `Delivered` is terminal; no operation moves an order out of it.

use crate::model::date::{deserialize_date, deserialize_optional_date, parse_date};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Integer order id, assigned as `max(existing) + 1`.
pub type OrderId = u64;

/// Placeholder stored when a delay is reported without a reason.
pub const DELAY_REASON_PLACEHOLDER: &str = "Unspecified";

/// Order lifecycle status.
///
/// Persisted as its display label (`"In Transit"`, ...). Labels written by
/// other tools are kept verbatim in `Other` so they survive a save.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Scheduled,
    InTransit,
    Delayed,
    /// Terminal.
    Delivered,
    Other(String),
}

impl OrderStatus {
    /// Every recognized status in display order.
    pub fn known() -> [OrderStatus; 4] {
        [
            OrderStatus::Scheduled,
            OrderStatus::InTransit,
            OrderStatus::Delayed,
            OrderStatus::Delivered,
        ]
    }

    /// Persisted label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::InTransit => "In Transit",
            Self::Delayed => "Delayed",
            Self::Delivered => "Delivered",
            Self::Other(label) => label.as_str(),
        }
    }

    /// Maps a persisted label to a status. Never fails.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Scheduled" => Self::Scheduled,
            "In Transit" => Self::InTransit,
            "Delayed" => Self::Delayed,
            "Delivered" => Self::Delivered,
            other => Self::Other(other.to_string()),
        }
    }

    /// Parses user input into a recognized status.
    ///
    /// Case-insensitive and whitespace tolerant; `in_transit` and
    /// `in-transit` are accepted as well. Returns `None` when the input
    /// names no recognized status.
    pub fn parse_input(input: &str) -> Option<Self> {
        let normalized = input.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "scheduled" => Some(Self::Scheduled),
            "in transit" => Some(Self::InTransit),
            "delayed" => Some(Self::Delayed),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|label| Self::from_label(&label))
    }
}

/// Persisted supplier order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub material: String,
    pub supplier: String,
    /// Serialized as `YYYY-MM-DD`.
    #[serde(deserialize_with = "deserialize_date")]
    pub eta: NaiveDate,
    pub status: OrderStatus,
    /// Set whenever `status == Delayed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Set whenever `status == Delivered`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_date"
    )]
    pub delivered_at: Option<NaiveDate>,
    /// Fields this version does not know about, written back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    /// Returns whether the order still counts as active (not delivered).
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// Unvalidated create-order input, as typed by a user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewOrder {
    pub material: String,
    pub supplier: String,
    pub eta: String,
    pub status: String,
}

/// Create-order input after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub material: String,
    pub supplier: String,
    pub eta: NaiveDate,
    pub status: OrderStatus,
}

impl NewOrder {
    /// Validates all creation constraints.
    ///
    /// # Errors
    /// - `EmptyMaterial` / `EmptySupplier` when the trimmed value is empty.
    /// - `InvalidDate` when `eta` is not a calendar date.
    /// - `UnknownStatus` when `status` names no recognized status.
    pub fn validate(&self) -> Result<ValidatedOrder, OrderValidationError> {
        let material = self.material.trim();
        if material.is_empty() {
            return Err(OrderValidationError::EmptyMaterial);
        }
        let supplier = self.supplier.trim();
        if supplier.is_empty() {
            return Err(OrderValidationError::EmptySupplier);
        }
        let eta = parse_eta(&self.eta)?;
        let status = OrderStatus::parse_input(&self.status)
            .ok_or_else(|| OrderValidationError::UnknownStatus(self.status.trim().to_string()))?;

        Ok(ValidatedOrder {
            material: material.to_string(),
            supplier: supplier.to_string(),
            eta,
            status,
        })
    }
}

/// Parses an ETA entered by a user.
pub fn parse_eta(input: &str) -> Result<NaiveDate, OrderValidationError> {
    parse_date(input).ok_or_else(|| OrderValidationError::InvalidDate(input.trim().to_string()))
}

/// Validation failures for user-supplied order input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    EmptyMaterial,
    EmptySupplier,
    InvalidDate(String),
    UnknownStatus(String),
}

impl Display for OrderValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMaterial => write!(f, "material must not be empty"),
            Self::EmptySupplier => write!(f, "supplier must not be empty"),
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
            Self::UnknownStatus(value) => write!(
                f,
                "unknown order status `{value}`; expected Scheduled|In Transit|Delayed|Delivered"
            ),
        }
    }
}

impl Error for OrderValidationError {}
