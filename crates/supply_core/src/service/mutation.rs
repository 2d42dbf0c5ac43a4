//! Pure dataset transformations behind each mutation operation.
//!
//! # Invariants
//! - On `Err`, the dataset is left untouched.
//! - `Delivered` is terminal: ETA edits keep it, delay reports are refused.
//! - `qty` is floored at 0.
//!
//! Status transitions:
//! - `Scheduled | In Transit -> Delayed` via `report_delay`.
//! - any non-terminal `-> Delivered` via `mark_delivered`.
//! - `Delayed | In Transit -> Scheduled` via `update_eta`.

use crate::model::dataset::Dataset;
use crate::model::inventory::QtyAdjustment;
use crate::model::order::{
    parse_eta, NewOrder, Order, OrderId, OrderStatus, DELAY_REASON_PLACEHOLDER,
};
use crate::service::error::{ServiceError, ServiceResult};
use chrono::{DateTime, Utc};
use serde_json::Map;

/// Whether a transformation changed anything and must be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Applied,
    Unchanged,
}

/// Appends a new order with id `max + 1`. Fails without change when no
/// larger id exists.
pub fn create_order(
    dataset: &mut Dataset,
    input: &NewOrder,
    now: DateTime<Utc>,
) -> ServiceResult<OrderId> {
    let validated = input.validate()?;
    let id = dataset
        .next_order_id()
        .ok_or(ServiceError::OrderIdsExhausted)?;
    let is_delivered = validated.status.is_terminal();
    let is_delayed = validated.status == OrderStatus::Delayed;

    dataset.orders.push(Order {
        id,
        material: validated.material,
        supplier: validated.supplier,
        eta: validated.eta,
        status: validated.status,
        delay_reason: is_delayed.then(|| DELAY_REASON_PLACEHOLDER.to_string()),
        created_at: now,
        updated_at: None,
        delivered_at: is_delivered.then(|| now.date_naive()),
        extra: Map::new(),
    });
    Ok(id)
}

/// Marks an order delivered today. Already delivered orders are left as is.
pub fn mark_delivered(
    dataset: &mut Dataset,
    id: OrderId,
    now: DateTime<Utc>,
) -> ServiceResult<Change> {
    let order = dataset
        .order_mut(id)
        .ok_or(ServiceError::OrderNotFound(id))?;
    if order.status.is_terminal() {
        return Ok(Change::Unchanged);
    }

    order.status = OrderStatus::Delivered;
    order.delivered_at = Some(now.date_naive());
    order.updated_at = Some(now);
    Ok(Change::Applied)
}

/// Sets a new ETA and reschedules the order unless it is delivered.
pub fn update_eta(
    dataset: &mut Dataset,
    id: OrderId,
    eta: &str,
    now: DateTime<Utc>,
) -> ServiceResult<Change> {
    let eta = parse_eta(eta)?;
    let order = dataset
        .order_mut(id)
        .ok_or(ServiceError::OrderNotFound(id))?;

    order.eta = eta;
    if !order.status.is_terminal() {
        order.status = OrderStatus::Scheduled;
    }
    order.updated_at = Some(now);
    Ok(Change::Applied)
}

/// Flags an order as delayed with a reason and an optional new ETA.
///
/// Blank `reason` stores the placeholder; blank `new_eta` keeps the
/// current ETA.
pub fn report_delay(
    dataset: &mut Dataset,
    id: OrderId,
    reason: &str,
    new_eta: Option<&str>,
    now: DateTime<Utc>,
) -> ServiceResult<Change> {
    let new_eta = match new_eta.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => Some(parse_eta(value)?),
        None => None,
    };
    let order = dataset
        .order_mut(id)
        .ok_or(ServiceError::OrderNotFound(id))?;
    if order.status.is_terminal() {
        return Err(ServiceError::OrderDelivered(id));
    }

    let reason = reason.trim();
    order.status = OrderStatus::Delayed;
    order.delay_reason = Some(if reason.is_empty() {
        DELAY_REASON_PLACEHOLDER.to_string()
    } else {
        reason.to_string()
    });
    if let Some(eta) = new_eta {
        order.eta = eta;
    }
    order.updated_at = Some(now);
    Ok(Change::Applied)
}

/// Moves an item's quantity by one step; decrementing at 0 changes nothing.
pub fn adjust_quantity(
    dataset: &mut Dataset,
    name: &str,
    adjustment: QtyAdjustment,
    now: DateTime<Utc>,
) -> ServiceResult<Change> {
    let item = dataset
        .item_mut(name)
        .ok_or_else(|| ServiceError::ItemNotFound(name.to_string()))?;

    let next = adjustment.apply(item.qty);
    if next == item.qty {
        return Ok(Change::Unchanged);
    }
    item.qty = next;
    item.updated_at = Some(now);
    Ok(Change::Applied)
}
