//! Dataset shape repair applied on every load.
//!
//! # Responsibility
//! - Bring any previously persisted (or imported) JSON value up to the
//!   current `Dataset` shape.
//! - Report every repair so the caller can persist the result once.
//!
//! # Invariants
//! - Pure: reads no clock and touches no storage; `now` is supplied.
//! - Idempotent: migrating an already migrated dataset reports no repairs.
//! - Data loss is preferred over inconsistency: records that cannot be
//!   decoded are dropped rather than kept half-valid.
//! - Fields this version does not know about are carried through.
//!
//! Records missing `created_at` receive `now`, so migrated history carries
//! its migration time as nominal creation time.

use crate::model::building::Building;
use crate::model::dataset::Dataset;
use crate::model::date::parse_date;
use crate::model::inventory::InventoryItem;
use crate::model::order::{Order, DELAY_REASON_PLACEHOLDER};
use crate::model::seed::default_buildings;
use chrono::{DateTime, SecondsFormat, Utc};
use log::warn;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// One repair performed during migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    /// The persisted root was not a JSON object.
    RootReplaced,
    /// A top-level collection was missing or not an array.
    CollectionReplaced(&'static str),
    /// A record had no usable `created_at`.
    CreatedAtAssigned { collection: &'static str, index: usize },
    /// A `Delayed` order had no reason.
    DelayReasonFilled { index: usize },
    /// A `Delivered` order had no delivery date, or an unreadable one.
    DeliveredAtFilled { index: usize },
    /// An audit timestamp carried surrounding whitespace.
    TimestampTrimmed { collection: &'static str, index: usize },
    /// An optional field held an unreadable value and was removed.
    FieldCleared { collection: &'static str, index: usize },
    /// A negative quantity or threshold was clamped to 0.
    QuantityClamped { index: usize },
    /// A record could not be decoded or duplicated an earlier key.
    RecordDropped { collection: &'static str, index: usize },
}

/// Result of one migration pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationOutcome {
    pub dataset: Dataset,
    pub repairs: Vec<Repair>,
}

impl MigrationOutcome {
    /// Whether the migrated dataset differs from what was persisted.
    pub fn changed(&self) -> bool {
        !self.repairs.is_empty()
    }
}

/// Migrates a raw persisted value into a consistent `Dataset`.
///
/// - `buildings` missing/non-array -> default seed buildings.
/// - `orders`/`inventory` missing/non-array -> empty.
/// - Audit timestamps and status invariants are filled per record.
pub fn migrate(raw: Value, now: DateTime<Utc>) -> MigrationOutcome {
    let mut repairs = Vec::new();
    let mut root = match raw {
        Value::Object(map) => map,
        _ => {
            repairs.push(Repair::RootReplaced);
            Map::new()
        }
    };

    let buildings = match take_collection(&mut root, "buildings", &mut repairs) {
        Some(records) => decode_records::<Building>(records, "buildings", &mut repairs, |_, _, _| {}),
        None => default_buildings(),
    };

    let orders = take_collection(&mut root, "orders", &mut repairs)
        .map(|records| {
            decode_records::<Order>(records, "orders", &mut repairs, |index, record, repairs| {
                repair_order(index, record, now, repairs)
            })
        })
        .unwrap_or_default();
    let orders = dedupe(orders, "orders", &mut repairs, |order| order.id.to_string());

    let inventory = take_collection(&mut root, "inventory", &mut repairs)
        .map(|records| {
            decode_records::<InventoryItem>(
                records,
                "inventory",
                &mut repairs,
                |index, record, repairs| repair_item(index, record, now, repairs),
            )
        })
        .unwrap_or_default();
    let inventory = dedupe(inventory, "inventory", &mut repairs, |item| item.name.clone());

    if !repairs.is_empty() {
        warn!(
            "event=dataset_migrate module=migrate status=repaired repairs={}",
            repairs.len()
        );
    }

    MigrationOutcome {
        dataset: Dataset {
            buildings,
            orders,
            inventory,
            extra: root,
        },
        repairs,
    }
}

fn take_collection(
    root: &mut Map<String, Value>,
    key: &'static str,
    repairs: &mut Vec<Repair>,
) -> Option<Vec<Value>> {
    match root.remove(key) {
        Some(Value::Array(records)) => Some(records),
        _ => {
            repairs.push(Repair::CollectionReplaced(key));
            None
        }
    }
}

fn decode_records<T: DeserializeOwned>(
    records: Vec<Value>,
    collection: &'static str,
    repairs: &mut Vec<Repair>,
    mut repair: impl FnMut(usize, &mut Map<String, Value>, &mut Vec<Repair>),
) -> Vec<T> {
    let mut decoded = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let Value::Object(mut fields) = record else {
            repairs.push(Repair::RecordDropped { collection, index });
            continue;
        };
        repair(index, &mut fields, repairs);
        match serde_json::from_value::<T>(Value::Object(fields)) {
            Ok(value) => decoded.push(value),
            Err(_) => {
                // Serde messages can echo record text; only position is logged.
                warn!(
                    "event=dataset_migrate module=migrate status=dropped collection={} index={}",
                    collection, index
                );
                repairs.push(Repair::RecordDropped { collection, index });
            }
        }
    }
    decoded
}

fn dedupe<T>(
    records: Vec<T>,
    collection: &'static str,
    repairs: &mut Vec<Repair>,
    key: impl Fn(&T) -> String,
) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        if seen.insert(key(&record)) {
            kept.push(record);
        } else {
            repairs.push(Repair::RecordDropped { collection, index });
        }
    }
    kept
}

fn repair_order(
    index: usize,
    record: &mut Map<String, Value>,
    now: DateTime<Utc>,
    repairs: &mut Vec<Repair>,
) {
    trim_timestamps(record, "orders", index, repairs);
    if !has_timestamp(record.get("created_at")) {
        record.insert("created_at".to_string(), Value::String(timestamp(now)));
        repairs.push(Repair::CreatedAtAssigned {
            collection: "orders",
            index,
        });
    }
    clear_unreadable(record, "updated_at", "orders", index, repairs, |value| {
        has_timestamp(Some(value))
    });
    clear_unreadable(record, "delivered_at", "orders", index, repairs, |value| {
        value.as_str().and_then(parse_date).is_some()
    });

    let status = record
        .get("status")
        .and_then(Value::as_str)
        .map(str::to_string);

    if status.as_deref() == Some("Delayed") && is_blank(record.get("delay_reason")) {
        record.insert(
            "delay_reason".to_string(),
            Value::String(DELAY_REASON_PLACEHOLDER.to_string()),
        );
        repairs.push(Repair::DelayReasonFilled { index });
    }

    if status.as_deref() == Some("Delivered") && is_blank(record.get("delivered_at")) {
        let delivered_on = ["updated_at", "created_at"]
            .iter()
            .filter_map(|key| record.get(*key).and_then(Value::as_str))
            .find_map(parse_date)
            .unwrap_or_else(|| now.date_naive());
        record.insert(
            "delivered_at".to_string(),
            Value::String(delivered_on.format("%Y-%m-%d").to_string()),
        );
        repairs.push(Repair::DeliveredAtFilled { index });
    }
}

fn repair_item(
    index: usize,
    record: &mut Map<String, Value>,
    now: DateTime<Utc>,
    repairs: &mut Vec<Repair>,
) {
    trim_timestamps(record, "inventory", index, repairs);
    if !has_timestamp(record.get("created_at")) {
        record.insert("created_at".to_string(), Value::String(timestamp(now)));
        repairs.push(Repair::CreatedAtAssigned {
            collection: "inventory",
            index,
        });
    }
    clear_unreadable(record, "updated_at", "inventory", index, repairs, |value| {
        has_timestamp(Some(value))
    });

    for key in ["qty", "low_threshold"] {
        let negative = record
            .get(key)
            .and_then(Value::as_f64)
            .is_some_and(|value| value < 0.0);
        if negative {
            record.insert(key.to_string(), Value::from(0));
            repairs.push(Repair::QuantityClamped { index });
        }
    }
}

fn clear_unreadable(
    record: &mut Map<String, Value>,
    key: &str,
    collection: &'static str,
    index: usize,
    repairs: &mut Vec<Repair>,
    readable: impl Fn(&Value) -> bool,
) {
    let unreadable = record
        .get(key)
        .is_some_and(|value| !value.is_null() && !readable(value));
    if unreadable {
        record.remove(key);
        repairs.push(Repair::FieldCleared { collection, index });
    }
}

fn trim_timestamps(
    record: &mut Map<String, Value>,
    collection: &'static str,
    index: usize,
    repairs: &mut Vec<Repair>,
) {
    for key in ["created_at", "updated_at"] {
        let Some(Value::String(text)) = record.get_mut(key) else {
            continue;
        };
        let trimmed = text.trim();
        if trimmed.len() != text.len() {
            *text = trimmed.to_string();
            repairs.push(Repair::TimestampTrimmed { collection, index });
        }
    }
}

// Must accept exactly what the `DateTime<Utc>` decoder accepts.
fn has_timestamp(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|text| text.parse::<DateTime<Utc>>().is_ok())
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::{migrate, Repair};
    use crate::model::order::OrderStatus;
    use crate::model::seed::default_seed;
    use chrono::{Duration, NaiveDate, Utc};
    use serde_json::{json, Value};

    fn remigrate(value: Value) {
        let now = Utc::now();
        let first = migrate(value, now);
        let again = serde_json::to_value(&first.dataset).unwrap();
        let second = migrate(again, now + Duration::hours(1));
        assert!(second.repairs.is_empty(), "second pass repaired: {:?}", second.repairs);
        assert_eq!(second.dataset, first.dataset);
    }

    #[test]
    fn seed_dataset_needs_no_repair() {
        let value = serde_json::to_value(default_seed()).unwrap();
        let outcome = migrate(value, Utc::now());
        assert!(!outcome.changed());
        assert_eq!(outcome.dataset, default_seed());
    }

    #[test]
    fn non_object_root_is_rebuilt_from_defaults() {
        let outcome = migrate(json!(42), Utc::now());
        assert_eq!(outcome.repairs[0], Repair::RootReplaced);
        assert_eq!(outcome.dataset.buildings, default_seed().buildings);
        assert!(outcome.dataset.orders.is_empty());
        assert!(outcome.dataset.inventory.is_empty());
    }

    #[test]
    fn non_array_collections_are_replaced() {
        let outcome = migrate(
            json!({ "buildings": "nope", "orders": {}, "inventory": null }),
            Utc::now(),
        );
        assert!(outcome.repairs.contains(&Repair::CollectionReplaced("buildings")));
        assert!(outcome.repairs.contains(&Repair::CollectionReplaced("orders")));
        assert!(outcome.repairs.contains(&Repair::CollectionReplaced("inventory")));
        assert_eq!(outcome.dataset.buildings.len(), 4);
    }

    #[test]
    fn missing_audit_timestamps_receive_migration_time() {
        let now = Utc::now();
        let outcome = migrate(
            json!({
                "buildings": [],
                "orders": [
                    { "id": 1, "material": "Sand", "supplier": "Q", "eta": "2025-10-25", "status": "Scheduled" }
                ],
                "inventory": [ { "name": "Sand", "qty": 3, "low_threshold": 1, "created_at": "" } ]
            }),
            now,
        );
        assert_eq!(outcome.repairs.len(), 2);
        let created = outcome.dataset.orders[0].created_at;
        assert!((created - now).num_milliseconds().abs() < 1);
        assert!(outcome.dataset.inventory[0].created_at <= now);
    }

    #[test]
    fn status_invariants_are_repaired() {
        let outcome = migrate(
            json!({
                "buildings": [],
                "orders": [
                    { "id": 1, "material": "a", "supplier": "b", "eta": "2025-10-25", "status": "Delayed",
                      "created_at": "2025-10-01T00:00:00.000Z" },
                    { "id": 2, "material": "a", "supplier": "b", "eta": "2025-10-25", "status": "Delivered",
                      "created_at": "2025-10-01T00:00:00.000Z", "updated_at": "2025-10-20T09:00:00.000Z" }
                ],
                "inventory": []
            }),
            Utc::now(),
        );
        let orders = &outcome.dataset.orders;
        assert_eq!(orders[0].delay_reason.as_deref(), Some("Unspecified"));
        assert_eq!(orders[1].status, OrderStatus::Delivered);
        assert_eq!(orders[1].delivered_at, NaiveDate::from_ymd_opt(2025, 10, 20));
    }

    #[test]
    fn undecodable_and_duplicate_records_are_dropped() {
        let outcome = migrate(
            json!({
                "buildings": [ 7 ],
                "orders": [
                    { "id": 5, "material": "a", "supplier": "b", "eta": "whenever", "status": "Scheduled" },
                    { "id": 6, "material": "a", "supplier": "b", "eta": "2025-10-25", "status": "Scheduled" },
                    { "id": 6, "material": "dup", "supplier": "b", "eta": "2025-10-25", "status": "Scheduled" }
                ],
                "inventory": [ { "name": "Gravel", "qty": -4, "low_threshold": 2 } ]
            }),
            Utc::now(),
        );
        assert!(outcome.dataset.buildings.is_empty());
        assert_eq!(outcome.dataset.orders.len(), 1);
        assert_eq!(outcome.dataset.orders[0].material, "a");
        assert_eq!(outcome.dataset.inventory[0].qty, 0);
        let dropped_orders = outcome
            .repairs
            .iter()
            .filter(|repair| matches!(repair, Repair::RecordDropped { collection: "orders", .. }))
            .count();
        assert_eq!(dropped_orders, 2);
    }

    #[test]
    fn unknown_fields_and_statuses_are_preserved() {
        let outcome = migrate(
            json!({
                "schema_note": "v1",
                "buildings": [ { "id": 9, "name": "Depot", "status": "Closed", "floor": 2 } ],
                "orders": [
                    { "id": 3, "material": "a", "supplier": "b", "eta": "2025-10-25", "status": "On Hold",
                      "created_at": "2025-10-01T00:00:00.000Z", "po_number": "PO-77" }
                ],
                "inventory": []
            }),
            Utc::now(),
        );
        assert!(!outcome.changed());
        let written = serde_json::to_value(&outcome.dataset).unwrap();
        assert_eq!(written["schema_note"], "v1");
        assert_eq!(written["buildings"][0]["status"], "Closed");
        assert_eq!(written["buildings"][0]["floor"], 2);
        assert_eq!(written["orders"][0]["status"], "On Hold");
        assert_eq!(written["orders"][0]["po_number"], "PO-77");
    }

    #[test]
    fn migration_is_idempotent_across_arbitrary_shapes() {
        remigrate(json!(null));
        remigrate(json!([1, 2, 3]));
        remigrate(json!({}));
        remigrate(json!({ "orders": [ { "id": 1 } ], "inventory": "x" }));
        remigrate(json!({
            "buildings": [ { "id": 1, "name": "A", "status": "WIP" } ],
            "orders": [
                { "id": 4, "material": "a", "supplier": "b", "eta": "2025-10-25T10:00:00Z", "status": "Delivered" },
                { "id": 5, "material": "a", "supplier": "b", "eta": "2025-10-25", "status": "Delayed", "delay_reason": " ",
                  "delivered_at": "garbage" }
            ],
            "inventory": [ { "name": "Nails", "qty": 5, "low_threshold": -1 }, "junk" ]
        }));
        remigrate(serde_json::to_value(default_seed()).unwrap());
    }

    #[test]
    fn padded_timestamps_are_trimmed_instead_of_dropping_the_record() {
        let outcome = migrate(
            json!({
                "buildings": [],
                "orders": [
                    { "id": 8, "material": "Rebar", "supplier": "Steelco", "eta": "2025-10-25",
                      "status": "Scheduled", "created_at": " 2025-10-01T08:00:00.000Z ",
                      "updated_at": "2025-10-02T08:00:00.000Z\n" }
                ],
                "inventory": [
                    { "name": "Rebar", "qty": 4, "low_threshold": 2, "created_at": "\t2025-10-01T08:00:00Z" }
                ]
            }),
            Utc::now(),
        );
        assert_eq!(outcome.dataset.orders.len(), 1);
        assert_eq!(outcome.dataset.inventory.len(), 1);
        let order = &outcome.dataset.orders[0];
        assert_eq!(order.created_at.to_rfc3339(), "2025-10-01T08:00:00+00:00");
        assert!(order.updated_at.is_some());
        assert_eq!(
            outcome.dataset.inventory[0].created_at,
            order.created_at
        );
        assert!(!outcome
            .repairs
            .iter()
            .any(|repair| matches!(repair, Repair::RecordDropped { .. } | Repair::CreatedAtAssigned { .. })));
        assert_eq!(
            outcome
                .repairs
                .iter()
                .filter(|repair| matches!(repair, Repair::TimestampTrimmed { .. }))
                .count(),
            3
        );
    }
}
