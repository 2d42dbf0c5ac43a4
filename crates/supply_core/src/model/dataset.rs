//! Root aggregate persisted as one blob.

use crate::model::building::Building;
use crate::model::inventory::InventoryItem;
use crate::model::order::{Order, OrderId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Names of the three required top-level collections.
pub const COLLECTION_KEYS: [&str; 3] = ["buildings", "orders", "inventory"];

/// The single root aggregate of buildings, orders and inventory.
///
/// Replaced wholesale on reset and import; never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub buildings: Vec<Building>,
    pub orders: Vec<Order>,
    pub inventory: Vec<InventoryItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dataset {
    /// Next order id: `max(existing) + 1`, or `1` when there are no orders.
    /// `None` once the largest id is `OrderId::MAX`.
    pub fn next_order_id(&self) -> Option<OrderId> {
        match self.orders.iter().map(|order| order.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }

    pub fn order_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        self.orders.iter_mut().find(|order| order.id == id)
    }

    pub fn item(&self, name: &str) -> Option<&InventoryItem> {
        self.inventory.iter().find(|item| item.name == name)
    }

    pub fn item_mut(&mut self, name: &str) -> Option<&mut InventoryItem> {
        self.inventory.iter_mut().find(|item| item.name == name)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::seed::default_seed;

    #[test]
    fn next_order_id_follows_the_maximum() {
        let mut dataset = default_seed();
        assert_eq!(dataset.next_order_id(), Some(15));

        dataset.orders.retain(|order| order.id != 13);
        assert_eq!(dataset.next_order_id(), Some(15));

        dataset.orders.clear();
        assert_eq!(dataset.next_order_id(), Some(1));
    }

    #[test]
    fn next_order_id_is_none_past_the_largest_id() {
        let mut dataset = default_seed();
        dataset.orders[2].id = u64::MAX;
        assert_eq!(dataset.next_order_id(), None);
    }

    #[test]
    fn unknown_top_level_fields_survive_serialization() {
        let mut value = serde_json::to_value(default_seed()).unwrap();
        value["theme"] = serde_json::json!({ "accent": "amber" });

        let dataset: super::Dataset = serde_json::from_value(value).unwrap();
        assert_eq!(
            dataset.extra.get("theme"),
            Some(&serde_json::json!({ "accent": "amber" }))
        );

        let written = serde_json::to_value(&dataset).unwrap();
        assert_eq!(written["theme"]["accent"], "amber");
    }
}
