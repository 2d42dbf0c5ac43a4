//! Default seed dataset.
//!
//! The template is built once per process so every fresh copy carries the
//! same audit timestamps; callers always receive an owned clone.

use crate::model::building::{Building, BuildingStatus};
use crate::model::dataset::Dataset;
use crate::model::inventory::InventoryItem;
use crate::model::order::{Order, OrderStatus};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use serde_json::Map;

static SEED_TEMPLATE: Lazy<Dataset> = Lazy::new(|| build_seed(Utc::now()));

/// Returns a fresh, independently owned copy of the default seed.
pub fn default_seed() -> Dataset {
    SEED_TEMPLATE.clone()
}

/// Returns only the seed buildings; used when migration finds them missing.
pub fn default_buildings() -> Vec<Building> {
    SEED_TEMPLATE.buildings.clone()
}

fn build_seed(now: DateTime<Utc>) -> Dataset {
    Dataset {
        buildings: vec![
            building(1, "Site Alpha", BuildingStatus::Working),
            building(2, "Site Bravo", BuildingStatus::Wip),
            building(3, "Site Charlie", BuildingStatus::Working),
            building(4, "Site Delta", BuildingStatus::Wip),
        ],
        orders: vec![
            order(12, "Cement Bags", "BuildPro", (2025, 10, 25), OrderStatus::InTransit, None, now),
            order(13, "Bricks Pallets", "BrickWorks", (2025, 10, 27), OrderStatus::Scheduled, None, now),
            order(
                14,
                "Trusses",
                "Timber SA",
                (2025, 10, 24),
                OrderStatus::Delayed,
                Some("Supplier backlog"),
                now,
            ),
        ],
        inventory: vec![
            item("Cement Bags", 80, 30, now),
            item("Bricks", 0, 50, now),
            item("Paint (20L)", 14, 20, now),
        ],
        extra: Map::new(),
    }
}

fn building(id: u64, name: &str, status: BuildingStatus) -> Building {
    Building {
        id,
        name: name.to_string(),
        status,
        extra: Map::new(),
    }
}

fn order(
    id: u64,
    material: &str,
    supplier: &str,
    (year, month, day): (i32, u32, u32),
    status: OrderStatus,
    delay_reason: Option<&str>,
    now: DateTime<Utc>,
) -> Order {
    Order {
        id,
        material: material.to_string(),
        supplier: supplier.to_string(),
        eta: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        status,
        delay_reason: delay_reason.map(str::to_string),
        created_at: now,
        updated_at: None,
        delivered_at: None,
        extra: Map::new(),
    }
}

fn item(name: &str, qty: u32, low_threshold: u32, now: DateTime<Utc>) -> InventoryItem {
    InventoryItem {
        name: name.to_string(),
        qty,
        low_threshold,
        created_at: now,
        updated_at: None,
        extra: Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::default_seed;

    #[test]
    fn seed_copies_are_equal_and_independent() {
        let mut first = default_seed();
        let second = default_seed();
        assert_eq!(first, second);

        first.orders.clear();
        first.inventory[0].qty = 1;
        assert_eq!(second.orders.len(), 3);
        assert_eq!(default_seed().inventory[0].qty, 80);
    }
}
