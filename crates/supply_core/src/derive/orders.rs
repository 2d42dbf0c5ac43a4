//! Supplier order list filtering and sorting.
//!
//! # Invariants
//! - Filtering is a case-insensitive substring match over id, material,
//!   supplier and status label; an empty filter matches everything.
//! - Sorting is stable. Date keys compare by calendar value, numeric-looking
//!   text compares numerically, other text compares case-sensitively.
//! - Without an explicit key, rows are ascending by id.

use crate::model::order::Order;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid numeric regex"));

/// Column an order list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Id,
    Material,
    Supplier,
    Eta,
    Status,
    DelayReason,
    CreatedAt,
    UpdatedAt,
    DeliveredAt,
}

impl SortKey {
    /// Maps a persisted field name (`"eta"`, `"delay_reason"`, ...) to a key.
    pub fn from_field(field: &str) -> Option<Self> {
        match field.trim() {
            "id" => Some(Self::Id),
            "material" => Some(Self::Material),
            "supplier" => Some(Self::Supplier),
            "eta" => Some(Self::Eta),
            "status" => Some(Self::Status),
            "delay_reason" => Some(Self::DelayReason),
            "created_at" => Some(Self::CreatedAt),
            "updated_at" => Some(Self::UpdatedAt),
            "delivered_at" => Some(Self::DeliveredAt),
            _ => None,
        }
    }

    pub fn field(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Material => "material",
            Self::Supplier => "supplier",
            Self::Eta => "eta",
            Self::Status => "status",
            Self::DelayReason => "delay_reason",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::DeliveredAt => "delivered_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Column sort selection held by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Reselecting the active key flips direction; a new key starts ascending.
    pub fn select(&mut self, key: SortKey) {
        if self.key == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Returns whether `order` matches a free-text filter.
pub fn matches_filter(order: &Order, filter: &str) -> bool {
    let term = filter.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    order.id.to_string().contains(&term)
        || order.material.to_lowercase().contains(&term)
        || order.supplier.to_lowercase().contains(&term)
        || order.status.as_str().to_lowercase().contains(&term)
}

/// Borrows the orders matching `filter`, in stored order.
pub fn filter_orders<'a>(orders: &'a [Order], filter: &str) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|order| matches_filter(order, filter))
        .collect()
}

/// Ascending comparison of two orders on one key.
pub fn compare_orders(a: &Order, b: &Order, key: SortKey) -> Ordering {
    match key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::Eta => a.eta.cmp(&b.eta),
        SortKey::DeliveredAt => a.delivered_at.cmp(&b.delivered_at),
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortKey::Material => compare_text(&a.material, &b.material),
        SortKey::Supplier => compare_text(&a.supplier, &b.supplier),
        SortKey::Status => compare_text(a.status.as_str(), b.status.as_str()),
        SortKey::DelayReason => compare_text(
            a.delay_reason.as_deref().unwrap_or_default(),
            b.delay_reason.as_deref().unwrap_or_default(),
        ),
    }
}

/// Stable in-place sort of borrowed rows.
pub fn sort_orders(rows: &mut [&Order], sort: SortState) {
    match sort.key {
        Some(key) => rows.sort_by(|a, b| sort.direction.apply(compare_orders(a, b, key))),
        None => rows.sort_by_key(|order| order.id),
    }
}

/// Filters then sorts; the supplier view's row list.
pub fn query_orders<'a>(orders: &'a [Order], filter: &str, sort: SortState) -> Vec<&'a Order> {
    let mut rows = filter_orders(orders, filter);
    sort_orders(&mut rows, sort);
    rows
}

fn compare_text(a: &str, b: &str) -> Ordering {
    if NUMERIC_RE.is_match(a) && NUMERIC_RE.is_match(b) {
        compare_digits(a, b)
    } else {
        a.cmp(b)
    }
}

// Digit strings of any length: strip leading zeros, then longer is larger.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::{compare_digits, query_orders, SortDirection, SortKey, SortState};
    use crate::model::order::Order;
    use crate::model::seed::default_seed;
    use std::cmp::Ordering;

    fn ids(rows: &[&Order]) -> Vec<u64> {
        rows.iter().map(|order| order.id).collect()
    }

    #[test]
    fn select_toggles_then_resets_direction() {
        let mut sort = SortState::default();
        sort.select(SortKey::Eta);
        assert_eq!(sort, SortState::by(SortKey::Eta, SortDirection::Ascending));
        sort.select(SortKey::Eta);
        assert_eq!(sort.direction, SortDirection::Descending);
        sort.select(SortKey::Supplier);
        assert_eq!(sort, SortState::by(SortKey::Supplier, SortDirection::Ascending));
    }

    #[test]
    fn default_sort_is_ascending_id() {
        let mut dataset = default_seed();
        dataset.orders.reverse();
        let rows = query_orders(&dataset.orders, "", SortState::default());
        assert_eq!(ids(&rows), vec![12, 13, 14]);
    }

    #[test]
    fn eta_sort_uses_calendar_order_both_ways() {
        let dataset = default_seed();
        let asc = query_orders(
            &dataset.orders,
            "",
            SortState::by(SortKey::Eta, SortDirection::Ascending),
        );
        assert_eq!(ids(&asc), vec![14, 12, 13]);
        let desc = query_orders(
            &dataset.orders,
            "",
            SortState::by(SortKey::Eta, SortDirection::Descending),
        );
        assert_eq!(ids(&desc), vec![13, 12, 14]);
    }

    #[test]
    fn filter_is_case_insensitive_across_fields() {
        let dataset = default_seed();
        let none = SortState::default();
        assert_eq!(ids(&query_orders(&dataset.orders, "TIMBER", none)), vec![14]);
        assert_eq!(ids(&query_orders(&dataset.orders, "in transit", none)), vec![12]);
        assert_eq!(ids(&query_orders(&dataset.orders, "13", none)), vec![13]);
        assert_eq!(ids(&query_orders(&dataset.orders, "  ", none)).len(), 3);
        assert!(query_orders(&dataset.orders, "zinc", none).is_empty());
        assert_eq!(dataset.orders.len(), 3);
    }

    #[test]
    fn numeric_text_compares_numerically_and_text_is_case_sensitive() {
        let mut dataset = default_seed();
        dataset.orders[0].material = "100".to_string();
        dataset.orders[1].material = "9".to_string();
        dataset.orders[2].material = "20".to_string();
        let rows = query_orders(
            &dataset.orders,
            "",
            SortState::by(SortKey::Material, SortDirection::Ascending),
        );
        assert_eq!(ids(&rows), vec![13, 14, 12]);

        dataset.orders[0].material = "beams".to_string();
        dataset.orders[1].material = "Anchors".to_string();
        dataset.orders[2].material = "Zinc".to_string();
        let rows = query_orders(
            &dataset.orders,
            "",
            SortState::by(SortKey::Material, SortDirection::Ascending),
        );
        assert_eq!(ids(&rows), vec![13, 14, 12]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut dataset = default_seed();
        for order in &mut dataset.orders {
            order.supplier = "Same".to_string();
        }
        let rows = query_orders(
            &dataset.orders,
            "",
            SortState::by(SortKey::Supplier, SortDirection::Descending),
        );
        assert_eq!(ids(&rows), vec![12, 13, 14]);
    }

    #[test]
    fn only_ascii_digits_count_as_numeric() {
        let mut dataset = default_seed();
        dataset.orders[0].material = "\u{663}".to_string();
        dataset.orders[1].material = "100".to_string();
        dataset.orders[2].material = "9".to_string();
        let rows = query_orders(
            &dataset.orders,
            "",
            SortState::by(SortKey::Material, SortDirection::Ascending),
        );
        // U+0663 is text, so it sorts after every ASCII digit string.
        assert_eq!(ids(&rows), vec![14, 13, 12]);
    }

    #[test]
    fn digit_comparison_handles_long_values() {
        assert_eq!(compare_digits("007", "7"), Ordering::Equal);
        assert_eq!(
            compare_digits("123456789012345678901234567890", "99"),
            Ordering::Greater
        );
    }
}
