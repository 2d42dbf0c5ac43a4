//! Everything the mounted views need, derived in one pass.
//!
//! Manual refresh and the sync loop both go through [`ViewSnapshot::derive`],
//! so a polled view and an explicitly refreshed view never diverge.

use crate::derive::badge::{order_badge, stock_badge, BadgeTone};
use crate::derive::charts::{compute_charts, ChartTallies};
use crate::derive::kpi::{compute_kpis, Kpis};
use crate::derive::orders::{query_orders, SortState};
use crate::model::dataset::Dataset;
use crate::model::inventory::StockBand;
use crate::model::order::Order;

/// Filter and sort selection of the supplier view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewQuery {
    pub filter: String,
    pub sort: SortState,
}

/// One rendered order row or card.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub order: Order,
    pub badge: BadgeTone,
    /// `false` once delivered; the deliver action is disabled.
    pub can_deliver: bool,
}

impl OrderRow {
    fn from_order(order: &Order) -> Self {
        Self {
            order: order.clone(),
            badge: order_badge(&order.status),
            can_deliver: !order.status.is_terminal(),
        }
    }
}

/// One inventory card in the manager view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRow {
    pub name: String,
    pub qty: u32,
    pub low_threshold: u32,
    pub band: StockBand,
    pub badge: BadgeTone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub dataset: Dataset,
    pub kpis: Kpis,
    pub charts: ChartTallies,
    /// Dashboard cards, ascending by id.
    pub dashboard_cards: Vec<OrderRow>,
    /// Supplier table rows after filter and sort.
    pub supplier_rows: Vec<OrderRow>,
    /// Manager cards in stored order.
    pub inventory_rows: Vec<InventoryRow>,
}

impl ViewSnapshot {
    pub fn derive(dataset: Dataset, query: &ViewQuery) -> Self {
        let kpis = compute_kpis(&dataset);
        let charts = compute_charts(&dataset);
        let dashboard_cards = query_orders(&dataset.orders, "", SortState::default())
            .into_iter()
            .map(OrderRow::from_order)
            .collect();
        let supplier_rows = query_orders(&dataset.orders, &query.filter, query.sort)
            .into_iter()
            .map(OrderRow::from_order)
            .collect();
        let inventory_rows = dataset
            .inventory
            .iter()
            .map(|item| {
                let band = item.band();
                InventoryRow {
                    name: item.name.clone(),
                    qty: item.qty,
                    low_threshold: item.low_threshold,
                    band,
                    badge: stock_badge(band),
                }
            })
            .collect();

        Self {
            dataset,
            kpis,
            charts,
            dashboard_cards,
            supplier_rows,
            inventory_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ViewQuery, ViewSnapshot};
    use crate::derive::badge::BadgeTone;
    use crate::derive::orders::{SortDirection, SortKey, SortState};
    use crate::model::inventory::StockBand;
    use crate::model::seed::default_seed;

    #[test]
    fn snapshot_applies_query_only_to_supplier_rows() {
        let query = ViewQuery {
            filter: "brick".to_string(),
            sort: SortState::by(SortKey::Id, SortDirection::Descending),
        };
        let snapshot = ViewSnapshot::derive(default_seed(), &query);

        assert_eq!(snapshot.dashboard_cards.len(), 3);
        assert_eq!(snapshot.supplier_rows.len(), 1);
        assert_eq!(snapshot.supplier_rows[0].order.id, 13);
        assert_eq!(snapshot.supplier_rows[0].badge, BadgeTone::Success);
        assert_eq!(snapshot.kpis.active_orders, 3);
    }

    #[test]
    fn inventory_rows_carry_bands() {
        let snapshot = ViewSnapshot::derive(default_seed(), &ViewQuery::default());
        let bands: Vec<StockBand> = snapshot.inventory_rows.iter().map(|row| row.band).collect();
        assert_eq!(bands, vec![StockBand::Ok, StockBand::Reorder, StockBand::Low]);
    }
}
