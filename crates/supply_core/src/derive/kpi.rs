//! Summary counters for the dashboard.

use crate::model::dataset::Dataset;
use crate::model::order::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Kpis {
    /// Orders whose status is not `Delivered`.
    pub active_orders: usize,
    pub in_transit: usize,
    /// Items in the `Low` or `Reorder` band.
    pub low_stock: usize,
}

pub fn compute_kpis(dataset: &Dataset) -> Kpis {
    Kpis {
        active_orders: dataset.orders.iter().filter(|order| order.is_active()).count(),
        in_transit: dataset
            .orders
            .iter()
            .filter(|order| order.status == OrderStatus::InTransit)
            .count(),
        low_stock: dataset
            .inventory
            .iter()
            .filter(|item| item.band().needs_attention())
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_kpis, Kpis};
    use crate::model::seed::default_seed;

    #[test]
    fn seed_kpis() {
        assert_eq!(
            compute_kpis(&default_seed()),
            Kpis {
                active_orders: 3,
                in_transit: 1,
                low_stock: 2,
            }
        );
    }
}
