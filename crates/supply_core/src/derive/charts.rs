//! Count-by-category tallies feeding the analytics charts.
//!
//! Produced regardless of whether any chart renderer is available.

use crate::model::building::BuildingStatus;
use crate::model::dataset::Dataset;
use crate::model::inventory::StockBand;
use crate::model::order::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildingTally {
    pub working: usize,
    pub wip: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StockTally {
    pub ok: usize,
    pub low: usize,
    pub reorder: usize,
}

/// Orders with an unrecognized status are not counted in any bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderTally {
    pub scheduled: usize,
    pub in_transit: usize,
    pub delayed: usize,
    pub delivered: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChartTallies {
    pub buildings: BuildingTally,
    pub inventory: StockTally,
    pub orders: OrderTally,
}

impl BuildingTally {
    /// Labelled series in chart order.
    pub fn series(&self) -> [(&'static str, usize); 2] {
        [("Working", self.working), ("WIP", self.wip)]
    }
}

impl StockTally {
    pub fn series(&self) -> [(&'static str, usize); 3] {
        [("OK", self.ok), ("Low", self.low), ("Reorder", self.reorder)]
    }
}

impl OrderTally {
    pub fn series(&self) -> [(&'static str, usize); 4] {
        [
            ("Scheduled", self.scheduled),
            ("In Transit", self.in_transit),
            ("Delayed", self.delayed),
            ("Delivered", self.delivered),
        ]
    }
}

pub fn compute_charts(dataset: &Dataset) -> ChartTallies {
    let mut tallies = ChartTallies::default();

    for building in &dataset.buildings {
        match building.status {
            BuildingStatus::Working => tallies.buildings.working += 1,
            BuildingStatus::Wip => tallies.buildings.wip += 1,
            BuildingStatus::Other(_) => {}
        }
    }

    for item in &dataset.inventory {
        match item.band() {
            StockBand::Ok => tallies.inventory.ok += 1,
            StockBand::Low => tallies.inventory.low += 1,
            StockBand::Reorder => tallies.inventory.reorder += 1,
        }
    }

    for order in &dataset.orders {
        match order.status {
            OrderStatus::Scheduled => tallies.orders.scheduled += 1,
            OrderStatus::InTransit => tallies.orders.in_transit += 1,
            OrderStatus::Delayed => tallies.orders.delayed += 1,
            OrderStatus::Delivered => tallies.orders.delivered += 1,
            OrderStatus::Other(_) => {}
        }
    }

    tallies
}

#[cfg(test)]
mod tests {
    use super::compute_charts;
    use crate::model::order::OrderStatus;
    use crate::model::seed::default_seed;

    #[test]
    fn seed_tallies() {
        let tallies = compute_charts(&default_seed());
        assert_eq!(tallies.buildings.series(), [("Working", 2), ("WIP", 2)]);
        assert_eq!(
            tallies.inventory.series(),
            [("OK", 1), ("Low", 1), ("Reorder", 1)]
        );
        assert_eq!(
            tallies.orders.series(),
            [("Scheduled", 1), ("In Transit", 1), ("Delayed", 1), ("Delivered", 0)]
        );
    }

    #[test]
    fn unknown_order_status_is_not_counted() {
        let mut dataset = default_seed();
        dataset.orders[0].status = OrderStatus::Other("Returned".to_string());
        let orders = compute_charts(&dataset).orders;
        assert_eq!(orders.in_transit, 0);
        assert_eq!(orders.scheduled + orders.delayed + orders.delivered, 2);
    }
}
