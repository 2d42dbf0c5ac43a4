//! Plain-text rendering of view snapshots.

use std::fmt::Write;
use supply_core::{OrderRow, ViewSnapshot};

/// KPI line shown after every mutation and on every watch tick.
pub fn summary(snapshot: &ViewSnapshot) -> String {
    format!(
        "active orders: {}  in transit: {}  low stock: {}\n",
        snapshot.kpis.active_orders, snapshot.kpis.in_transit, snapshot.kpis.low_stock
    )
}

/// Dashboard, supplier table, inventory cards and chart tallies.
pub fn full(snapshot: &ViewSnapshot) -> String {
    let mut out = String::new();
    out.push_str("== Dashboard\n");
    out.push_str(&summary(snapshot));
    for row in &snapshot.dashboard_cards {
        out.push_str(&card(row));
    }

    out.push_str("\n== Supplier orders\n");
    for row in &snapshot.supplier_rows {
        let order = &row.order;
        let _ = writeln!(
            out,
            "{:>5}  {:<20} {:<16} {}  [{}:{}]{}",
            order.id,
            order.material,
            order.supplier,
            order.eta.format("%d %b"),
            row.badge.as_str(),
            order.status,
            if row.can_deliver { "" } else { " (delivered)" }
        );
    }

    out.push_str("\n== Inventory\n");
    for row in &snapshot.inventory_rows {
        let _ = writeln!(
            out,
            "{:<20} {:>6}  [{}:{}]",
            row.name,
            row.qty,
            row.badge.as_str(),
            row.band
        );
    }

    out.push_str("\n== Reports\n");
    let charts = &snapshot.charts;
    let _ = writeln!(out, "sites      {}", series(&charts.buildings.series()));
    let _ = writeln!(out, "inventory  {}", series(&charts.inventory.series()));
    let _ = writeln!(out, "orders     {}", series(&charts.orders.series()));
    out
}

fn card(row: &OrderRow) -> String {
    let order = &row.order;
    let mut text = format!(
        "  Order #{} - {} | {} | ETA {} | {}\n",
        order.id,
        order.material,
        order.supplier,
        order.eta.format("%d %b"),
        order.status
    );
    if let Some(reason) = &order.delay_reason {
        let _ = writeln!(text, "    Reason: {reason}");
    }
    text
}

fn series(values: &[(&'static str, usize)]) -> String {
    values
        .iter()
        .map(|(label, count)| format!("{label}={count}"))
        .collect::<Vec<_>>()
        .join(" ")
}
