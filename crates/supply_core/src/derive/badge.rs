//! Presentation categories for status badges.
//!
//! Total over every input: unrecognized statuses fall back to `Neutral`.

use crate::model::inventory::StockBand;
use crate::model::order::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeTone {
    Success,
    Warning,
    Danger,
    /// Finished, no longer needs attention.
    Muted,
    Neutral,
}

impl BadgeTone {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
            Self::Muted => "muted",
            Self::Neutral => "neutral",
        }
    }
}

pub fn order_badge(status: &OrderStatus) -> BadgeTone {
    match status {
        OrderStatus::Scheduled => BadgeTone::Success,
        OrderStatus::InTransit => BadgeTone::Warning,
        OrderStatus::Delayed => BadgeTone::Danger,
        OrderStatus::Delivered => BadgeTone::Muted,
        OrderStatus::Other(_) => BadgeTone::Neutral,
    }
}

pub fn stock_badge(band: StockBand) -> BadgeTone {
    match band {
        StockBand::Ok => BadgeTone::Success,
        StockBand::Low => BadgeTone::Warning,
        StockBand::Reorder => BadgeTone::Danger,
    }
}
