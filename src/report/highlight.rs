//! Row highlight classification - derived per render, never stored

use crate::report::options::UiOptions;
use crate::report::parse::{parse_date, parse_range_end};
use crate::report::types::Record;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Highlight {
    /// Delivery estimate lies too far after the purchase
    NotDelivered,
    /// Shipped (or still unshipped) too long after the purchase
    DelayedShipment,
    /// Delivery estimate passed without the item being received
    NotReceived,
    Received,
}

impl Highlight {
    pub fn class_name(&self) -> &'static str {
        match self {
            Highlight::NotDelivered => "not-delivered",
            Highlight::DelayedShipment => "delayed-shipment",
            Highlight::NotReceived => "not-received",
            Highlight::Received => "received",
        }
    }

    pub fn title(&self, ui: &UiOptions) -> String {
        match self {
            Highlight::NotDelivered => {
                format!("Delivery could take {}+ days", ui.not_delivered_days)
            }
            Highlight::DelayedShipment => {
                format!("Shipped after {} days", ui.delayed_shipment_days)
            }
            Highlight::NotReceived => "Not received yet".to_string(),
            Highlight::Received => "Item received".to_string(),
        }
    }
}

/// Classify a record; later rules win over earlier ones
pub fn highlight(record: &Record, ui: &UiOptions, today: NaiveDate) -> Option<Highlight> {
    if !ui.enable_row_highlights {
        return None;
    }

    let purchased = parse_date(&record.purchase_date, today)?;

    if record.received {
        return Some(Highlight::Received);
    }

    let days_from_purchase = (today - purchased).num_days();
    let shipped_after_days = parse_date(&record.ship_status, today)
        .map(|shipped| (shipped - purchased).num_days())
        .unwrap_or(days_from_purchase);
    let delivery = parse_range_end(&record.delivery_date, today).unwrap_or(today);

    let mut result = None;

    if (delivery - purchased).num_days() > ui.not_delivered_days {
        result = Some(Highlight::NotDelivered);
    }

    if shipped_after_days > ui.delayed_shipment_days {
        result = Some(Highlight::DelayedShipment);
    }

    if (today - delivery).num_days() > 0 {
        result = Some(Highlight::NotReceived);
    }

    result
}
