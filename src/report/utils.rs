//! Utility functions for common operations

use crate::average_per_item;
use crate::report::types::Subtotal;
use chrono::NaiveDate;

/// Tracking number from the link text: the link title is removed, as is all
/// whitespace ("Tracking number LX 1234 CN" -> "LX1234CN")
pub fn clean_tracking_number(text: &str, title: &str) -> String {
    let text = if title.is_empty() {
        text.to_string()
    } else {
        text.replace(title, "")
    };

    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Download name for an export, e.g. "purchase-history-20240320.csv"
pub fn export_file_name(extension: &str, today: NaiveDate) -> String {
    format!("purchase-history-{}.{}", today.format("%Y%m%d"), extension)
}

/// Footer text of a subtotal line
pub fn format_subtotal(subtotal: &Subtotal) -> String {
    let currency = &subtotal.currency;
    let average = average_per_item(subtotal.total_value, subtotal.item_count)
        .map(|avg| format!("{:.2}", avg))
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{:.2} {}, {} shipped, {} not-shipped ({} items, ~ {} {}/item)",
        subtotal.total_value,
        currency,
        subtotal.shipped_count,
        subtotal.not_shipped_count(),
        subtotal.item_count,
        average,
        currency
    )
}
