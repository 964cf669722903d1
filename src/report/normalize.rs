//! Normalize functions - transform scraped items into Record structs

use crate::report::parse::{
    date_diff, parse_date, parse_price, parse_quantity, parse_range_end, ship_status_digits,
};
use crate::report::types::{RawItem, Record, Seller, Tracking};
use crate::report::utils::clean_tracking_number;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{info, warn};

/// Warnings about degraded fields are only logged for the first few records
const MAX_LOGGED_WARNINGS: usize = 10;

/// Normalize every scraped item, numbering items within their order
pub fn normalize_all(items: Vec<RawItem>, today: NaiveDate) -> Vec<Record> {
    info!("Normalizing {} scraped items", items.len());

    let mut next_index: HashMap<String, u32> = HashMap::new();
    let mut records = Vec::with_capacity(items.len());
    let mut degraded = 0;

    for (idx, item) in items.into_iter().enumerate() {
        let order_id = item.order_id.clone().unwrap_or_default();
        let counter = next_index.entry(order_id).or_insert(0);
        *counter += 1;

        let record = normalize_item(item, *counter, today);

        if record.price.amount.is_none() || record.elapsed_days.is_none() {
            degraded += 1;
            if degraded <= MAX_LOGGED_WARNINGS {
                warn!(
                    "Item {} of order {:?} has an unparseable price {:?} or purchase date {:?}",
                    idx, record.order_id, record.price.text, record.purchase_date
                );
            }
        }

        records.push(record);
    }

    info!(
        "Normalized {} records ({} with degraded fields)",
        records.len(),
        degraded
    );

    records
}

/// Map one scraped item to a Record. Never fails: missing fragments get defaults.
pub fn normalize_item(item: RawItem, item_index: u32, today: NaiveDate) -> Record {
    let purchase_date = item.purchase_date.unwrap_or_default().trim().to_string();
    let delivery_date = item.delivery_date.unwrap_or_default().trim().to_string();

    let elapsed_days = parse_date(&purchase_date, today).map(|d| date_diff(d, 1, today));
    let eta_days = parse_range_end(&delivery_date, today).map(|d| date_diff(d, -1, today));

    let price = parse_price(item.price.as_deref().unwrap_or("0"));
    let quantity = parse_quantity(item.quantity.as_deref().unwrap_or("1"));
    let ship_status = ship_status_digits(item.ship_status.as_deref().unwrap_or(""));

    let tracking = Tracking {
        number: clean_tracking_number(
            item.tracking_text.as_deref().unwrap_or(""),
            item.tracking_title.as_deref().unwrap_or(""),
        ),
        url: item.tracking_url.unwrap_or_default(),
    };

    Record {
        order_id: item.order_id.unwrap_or_default(),
        item_index,
        seller: Seller {
            name: item.seller_name.unwrap_or_default().trim().to_string(),
            url: item.seller_url.unwrap_or_default(),
        },
        purchase_date,
        elapsed_days,
        price,
        quantity,
        specs: item.specs.unwrap_or_default().trim().to_string(),
        delivery_date,
        eta_days,
        ship_status,
        tracking,
        received: !item.feedback_not_left,
        thumbnail: item.thumbnail.unwrap_or_default(),
    }
}
