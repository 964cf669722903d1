//! Sort records by a report column
//! Keys are typed per column so the order is total: unparseable values sort lowest.

use crate::report::options::SortField;
use crate::report::parse::parse_range_end;
use crate::report::types::Record;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(Decimal),
    Date(Option<NaiveDate>),
    Text(String),
}

fn sort_key(record: &Record, field: SortField, today: NaiveDate) -> SortKey {
    match field {
        SortField::Price => SortKey::Number(record.price.amount.unwrap_or(Decimal::ZERO)),
        SortField::ElapsedDays => SortKey::Number(Decimal::from(record.elapsed_days.unwrap_or(0))),
        SortField::EtaDays => SortKey::Number(Decimal::from(record.eta_days.unwrap_or(0))),
        SortField::Quantity => SortKey::Number(Decimal::from(record.quantity)),
        SortField::ItemIndex => SortKey::Number(Decimal::from(record.item_index)),
        SortField::PurchaseDate => SortKey::Date(parse_range_end(&record.purchase_date, today)),
        SortField::DeliveryDate => SortKey::Date(parse_range_end(&record.delivery_date, today)),
        SortField::ShipStatus => SortKey::Date(parse_range_end(&record.ship_status, today)),
        SortField::Seller => SortKey::Text(record.seller.name.clone()),
        SortField::OrderId => SortKey::Text(record.order_id.clone()),
        SortField::Specs => SortKey::Text(record.specs.clone()),
        SortField::None => SortKey::Number(Decimal::ZERO),
    }
}

/// Stable sort by `field`; `SortField::None` keeps page order
pub fn sort_records(
    records: Vec<Record>,
    field: SortField,
    reverse: bool,
    today: NaiveDate,
) -> Vec<Record> {
    if field == SortField::None {
        return records;
    }

    debug!("Sorting {} records by {} (reverse: {})", records.len(), field, reverse);

    let mut keyed: Vec<(SortKey, Record)> = records
        .into_iter()
        .map(|r| (sort_key(&r, field, today), r))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare(a, b, reverse));

    keyed.into_iter().map(|(_, r)| r).collect()
}

fn compare(a: &SortKey, b: &SortKey, reverse: bool) -> Ordering {
    if reverse {
        b.cmp(a)
    } else {
        a.cmp(b)
    }
}
