//! Group records into subtotal runs
//!
//! Records arrive already filtered and sorted. A single forward pass starts a
//! new group whenever the group key changes from the previous record:
//! - sorted by nothing or by a date column: the purchase date text changed
//! - sorted by seller: the seller name changed
//! - always: the currency code changed
//!
//! Every group gets a SUBTOTAL. A GRAND TOTAL is produced only when the whole
//! set uses exactly one currency code.

use crate::report::options::SortField;
use crate::report::parse::is_shipped;
use crate::report::types::{Group, Record, Report, Subtotal, TotalLabel};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Running totals of one group (or of the whole report)
#[derive(Debug, Default, Clone)]
struct Totals {
    value: Decimal,
    items: usize,
    shipped: usize,
}

impl Totals {
    fn add(&mut self, record: &Record, shipped: bool) {
        // Unparseable or overflowing amounts stay out of the sum but still count as items
        if let Some(amount) = record.price.amount {
            match self.value.checked_add(amount) {
                Some(sum) => self.value = sum,
                None => warn!(
                    "Total overflowed adding {:?} for order {:?}, amount left out",
                    record.price.text, record.order_id
                ),
            }
        }
        self.items += 1;
        if shipped {
            self.shipped += 1;
        }
    }

    fn to_subtotal(&self, label: TotalLabel, currency: &str) -> Subtotal {
        Subtotal {
            label,
            total_value: self.value,
            currency: currency.to_string(),
            item_count: self.items,
            shipped_count: self.shipped,
        }
    }
}

/// Streaming group-by over a pre-sorted record sequence
pub struct GroupBuilder {
    sort_field: SortField,
    enable_grouping: bool,
    today: NaiveDate,
    groups: Vec<Group>,
    current: Vec<Record>,
    current_totals: Totals,
    grand_totals: Totals,
    currencies: BTreeSet<String>,
}

impl GroupBuilder {
    pub fn new(sort_field: SortField, enable_grouping: bool, today: NaiveDate) -> Self {
        Self {
            sort_field,
            enable_grouping,
            today,
            groups: Vec::new(),
            current: Vec::new(),
            current_totals: Totals::default(),
            grand_totals: Totals::default(),
            currencies: BTreeSet::new(),
        }
    }

    /// True when `next` must start a new group after `prev`
    fn is_boundary(&self, prev: &Record, next: &Record) -> bool {
        if prev.price.currency_code != next.price.currency_code {
            return true;
        }

        match self.sort_field {
            SortField::Seller => prev.seller.name != next.seller.name,
            field if field == SortField::None || field.is_date() => {
                prev.purchase_date != next.purchase_date
            }
            _ => false,
        }
    }

    pub fn push(&mut self, record: Record) {
        let boundary = self
            .current
            .last()
            .map(|prev| self.enable_grouping && self.is_boundary(prev, &record))
            .unwrap_or(false);

        if boundary {
            self.close_group();
        }

        let shipped = is_shipped(&record.ship_status, self.today);
        self.current_totals.add(&record, shipped);
        self.grand_totals.add(&record, shipped);
        self.currencies.insert(record.price.currency_code.clone());
        self.current.push(record);
    }

    fn close_group(&mut self) {
        if self.current.is_empty() {
            return;
        }

        let records = std::mem::take(&mut self.current);
        let totals = std::mem::take(&mut self.current_totals);

        let subtotal = if self.enable_grouping {
            let currency = records[0].price.currency_code.as_str();
            let subtotal = totals.to_subtotal(TotalLabel::Subtotal, currency);
            debug!("Closed group: {}", subtotal);
            Some(subtotal)
        } else {
            None
        };

        self.groups.push(Group { records, subtotal });
    }

    pub fn finish(mut self) -> Report {
        self.close_group();

        let grand_total = if self.currencies.len() == 1 {
            self.currencies
                .iter()
                .next()
                .map(|currency| self.grand_totals.to_subtotal(TotalLabel::GrandTotal, currency))
        } else {
            if self.currencies.len() > 1 {
                info!(
                    "No grand total: {} currencies in report ({:?})",
                    self.currencies.len(),
                    self.currencies
                );
            }
            None
        };

        Report {
            groups: self.groups,
            grand_total,
        }
    }
}

/// Group already sorted and filtered records
pub fn group_records(
    records: Vec<Record>,
    sort_field: SortField,
    enable_grouping: bool,
    today: NaiveDate,
) -> Report {
    let count = records.len();
    let mut builder = GroupBuilder::new(sort_field, enable_grouping, today);

    for record in records {
        builder.push(record);
    }

    let report = builder.finish();
    info!("Grouped {} records into {} groups", count, report.groups.len());

    report
}
