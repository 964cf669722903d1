//! Core data types for the report pipeline
//! Pure data structures with no behavior

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One scraped purchase-history line item, exactly as the page showed it.
/// Every field is optional because the matching page fragment may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawItem {
    pub order_id: Option<String>,
    pub seller_name: Option<String>,
    pub seller_url: Option<String>,
    pub purchase_date: Option<String>,
    pub price: Option<String>,
    pub specs: Option<String>,
    pub delivery_date: Option<String>,
    pub ship_status: Option<String>,
    pub quantity: Option<String>,
    pub tracking_text: Option<String>,
    /// Link title that the page renders inside the tracking text
    pub tracking_title: Option<String>,
    pub tracking_url: Option<String>,
    /// True when the "leave feedback" marker is present on the item
    pub feedback_not_left: bool,
    pub thumbnail: Option<String>,
}

/// A filter label/value pair shown above the purchase history list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFilter {
    pub label: String,
    pub content: String,
}

/// Everything scraped from one page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapedPage {
    pub orders: Vec<RawItem>,
    pub filters: Vec<PageFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Seller {
    pub name: String,
    pub url: String,
}

/// Price as displayed plus its parsed parts.
/// `amount` is `None` when the text holds no number; such rows stay out of totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub text: String,
    pub amount: Option<Decimal>,
    pub currency_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tracking {
    pub number: String,
    pub url: String,
}

/// Canonical purchase-history record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    // Identity
    pub order_id: String,
    pub item_index: u32, // 1-based within order_id

    pub seller: Seller,

    // Purchase
    pub purchase_date: String,
    pub elapsed_days: Option<i64>,
    pub price: Price,
    pub quantity: u32,
    pub specs: String,

    // Shipment
    pub delivery_date: String,
    pub eta_days: Option<i64>,
    pub ship_status: String, // date-like digit run, empty when not shipped
    pub tracking: Tracking,
    pub received: bool,

    pub thumbnail: String,
}

/// Label of an aggregate line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TotalLabel {
    Subtotal,
    GrandTotal,
}

impl std::fmt::Display for TotalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TotalLabel::Subtotal => write!(f, "SUBTOTAL"),
            TotalLabel::GrandTotal => write!(f, "GRAND TOTAL"),
        }
    }
}

/// Accumulated value of a run of records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtotal {
    pub label: TotalLabel,
    pub total_value: Decimal,
    pub currency: String,
    pub item_count: usize,
    pub shipped_count: usize,
}

impl Subtotal {
    pub fn not_shipped_count(&self) -> usize {
        self.item_count.saturating_sub(self.shipped_count)
    }
}

impl std::fmt::Display for Subtotal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::report::utils::format_subtotal(self))
    }
}

/// Contiguous run of records sharing a group key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub records: Vec<Record>,
    /// `None` when grouping is switched off
    pub subtotal: Option<Subtotal>,
}

/// Output of one pipeline pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub groups: Vec<Group>,
    /// Present only when exactly one currency appears in the report
    pub grand_total: Option<Subtotal>,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.records.is_empty())
    }

    /// Records in report order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.groups.iter().flat_map(|g| g.records.iter())
    }
}
