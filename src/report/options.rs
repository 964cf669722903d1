//! Report options - explicit configuration handed to the pipeline

use crate::error::ReportError;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Column a report can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Page order
    #[default]
    None,
    OrderId,
    ItemIndex,
    Seller,
    PurchaseDate,
    ElapsedDays,
    Price,
    Quantity,
    ShipStatus,
    DeliveryDate,
    EtaDays,
    Specs,
}

impl SortField {
    pub fn name(&self) -> &'static str {
        match self {
            SortField::None => "",
            SortField::OrderId => "orderId",
            SortField::ItemIndex => "itemIndex",
            SortField::Seller => "seller",
            SortField::PurchaseDate => "purchaseDate",
            SortField::ElapsedDays => "elapsedDays",
            SortField::Price => "price",
            SortField::Quantity => "quantity",
            SortField::ShipStatus => "shipStatus",
            SortField::DeliveryDate => "deliveryDate",
            SortField::EtaDays => "etaDays",
            SortField::Specs => "specs",
        }
    }

    /// Fields whose text is compared as a date
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            SortField::PurchaseDate | SortField::ShipStatus | SortField::DeliveryDate
        )
    }
}

impl FromStr for SortField {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s.trim() {
            "" => SortField::None,
            "orderId" => SortField::OrderId,
            "itemIndex" => SortField::ItemIndex,
            "seller" => SortField::Seller,
            "purchaseDate" => SortField::PurchaseDate,
            "elapsedDays" => SortField::ElapsedDays,
            "price" => SortField::Price,
            "quantity" => SortField::Quantity,
            "shipStatus" => SortField::ShipStatus,
            "deliveryDate" => SortField::DeliveryDate,
            "etaDays" => SortField::EtaDays,
            "specs" => SortField::Specs,
            other => return Err(ReportError::UnknownSortField(other.to_string())),
        };
        Ok(field)
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Row filter applied before sorting and grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterMode {
    #[default]
    All,
    NotShipped,
}

impl FilterMode {
    /// Unknown modes mean "no filter"
    pub fn parse(mode: &str) -> Self {
        match mode.trim() {
            "notShipped" => FilterMode::NotShipped,
            "" => FilterMode::All,
            other => {
                warn!("Unknown filter mode {:?}, showing all items", other);
                FilterMode::All
            }
        }
    }
}

/// Options for one pipeline pass
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub sort_field: SortField,
    pub reverse_order: bool,
    pub filter_mode: FilterMode,
    pub enable_grouping: bool,
    /// Reference date for year inference, elapsed days and ETA
    pub today: NaiveDate,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            sort_field: SortField::None,
            reverse_order: false,
            filter_mode: FilterMode::All,
            enable_grouping: true,
            today: Local::now().date_naive(),
        }
    }
}

/// Presentation settings, stored by the user as a JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiOptions {
    pub enable_row_highlights: bool,
    pub enable_grouping: bool,
    /// Unshipped this many days after purchase counts as delayed
    pub delayed_shipment_days: i64,
    /// Delivery estimate this many days after purchase counts as late
    pub not_delivered_days: i64,
    /// "tab", "comma", "semicolon" or a single character
    pub csv_separator: String,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            enable_row_highlights: true,
            enable_grouping: true,
            delayed_shipment_days: 5,
            not_delivered_days: 40,
            csv_separator: "tab".to_string(),
        }
    }
}

impl UiOptions {
    /// Parse stored options; anything unreadable falls back to the defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(options) => options,
            Err(e) => {
                warn!("Invalid UI options ({}), using defaults", e);
                UiOptions::default()
            }
        }
    }

    pub fn separator(&self) -> u8 {
        match self.csv_separator.as_str() {
            "tab" | "" => b'\t',
            "comma" => b',',
            "semicolon" => b';',
            other => match other.as_bytes() {
                [single] => *single,
                _ => {
                    warn!("Unsupported CSV separator {:?}, using tab", other);
                    b'\t'
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_field_from_str() {
        assert_eq!("".parse::<SortField>().unwrap(), SortField::None);
        assert_eq!("price".parse::<SortField>().unwrap(), SortField::Price);
        assert_eq!(
            "deliveryDate".parse::<SortField>().unwrap(),
            SortField::DeliveryDate
        );
        assert!(matches!(
            "colour".parse::<SortField>(),
            Err(ReportError::UnknownSortField(name)) if name == "colour"
        ));
    }

    #[test]
    fn test_sort_field_name_roundtrip() {
        for field in [SortField::Seller, SortField::EtaDays, SortField::Specs] {
            assert_eq!(field.name().parse::<SortField>().unwrap(), field);
        }
    }

    #[test]
    fn test_filter_mode_parse() {
        assert_eq!(FilterMode::parse("notShipped"), FilterMode::NotShipped);
        assert_eq!(FilterMode::parse(""), FilterMode::All);
        assert_eq!(FilterMode::parse("somethingElse"), FilterMode::All);
    }

    #[test]
    fn test_ui_options_partial_json() {
        let options = UiOptions::from_json(r#"{"delayedShipmentDays": 7, "csvSeparator": "comma"}"#);

        assert_eq!(options.delayed_shipment_days, 7);
        assert_eq!(options.not_delivered_days, 40);
        assert_eq!(options.separator(), b',');
        assert!(options.enable_grouping);
    }

    #[test]
    fn test_ui_options_invalid_json() {
        let options = UiOptions::from_json("not json");
        assert_eq!(options, UiOptions::default());
        assert_eq!(options.separator(), b'\t');
    }

    #[test]
    fn test_single_char_separator() {
        let options = UiOptions {
            csv_separator: "|".to_string(),
            ..UiOptions::default()
        };
        assert_eq!(options.separator(), b'|');

        let semicolon = UiOptions {
            csv_separator: "semicolon".to_string(),
            ..UiOptions::default()
        };
        assert_eq!(semicolon.separator(), b';');

        let too_long = UiOptions {
            csv_separator: "ab".to_string(),
            ..UiOptions::default()
        };
        assert_eq!(too_long.separator(), b'\t');
    }
}
