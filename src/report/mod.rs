//! Purchase history report - functional pipeline over scraped order items
//!
//! raw items -> normalize -> filter -> sort -> group -> report

pub mod export;
pub mod filter;
pub mod group;
pub mod highlight;
pub mod normalize;
pub mod options;
pub mod parse;
pub mod sort;
pub mod types;
pub mod utils;

pub use options::*;
pub use types::*;

use tracing::info;

/// Run the whole pipeline over one scrape. Malformed text never fails the
/// pass; it only degrades the affected fields.
pub fn build_report(items: Vec<RawItem>, options: &ReportOptions) -> Report {
    info!(
        "Building report for {} items (sort: {:?}, reverse: {}, filter: {:?})",
        items.len(),
        options.sort_field.name(),
        options.reverse_order,
        options.filter_mode
    );

    let records = normalize::normalize_all(items, options.today);
    let records = filter::apply_filter(records, options.filter_mode, options.today);
    let records = sort::sort_records(
        records,
        options.sort_field,
        options.reverse_order,
        options.today,
    );

    group::group_records(
        records,
        options.sort_field,
        options.enable_grouping,
        options.today,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn options() -> ReportOptions {
        ReportOptions {
            today: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            ..ReportOptions::default()
        }
    }

    fn mock_item(order_id: &str, price: &str, purchase_date: &str, ship_status: &str) -> RawItem {
        RawItem {
            order_id: Some(order_id.to_string()),
            seller_name: Some("gadget-store".to_string()),
            purchase_date: Some(purchase_date.to_string()),
            price: Some(price.to_string()),
            ship_status: Some(ship_status.to_string()),
            feedback_not_left: true,
            ..RawItem::default()
        }
    }

    fn mock_items() -> Vec<RawItem> {
        vec![
            mock_item("100", "USD 10.00", "Mar 1, 2024", "Shipped on 03/02/2024"),
            mock_item("100", "USD 20.00", "Mar 1, 2024", "Not yet shipped"),
            mock_item("200", "EUR 5.00", "Mar 5, 2024", "Shipped on 03/06/2024"),
        ]
    }

    #[test]
    fn test_two_currencies_two_groups_no_grand_total() {
        let report = build_report(mock_items(), &options());

        assert_eq!(report.groups.len(), 2);

        let usd = report.groups[0].subtotal.as_ref().unwrap();
        assert_eq!(usd.label, TotalLabel::Subtotal);
        assert_eq!(usd.currency, "USD");
        assert_eq!(usd.total_value, Decimal::new(3000, 2));
        assert_eq!(usd.item_count, 2);
        assert_eq!(usd.shipped_count, 1);
        assert_eq!(usd.not_shipped_count(), 1);

        let eur = report.groups[1].subtotal.as_ref().unwrap();
        assert_eq!(eur.currency, "EUR");
        assert_eq!(eur.total_value, Decimal::new(500, 2));
        assert_eq!(eur.item_count, 1);
        assert_eq!(eur.shipped_count, 1);

        assert!(report.grand_total.is_none());
    }

    #[test]
    fn test_single_currency_has_grand_total() {
        let mut items = mock_items();
        items.pop();

        let report = build_report(items, &options());
        let grand = report.grand_total.unwrap();

        assert_eq!(grand.label, TotalLabel::GrandTotal);
        assert_eq!(grand.total_value, Decimal::new(3000, 2));
        assert_eq!(grand.item_count, 2);
        assert_eq!(grand.shipped_count, 1);
    }

    #[test]
    fn test_not_shipped_filter_runs_before_grouping() {
        let options = ReportOptions {
            filter_mode: FilterMode::NotShipped,
            ..options()
        };

        let report = build_report(mock_items(), &options);
        let records: Vec<&Record> = report.records().collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].price.amount, Some(Decimal::new(2000, 2)));
        assert_eq!(report.grand_total.map(|g| g.shipped_count), Some(0));
    }

    #[test]
    fn test_sorted_by_price_descending() {
        let options = ReportOptions {
            sort_field: SortField::Price,
            reverse_order: true,
            ..options()
        };

        let report = build_report(mock_items(), &options);
        let prices: Vec<&str> = report.records().map(|r| r.price.text.as_str()).collect();

        assert_eq!(prices, vec!["USD 20.00", "USD 10.00", "EUR 5.00"]);
    }

    #[test]
    fn test_item_counts_match_records() {
        let report = build_report(mock_items(), &options());

        let counted: usize = report
            .groups
            .iter()
            .filter_map(|g| g.subtotal.as_ref())
            .map(|s| s.item_count)
            .sum();

        assert_eq!(counted, report.records().count());
    }

    #[test]
    fn test_huge_prices_degrade_total() {
        let huge = "USD 50000000000000000000000000000";
        let items = vec![
            mock_item("100", huge, "Mar 1, 2024", ""),
            mock_item("100", huge, "Mar 1, 2024", ""),
        ];

        let report = build_report(items, &options());
        let grand = report.grand_total.unwrap();

        assert_eq!(grand.item_count, 2);
        assert_eq!(grand.total_value, "50000000000000000000000000000".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_no_items() {
        let report = build_report(Vec::new(), &options());

        assert!(report.is_empty());
        assert!(report.grand_total.is_none());
    }
}
