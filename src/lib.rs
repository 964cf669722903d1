// Library module for testable functions

pub mod error;
pub mod report;

use rust_decimal::Decimal;

/// Average value per item, rounded to cents
/// Formula: total / item_count
pub fn average_per_item(total: Decimal, item_count: usize) -> Option<Decimal> {
    if item_count == 0 {
        return None;
    }
    Some((total / Decimal::from(item_count)).round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_per_item() {
        // Test normal case
        let avg = average_per_item(Decimal::new(3000, 2), 2);
        assert_eq!(avg, Some(Decimal::new(1500, 2)));
    }

    #[test]
    fn test_average_per_item_rounding() {
        // 10 / 3 = 3.333...
        let avg = average_per_item(Decimal::from(10), 3);
        assert_eq!(avg, Some(Decimal::new(333, 2)));
    }

    #[test]
    fn test_average_per_item_zero_items() {
        // Test with no items (should return None)
        let avg = average_per_item(Decimal::from(25), 0);
        assert!(avg.is_none());
    }

    #[test]
    fn test_average_per_item_zero_total() {
        let avg = average_per_item(Decimal::ZERO, 4);
        assert_eq!(avg, Some(Decimal::ZERO));
    }
}
