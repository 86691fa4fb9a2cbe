//! Property-based tests for sale-record normalization.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::normalize::{normalize, truncate_to_utc_day};
use super::types::SaleItem;

/// Strategy to generate a non-negative price (0.00 to 1,000,000.00).
fn price() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate an arbitrary caller-supplied profit (may lie).
fn any_profit() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a sale item with untrusted profit.
fn sale_item() -> impl Strategy<Value = SaleItem> {
    ("[A-Za-z]{1,12}", price(), price(), any_profit()).prop_map(
        |(product_name, selling_price, cost_price, profit)| SaleItem {
            product_name,
            selling_price,
            cost_price,
            profit,
        },
    )
}

/// Strategy to generate an item list (0 to 12 items).
fn item_list() -> impl Strategy<Value = Vec<SaleItem>> {
    prop::collection::vec(sale_item(), 0..12)
}

fn some_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For all item lists, totals equal the sums over the item list.
    #[test]
    fn prop_totals_match_item_sums(items in item_list()) {
        let sale = normalize(some_day(), items);

        let sales_sum: Decimal = sale.items.iter().map(|i| i.selling_price).sum();
        let profit_sum: Decimal = sale.items.iter().map(|i| i.profit).sum();

        prop_assert_eq!(sale.total_sales_amount, sales_sum);
        prop_assert_eq!(sale.total_profit, profit_sum);
    }

    /// For all items, profit is derived from prices, never trusted input.
    #[test]
    fn prop_profit_is_price_difference(items in item_list()) {
        let sale = normalize(some_day(), items);

        for item in &sale.items {
            prop_assert_eq!(item.profit, item.selling_price - item.cost_price);
        }
    }

    /// Normalization is idempotent.
    #[test]
    fn prop_normalize_idempotent(items in item_list()) {
        let once = normalize(some_day(), items);
        let twice = normalize(once.day, once.items.clone());

        prop_assert_eq!(once, twice);
    }

    /// Day truncation is idempotent and timezone-stable: re-truncating the
    /// UTC midnight of an already-truncated day yields the same day.
    #[test]
    fn prop_truncation_idempotent(secs in 0i64..4_102_444_800i64) {
        let instant = Utc.timestamp_opt(secs, 0).unwrap();
        let day = truncate_to_utc_day(instant);
        let midnight = day.and_hms_opt(0, 0, 0).unwrap().and_utc();

        prop_assert_eq!(truncate_to_utc_day(midnight), day);
    }
}
