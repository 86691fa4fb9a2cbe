//! Property-based tests for monthly aggregation.

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::normalize::normalize;
use super::summary::{days_in_month, monthly_summary};
use super::types::{NormalizedSale, SaleItem};

/// Strategy for a year/month pair across leap and non-leap years.
fn year_month() -> impl Strategy<Value = (i32, u32)> {
    (2000i32..2100i32, 1u32..=12u32)
}

/// Strategy pairing a month with records scattered inside it.
fn month_with_records() -> impl Strategy<Value = ((i32, u32), Vec<NormalizedSale>)> {
    year_month().prop_flat_map(|(year, month)| {
        records_in_month(year, month).prop_map(move |records| ((year, month), records))
    })
}

/// Strategy for a handful of records scattered inside the given month.
fn records_in_month(year: i32, month: u32) -> impl Strategy<Value = Vec<NormalizedSale>> {
    let days = days_in_month(year, month).expect("valid month");
    prop::collection::vec(
        (1u32..=days, 0i64..1_000_000i64).prop_map(move |(day, cents)| {
            let date = NaiveDate::from_ymd_opt(year, month, day).expect("valid day");
            normalize(
                date,
                vec![SaleItem {
                    product_name: "Widget".to_string(),
                    selling_price: Decimal::new(cents, 2),
                    cost_price: Decimal::ZERO,
                    profit: Decimal::ZERO,
                }],
            )
        }),
        0..20,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The series always covers exactly the days of the month.
    #[test]
    fn prop_series_length_is_days_in_month((year, month) in year_month()) {
        let summary = monthly_summary(year, month, &[]).unwrap();
        let expected = days_in_month(year, month).unwrap() as usize;

        prop_assert_eq!(summary.series.len(), expected);
    }

    /// Every series entry is unique and strictly ascending by day.
    #[test]
    fn prop_series_days_unique_ascending((year, month) in year_month()) {
        let summary = monthly_summary(year, month, &[]).unwrap();

        for window in summary.series.windows(2) {
            prop_assert!(window[0].day < window[1].day);
        }
        for entry in &summary.series {
            prop_assert_eq!(entry.day.year(), year);
            prop_assert_eq!(entry.day.month(), month);
        }
    }

    /// Monthly totals equal the sum of the series buckets, which equal the
    /// sum of the contributing records.
    #[test]
    fn prop_series_buckets_sum_to_totals(((year, month), records) in month_with_records()) {
        let summary = monthly_summary(year, month, &records).unwrap();

        let bucket_sales: Decimal = summary.series.iter().map(|b| b.total_sales_amount).sum();
        let record_sales: Decimal = records.iter().map(|r| r.total_sales_amount).sum();

        prop_assert_eq!(summary.total_monthly_sales, bucket_sales);
        prop_assert_eq!(summary.total_monthly_sales, record_sales);
    }
}
