//! Aggregate queries over normalized sale records.
//!
//! All functions here are pure: the caller fetches the candidate records
//! (in creation order) and the functions fold them. Records are never
//! re-sorted by value; within a day, insertion order is preserved.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::error::LedgerError;
use super::types::{DailySummary, DayBucket, MonthlySummary, NormalizedSale};

/// Number of calendar days in a month.
///
/// # Errors
///
/// Returns `LedgerError::InvalidMonth` when `month` is outside 1..=12.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, LedgerError> {
    let (first, next) = month_bounds(year, month)?;
    // Always 28-31; the conversion cannot fail.
    let days = u32::try_from((next - first).num_days())
        .map_err(|_| LedgerError::InvalidMonth { year, month })?;
    Ok(days)
}

/// Returns `[first day of month, first day of next month)` bounds.
///
/// # Errors
///
/// Returns `LedgerError::InvalidMonth` when `month` is outside 1..=12.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), LedgerError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(LedgerError::InvalidMonth { year, month })?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or(LedgerError::InvalidMonth { year, month })?;
    Ok((first, next))
}

/// Folds all records of a single day into one aggregate.
///
/// Items are concatenated in fetch order. With `count_orders` the result
/// carries the number of contributing records (the today-variant); without
/// it the count is omitted (the by-date variant). Zero matching records
/// yield a zero-valued aggregate; rejecting that case is the caller's
/// policy, not this fold's.
#[must_use]
pub fn daily_summary(day: NaiveDate, records: &[NormalizedSale], count_orders: bool) -> DailySummary {
    let mut summary = DailySummary {
        day,
        items: Vec::new(),
        total_sales_amount: Decimal::ZERO,
        total_profit: Decimal::ZERO,
        total_orders: count_orders.then_some(0),
    };

    for record in records {
        summary.items.extend(record.items.iter().cloned());
        summary.total_sales_amount += record.total_sales_amount;
        summary.total_profit += record.total_profit;
        if let Some(orders) = summary.total_orders.as_mut() {
            *orders += 1;
        }
    }

    summary
}

/// Folds a month's records into totals plus a dense per-day series.
///
/// The series covers every calendar day of the month in ascending order;
/// days without records appear as zero-valued entries. Records outside the
/// month are ignored.
///
/// # Errors
///
/// Returns `LedgerError::InvalidMonth` when `month` is outside 1..=12.
pub fn monthly_summary(
    year: i32,
    month: u32,
    records: &[NormalizedSale],
) -> Result<MonthlySummary, LedgerError> {
    let (first, next) = month_bounds(year, month)?;

    let mut total_monthly_sales = Decimal::ZERO;
    let mut total_monthly_profit = Decimal::ZERO;
    let mut per_day: HashMap<NaiveDate, (Decimal, Decimal)> = HashMap::new();

    for record in records {
        if record.day < first || record.day >= next {
            continue;
        }
        total_monthly_sales += record.total_sales_amount;
        total_monthly_profit += record.total_profit;
        let bucket = per_day.entry(record.day).or_default();
        bucket.0 += record.total_sales_amount;
        bucket.1 += record.total_profit;
    }

    let series: Vec<DayBucket> = first
        .iter_days()
        .take_while(|day| *day < next)
        .map(|day| {
            let (sales, profit) = per_day.get(&day).copied().unwrap_or_default();
            DayBucket {
                day,
                total_sales_amount: sales,
                total_profit: profit,
            }
        })
        .collect();

    // Guarded division; a month always has >= 28 days.
    let day_count = Decimal::from(series.len());
    let avg_daily_sales = if day_count.is_zero() {
        Decimal::ZERO
    } else {
        total_monthly_sales / day_count
    };

    Ok(MonthlySummary {
        year,
        month,
        total_monthly_sales,
        total_monthly_profit,
        avg_daily_sales,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::normalize::normalize;
    use crate::ledger::types::SaleItem;
    use rust_decimal_macros::dec;

    fn sale(day: NaiveDate, selling: Decimal, cost: Decimal) -> NormalizedSale {
        normalize(
            day,
            vec![SaleItem {
                product_name: "Pen".to_string(),
                selling_price: selling,
                cost_price: cost,
                profit: Decimal::ZERO,
            }],
        )
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_two_records_same_day_sum_to_150() {
        let d = day(2024, 3, 5);
        let records = vec![sale(d, dec!(100), dec!(60)), sale(d, dec!(50), dec!(30))];

        let summary = daily_summary(d, &records, false);
        assert_eq!(summary.total_sales_amount, dec!(150));
        assert_eq!(summary.total_profit, dec!(60));
        assert_eq!(summary.items.len(), 2);
        assert!(summary.total_orders.is_none());
    }

    #[test]
    fn test_today_variant_counts_orders_and_tolerates_empty() {
        let d = day(2024, 3, 5);
        let empty = daily_summary(d, &[], true);
        assert_eq!(empty.total_orders, Some(0));
        assert_eq!(empty.total_sales_amount, Decimal::ZERO);

        let records = vec![sale(d, dec!(10), dec!(4)), sale(d, dec!(20), dec!(5))];
        let summary = daily_summary(d, &records, true);
        assert_eq!(summary.total_orders, Some(2));
    }

    #[test]
    fn test_items_keep_fetch_order() {
        let d = day(2024, 3, 5);
        let mut first = sale(d, dec!(5), dec!(1));
        first.items[0].product_name = "First".to_string();
        let mut second = sale(d, dec!(3), dec!(1));
        second.items[0].product_name = "Second".to_string();

        let summary = daily_summary(d, &[first, second], false);
        assert_eq!(summary.items[0].product_name, "First");
        assert_eq!(summary.items[1].product_name, "Second");
    }

    #[test]
    fn test_leap_february_has_29_entries() {
        let summary = monthly_summary(2024, 2, &[]).unwrap();
        assert_eq!(summary.series.len(), 29);
        assert_eq!(summary.series[0].day, day(2024, 2, 1));
        assert_eq!(summary.series[28].day, day(2024, 2, 29));
    }

    #[test]
    fn test_monthly_series_is_dense_and_sums() {
        let records = vec![
            sale(day(2024, 3, 5), dec!(100), dec!(60)),
            sale(day(2024, 3, 5), dec!(50), dec!(30)),
            sale(day(2024, 3, 20), dec!(31), dec!(1)),
            // Outside the month: ignored.
            sale(day(2024, 4, 1), dec!(999), dec!(0)),
        ];

        let summary = monthly_summary(2024, 3, &records).unwrap();
        assert_eq!(summary.series.len(), 31);
        assert_eq!(summary.total_monthly_sales, dec!(181));
        assert_eq!(summary.total_monthly_profit, dec!(90));

        let march5 = &summary.series[4];
        assert_eq!(march5.day, day(2024, 3, 5));
        assert_eq!(march5.total_sales_amount, dec!(150));

        let march6 = &summary.series[5];
        assert_eq!(march6.total_sales_amount, Decimal::ZERO);
    }

    #[test]
    fn test_avg_daily_sales() {
        let records = vec![sale(day(2024, 2, 1), dec!(290), dec!(0))];
        let summary = monthly_summary(2024, 2, &records).unwrap();
        assert_eq!(summary.avg_daily_sales, dec!(10));
    }

    #[test]
    fn test_invalid_month_rejected() {
        assert!(matches!(
            monthly_summary(2024, 13, &[]),
            Err(LedgerError::InvalidMonth { .. })
        ));
        assert!(matches!(
            monthly_summary(2024, 0, &[]),
            Err(LedgerError::InvalidMonth { .. })
        ));
    }

    #[test]
    fn test_december_bounds_roll_into_next_year() {
        let (first, next) = month_bounds(2024, 12).unwrap();
        assert_eq!(first, day(2024, 12, 1));
        assert_eq!(next, day(2025, 1, 1));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(days_in_month(2024, 4).unwrap(), 30);
        assert_eq!(days_in_month(2024, 1).unwrap(), 31);
    }
}
