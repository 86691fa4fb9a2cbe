//! Normalization: the invariant-maintenance step of the Ledger Engine.
//!
//! Runs before every persist of a sale record. Recomputes per-item profit
//! from prices (caller-supplied profit is never trusted), sums items into
//! record totals, and pins the day to a UTC calendar day so all records of
//! the same day compare equal by date value.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{NormalizedSale, SaleItem, SaleItemDraft};

/// Truncates an instant to its UTC calendar day (strips time-of-day).
///
/// Idempotent: truncating a UTC midnight yields the same day.
#[must_use]
pub fn truncate_to_utc_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Parses a caller-supplied day value.
///
/// Accepts `YYYY-MM-DD` or a full ISO-8601 datetime; datetimes are
/// converted to UTC before truncation.
///
/// # Errors
///
/// Returns a validation error when the value matches neither form.
pub fn parse_day(raw: &str) -> Result<NaiveDate, LedgerError> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(day);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(truncate_to_utc_day(instant.with_timezone(&Utc)));
    }
    Err(LedgerError::validation(format!(
        "date must be YYYY-MM-DD or an ISO-8601 datetime, got \"{raw}\""
    )))
}

/// Validates caller-supplied item drafts into sale items.
///
/// Missing prices default to zero; a missing or blank product name fails.
/// All failures are collected so the caller gets one message per field.
///
/// # Errors
///
/// Returns `LedgerError::Validation` listing every invalid field.
pub fn validate_items(drafts: &[SaleItemDraft]) -> Result<Vec<SaleItem>, LedgerError> {
    let mut items = Vec::with_capacity(drafts.len());
    let mut messages = Vec::new();

    for (index, draft) in drafts.iter().enumerate() {
        let name = draft
            .product_name
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if name.is_empty() {
            messages.push(format!("items[{index}].productName is required"));
        }

        let selling_price = draft.selling_price.unwrap_or(Decimal::ZERO);
        if selling_price < Decimal::ZERO {
            messages.push(format!("items[{index}].sellingPrice must be >= 0"));
        }

        let cost_price = draft.cost_price.unwrap_or(Decimal::ZERO);
        if cost_price < Decimal::ZERO {
            messages.push(format!("items[{index}].costPrice must be >= 0"));
        }

        items.push(SaleItem {
            product_name: name.to_string(),
            selling_price,
            cost_price,
            // Derived during normalize; any caller-supplied value is dropped.
            profit: Decimal::ZERO,
        });
    }

    if messages.is_empty() {
        Ok(items)
    } else {
        Err(LedgerError::Validation(messages))
    }
}

/// Normalizes a sale record: recomputes each item's profit and the record
/// totals from the item list.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`. An empty item
/// list yields zero totals and is a valid record.
#[must_use]
pub fn normalize(day: NaiveDate, items: Vec<SaleItem>) -> NormalizedSale {
    let mut total_sales_amount = Decimal::ZERO;
    let mut total_profit = Decimal::ZERO;

    let items: Vec<SaleItem> = items
        .into_iter()
        .map(|item| {
            let profit = item.selling_price - item.cost_price;
            total_sales_amount += item.selling_price;
            total_profit += profit;
            SaleItem { profit, ..item }
        })
        .collect();

    NormalizedSale {
        day,
        items,
        total_sales_amount,
        total_profit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn item(name: &str, selling: Decimal, cost: Decimal) -> SaleItem {
        SaleItem {
            product_name: name.to_string(),
            selling_price: selling,
            cost_price: cost,
            profit: Decimal::ZERO,
        }
    }

    #[test]
    fn test_pen_sale_scenario() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let sale = normalize(day, vec![item("Pen", dec!(100), dec!(60))]);

        assert_eq!(sale.day, day);
        assert_eq!(sale.items[0].profit, dec!(40));
        assert_eq!(sale.total_sales_amount, dec!(100));
        assert_eq!(sale.total_profit, dec!(40));
    }

    #[test]
    fn test_caller_supplied_profit_is_ignored() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let mut lying = item("Pen", dec!(100), dec!(60));
        lying.profit = dec!(9999);

        let sale = normalize(day, vec![lying]);
        assert_eq!(sale.items[0].profit, dec!(40));
        assert_eq!(sale.total_profit, dec!(40));
    }

    #[test]
    fn test_empty_items_yield_zero_totals() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let sale = normalize(day, Vec::new());

        assert!(sale.items.is_empty());
        assert_eq!(sale.total_sales_amount, Decimal::ZERO);
        assert_eq!(sale.total_profit, Decimal::ZERO);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let once = normalize(
            day,
            vec![item("Pen", dec!(100), dec!(60)), item("Book", dec!(50), dec!(20))],
        );
        let twice = normalize(once.day, once.items.clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_truncation_strips_time_of_day() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 5, 17, 45, 12).unwrap();
        assert_eq!(
            truncate_to_utc_day(instant),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn test_truncation_is_idempotent() {
        let midnight = Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        let day = truncate_to_utc_day(midnight);
        assert_eq!(
            day.and_hms_opt(0, 0, 0).unwrap().and_utc(),
            midnight
        );
        assert_eq!(truncate_to_utc_day(midnight), day);
    }

    #[test]
    fn test_parse_day_accepts_date_and_datetime() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(parse_day("2024-03-05").unwrap(), expected);
        assert_eq!(parse_day("2024-03-05T13:20:00Z").unwrap(), expected);
        // Offset datetimes are normalized to UTC before truncation.
        assert_eq!(
            parse_day("2024-03-06T01:00:00+05:00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn test_parse_day_rejects_garbage() {
        assert!(parse_day("yesterday").is_err());
        assert!(parse_day("").is_err());
    }

    #[test]
    fn test_validate_items_requires_product_name() {
        let drafts = vec![
            SaleItemDraft {
                product_name: Some("Pen".to_string()),
                selling_price: Some(dec!(100)),
                cost_price: Some(dec!(60)),
                profit: None,
            },
            SaleItemDraft::default(),
            SaleItemDraft {
                product_name: Some("   ".to_string()),
                ..SaleItemDraft::default()
            },
        ];

        let err = validate_items(&drafts).unwrap_err();
        let LedgerError::Validation(messages) = err else {
            panic!("expected validation error");
        };
        assert_eq!(
            messages,
            vec![
                "items[1].productName is required".to_string(),
                "items[2].productName is required".to_string(),
            ]
        );
    }

    #[test]
    fn test_validate_items_rejects_negative_prices() {
        let drafts = vec![SaleItemDraft {
            product_name: Some("Pen".to_string()),
            selling_price: Some(dec!(-1)),
            cost_price: Some(dec!(-2)),
            profit: None,
        }];

        let err = validate_items(&drafts).unwrap_err();
        assert_eq!(err.messages().len(), 2);
    }

    #[test]
    fn test_validate_items_defaults_missing_prices_to_zero() {
        let drafts = vec![SaleItemDraft {
            product_name: Some("Sticker".to_string()),
            selling_price: None,
            cost_price: None,
            profit: None,
        }];

        let items = validate_items(&drafts).unwrap();
        assert_eq!(items[0].selling_price, Decimal::ZERO);
        assert_eq!(items[0].cost_price, Decimal::ZERO);
    }
}
