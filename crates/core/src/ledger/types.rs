//! Domain types for the Ledger Engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single sold item inside a sale record.
///
/// `profit` is always derived (`selling_price - cost_price`); any
/// caller-supplied value is discarded during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    /// Product name, trimmed, never empty.
    pub product_name: String,
    /// Selling price, >= 0.
    pub selling_price: Decimal,
    /// Cost price, >= 0.
    pub cost_price: Decimal,
    /// Derived profit.
    pub profit: Decimal,
}

/// Caller-supplied item before validation.
///
/// Prices default to zero when absent, matching the lenient intake of the
/// write path; a missing product name is a validation error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemDraft {
    /// Product name.
    pub product_name: Option<String>,
    /// Selling price.
    pub selling_price: Option<Decimal>,
    /// Cost price.
    pub cost_price: Option<Decimal>,
    /// Caller-supplied profit. Ignored: profit is always recomputed.
    pub profit: Option<Decimal>,
}

/// A sale record after normalization: derived totals match the item list
/// and the day is truncated to a UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSale {
    /// UTC calendar day of the sale.
    pub day: NaiveDate,
    /// Items in insertion order.
    pub items: Vec<SaleItem>,
    /// Sum of item selling prices.
    pub total_sales_amount: Decimal,
    /// Sum of item profits.
    pub total_profit: Decimal,
}

/// Aggregate over all sale records of a single day.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// The day being summarized.
    pub day: NaiveDate,
    /// Concatenation of all matching records' items, in fetch order.
    pub items: Vec<SaleItem>,
    /// Sum across matching records.
    pub total_sales_amount: Decimal,
    /// Sum across matching records.
    pub total_profit: Decimal,
    /// Count of matching records. Present on the today-variant only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_orders: Option<u64>,
}

/// One entry of the dense per-day monthly series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    /// Calendar day.
    pub day: NaiveDate,
    /// Total sales for the day (zero when no records).
    pub total_sales_amount: Decimal,
    /// Total profit for the day (zero when no records).
    pub total_profit: Decimal,
}

/// Aggregate over all sale records of a calendar month.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// Requested year.
    pub year: i32,
    /// Requested month (1-12).
    pub month: u32,
    /// Sum of sales across the month.
    pub total_monthly_sales: Decimal,
    /// Sum of profit across the month.
    pub total_monthly_profit: Decimal,
    /// `total_monthly_sales / days_in_month`.
    pub avg_daily_sales: Decimal,
    /// Dense ascending series, one entry per calendar day of the month.
    pub series: Vec<DayBucket>,
}
