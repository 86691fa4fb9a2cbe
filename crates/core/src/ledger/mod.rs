//! Sales-record normalization and aggregation (the Ledger Engine).
//!
//! This module keeps each sale record's derived totals consistent with its
//! item list and answers daily/monthly aggregate queries. Normalization is
//! an explicit pure function called by the write path before persistence,
//! never a hidden save hook, so the invariant is independently testable.

pub mod error;
pub mod normalize;
pub mod summary;
pub mod types;

#[cfg(test)]
mod normalize_props;
#[cfg(test)]
mod summary_props;

pub use error::LedgerError;
pub use normalize::{normalize, parse_day, truncate_to_utc_day, validate_items};
pub use summary::{daily_summary, days_in_month, month_bounds, monthly_summary};
pub use types::{DailySummary, DayBucket, MonthlySummary, NormalizedSale, SaleItem, SaleItemDraft};
