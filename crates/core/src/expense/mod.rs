//! Expense aggregation.
//!
//! Expenses are flat categorized entries with no derived fields; the only
//! logic is summation and day-grouping for the reporting endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// A stored expense entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntry {
    /// Entry ID.
    pub id: Uuid,
    /// Short title, e.g. "Server renewal".
    pub title: String,
    /// Amount spent.
    pub amount: Decimal,
    /// Calendar day of the expense.
    pub day: NaiveDate,
    /// Optional free-form note.
    pub note: Option<String>,
    /// Category label.
    pub category: String,
}

/// Expenses of one day with their total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGroup {
    /// The day.
    pub day: NaiveDate,
    /// Sum of this day's entries.
    pub total: Decimal,
    /// Entries in input order.
    pub entries: Vec<ExpenseEntry>,
}

/// Sums a set of expense entries.
#[must_use]
pub fn total(entries: &[ExpenseEntry]) -> Decimal {
    entries.iter().map(|e| e.amount).sum()
}

/// Groups entries by day, newest day first.
///
/// Entries within a day keep their input order; the caller fetches them
/// sorted the way it wants them rendered.
#[must_use]
pub fn group_by_day(entries: Vec<ExpenseEntry>) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();

    for entry in entries {
        if let Some(group) = groups.iter_mut().find(|g| g.day == entry.day) {
            group.total += entry.amount;
            group.entries.push(entry);
        } else {
            groups.push(DayGroup {
                day: entry.day,
                total: entry.amount,
                entries: vec![entry],
            });
        }
    }

    groups.sort_by(|a, b| b.day.cmp(&a.day));
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(title: &str, amount: Decimal, day: NaiveDate) -> ExpenseEntry {
        ExpenseEntry {
            id: Uuid::new_v4(),
            title: title.to_string(),
            amount,
            day,
            note: None,
            category: "general".to_string(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_total() {
        let entries = vec![
            entry("Hosting", dec!(25.50), day(1)),
            entry("Domain", dec!(12), day(2)),
        ];
        assert_eq!(total(&entries), dec!(37.50));
    }

    #[test]
    fn test_total_of_empty_is_zero() {
        assert_eq!(total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_group_by_day_newest_first_with_totals() {
        let entries = vec![
            entry("Hosting", dec!(25), day(1)),
            entry("Lunch", dec!(10), day(3)),
            entry("Domain", dec!(12), day(1)),
        ];

        let groups = group_by_day(entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].day, day(3));
        assert_eq!(groups[0].total, dec!(10));
        assert_eq!(groups[1].day, day(1));
        assert_eq!(groups[1].total, dec!(37));
        assert_eq!(groups[1].entries[0].title, "Hosting");
        assert_eq!(groups[1].entries[1].title, "Domain");
    }
}
