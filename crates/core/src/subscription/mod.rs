//! Subscription lifecycle types.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

/// Supported subscription durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionDuration {
    /// Six-month plan.
    #[serde(rename = "6 Months")]
    SixMonths,
    /// One-year plan.
    #[serde(rename = "1 Year")]
    OneYear,
}

impl SubscriptionDuration {
    /// Returns the customer-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SixMonths => "6 Months",
            Self::OneYear => "1 Year",
        }
    }
}

impl std::fmt::Display for SubscriptionDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for SubscriptionDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "6 Months" => Ok(Self::SixMonths),
            "1 Year" => Ok(Self::OneYear),
            other => Err(format!("unknown duration: {other}")),
        }
    }
}

/// Subscription record status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Subscription is active.
    Active,
    /// Subscription was deactivated manually.
    Inactive,
    /// Subscription ran out.
    Expired,
}

impl SubscriptionStatus {
    /// Returns the status as its stored string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "expired" => Ok(Self::Expired),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// Computes when a subscription starting at `start` runs out.
#[must_use]
pub fn expiry_date(start: DateTime<Utc>, duration: SubscriptionDuration) -> DateTime<Utc> {
    let months = match duration {
        SubscriptionDuration::SixMonths => Months::new(6),
        SubscriptionDuration::OneYear => Months::new(12),
    };
    // checked_add_months only fails near the datetime range limits.
    start.checked_add_months(months).unwrap_or(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_duration_labels_round_trip() {
        assert_eq!(
            SubscriptionDuration::from_str("6 Months").unwrap(),
            SubscriptionDuration::SixMonths
        );
        assert_eq!(
            SubscriptionDuration::from_str("1 Year").unwrap(),
            SubscriptionDuration::OneYear
        );
        assert_eq!(SubscriptionDuration::SixMonths.label(), "6 Months");
        assert!(SubscriptionDuration::from_str("2 Weeks").is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Inactive,
            SubscriptionStatus::Expired,
        ] {
            assert_eq!(
                SubscriptionStatus::from_str(status.as_str()).unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_expiry_six_months() {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        let expiry = expiry_date(start, SubscriptionDuration::SixMonths);
        assert_eq!(expiry, Utc.with_ymd_and_hms(2024, 7, 15, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_expiry_one_year_clamps_leap_day() {
        let start = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();
        let expiry = expiry_date(start, SubscriptionDuration::OneYear);
        assert_eq!(expiry, Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap());
    }
}
