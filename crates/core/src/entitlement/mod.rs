//! Tool entitlement status derivation.
//!
//! A grant stores `status` and `expires_at`. Expiry never flips the stored
//! status (no background job); readers derive the effective status by
//! comparing `expires_at` against the read-time clock. The derivation is
//! presentational only and must not be written back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored status of an entitlement grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantStatus {
    /// Grant is active.
    Active,
    /// Grant was marked expired.
    Expired,
}

impl GrantStatus {
    /// Returns the status as its stored string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for GrantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a grant's expiry has passed at `now`.
///
/// Uses `expires_at <= now`: a grant expiring exactly now is expired.
#[must_use]
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    expires_at <= now
}

/// Derives the effective status at read time.
///
/// A passed expiry always reads as expired regardless of the stored
/// status; otherwise the stored status is reported unchanged.
#[must_use]
pub fn effective_status(
    stored: GrantStatus,
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> GrantStatus {
    if is_expired(expires_at, now) {
        GrantStatus::Expired
    } else {
        stored
    }
}

/// Whether a grant is usable: stored-active and not past its expiry.
///
/// This is the filter for a user's own tool listing.
#[must_use]
pub fn is_usable(stored: GrantStatus, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    stored == GrantStatus::Active && !is_expired(expires_at, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_future_expiry_keeps_stored_status() {
        let now = Utc::now();
        let later = now + Duration::days(3);

        assert_eq!(
            effective_status(GrantStatus::Active, later, now),
            GrantStatus::Active
        );
        assert_eq!(
            effective_status(GrantStatus::Expired, later, now),
            GrantStatus::Expired
        );
    }

    #[test]
    fn test_passed_expiry_reads_as_expired() {
        let now = Utc::now();
        let earlier = now - Duration::hours(1);

        assert_eq!(
            effective_status(GrantStatus::Active, earlier, now),
            GrantStatus::Expired
        );
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        assert!(is_expired(now, now));
        assert_eq!(
            effective_status(GrantStatus::Active, now, now),
            GrantStatus::Expired
        );
    }

    #[test]
    fn test_usable_requires_active_and_unexpired() {
        let now = Utc::now();
        let later = now + Duration::days(1);
        let earlier = now - Duration::days(1);

        assert!(is_usable(GrantStatus::Active, later, now));
        assert!(!is_usable(GrantStatus::Active, earlier, now));
        assert!(!is_usable(GrantStatus::Expired, later, now));
    }
}
