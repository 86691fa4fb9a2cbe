//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Principal role for end users.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// End user.
    #[sea_orm(string_value = "user")]
    User,
    /// Admin-equivalent user. Signup never assigns this.
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Stored status of a tool grant.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "grant_status")]
#[serde(rename_all = "lowercase")]
pub enum GrantStatus {
    /// Grant is active.
    #[sea_orm(string_value = "active")]
    Active,
    /// Grant was marked expired.
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl From<GrantStatus> for tooldesk_core::entitlement::GrantStatus {
    fn from(status: GrantStatus) -> Self {
        match status {
            GrantStatus::Active => Self::Active,
            GrantStatus::Expired => Self::Expired,
        }
    }
}

/// Subscription record status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "subscription_status")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Subscription is active.
    #[sea_orm(string_value = "active")]
    Active,
    /// Subscription was deactivated manually.
    #[sea_orm(string_value = "inactive")]
    Inactive,
    /// Subscription ran out.
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl From<tooldesk_core::subscription::SubscriptionStatus> for SubscriptionStatus {
    fn from(status: tooldesk_core::subscription::SubscriptionStatus) -> Self {
        use tooldesk_core::subscription::SubscriptionStatus as Core;
        match status {
            Core::Active => Self::Active,
            Core::Inactive => Self::Inactive,
            Core::Expired => Self::Expired,
        }
    }
}

/// Subscription plan duration.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "subscription_duration")]
pub enum SubscriptionDuration {
    /// Six-month plan.
    #[sea_orm(string_value = "six_months")]
    #[serde(rename = "6 Months")]
    SixMonths,
    /// One-year plan.
    #[sea_orm(string_value = "one_year")]
    #[serde(rename = "1 Year")]
    OneYear,
}

impl From<tooldesk_core::subscription::SubscriptionDuration> for SubscriptionDuration {
    fn from(duration: tooldesk_core::subscription::SubscriptionDuration) -> Self {
        use tooldesk_core::subscription::SubscriptionDuration as Core;
        match duration {
            Core::SixMonths => Self::SixMonths,
            Core::OneYear => Self::OneYear,
        }
    }
}

impl From<SubscriptionDuration> for tooldesk_core::subscription::SubscriptionDuration {
    fn from(duration: SubscriptionDuration) -> Self {
        match duration {
            SubscriptionDuration::SixMonths => Self::SixMonths,
            SubscriptionDuration::OneYear => Self::OneYear,
        }
    }
}
