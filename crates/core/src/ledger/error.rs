//! Error types for ledger operations.

use thiserror::Error;

/// Errors produced by the Ledger Engine.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input failed validation; one message per failed field.
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Month outside 1..=12, or a year/month pair with no first day.
    #[error("invalid month: {year}-{month}")]
    InvalidMonth {
        /// Requested year.
        year: i32,
        /// Requested month (1-12).
        month: u32,
    },
}

impl LedgerError {
    /// Builds a validation error from a single message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Returns the validation messages, if any.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Validation(messages) => messages,
            Self::InvalidMonth { .. } => &[],
        }
    }
}
