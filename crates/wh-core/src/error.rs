//! Errors raised by the accounting engine.

use chrono::NaiveDate;
use thiserror::Error;

/// Accounting errors.
///
/// All failures are local and value-based: nothing is emitted before the
/// error surfaces, so callers decide whether to abort a whole range or
/// report per day.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountingError {
    /// An event record could not be interpreted.
    #[error("malformed event {id}: {reason}")]
    MalformedEvent { id: String, reason: String },

    /// An event was handed to a single-day computation for another date.
    #[error("event {id} starts on {date}, expected {expected}")]
    EventOutsideDay {
        id: String,
        date: NaiveDate,
        expected: NaiveDate,
    },

    /// A policy entry carries unusable hour values.
    #[error("invalid policy effective from {effective_from}: {reason}")]
    InvalidPolicy {
        effective_from: NaiveDate,
        reason: String,
    },

    /// Timeline resolution must be positive and at most one day.
    #[error("timeline resolution must be positive and at most one day")]
    InvalidResolution,
}

impl AccountingError {
    pub(crate) fn malformed(id: &str, reason: impl Into<String>) -> Self {
        Self::MalformedEvent {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}
