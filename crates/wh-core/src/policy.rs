//! Expected-hours policy lookup.
//!
//! A policy table is a list of effective-dated weekly schedules. Lookup walks
//! the list *in the order given* and takes the first entry that became
//! effective strictly before the queried date:
//!
//! - a table ordered newest-first therefore yields "the latest entry
//!   effective before the date";
//! - any other order can yield a different, older entry;
//! - an entry dated exactly on the queried date does not apply to it yet.
//!
//! This order dependence is inherited behaviour that existing configurations
//! rely on. It is kept as-is; [`PolicyTable::is_newest_first`] lets callers
//! detect and report tables where it matters.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::AccountingError;

/// Expected day length when no policy entry applies: 7h12m.
pub const DEFAULT_EXPECTED_SECONDS: i64 = 7 * 3600 + 12 * 60;

/// Weekly expected hours, effective from a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(alias = "startdate")]
    pub effective_from: NaiveDate,
    /// Hours per weekday, Monday first.
    #[serde(alias = "hours")]
    pub hours_by_weekday: [f64; 7],
}

impl Policy {
    /// Expected duration for a weekday index (0 = Monday).
    #[allow(
        clippy::cast_possible_truncation,
        reason = "validated hours are finite and far below the i64 microsecond range"
    )]
    fn expected_for(&self, weekday: usize) -> Duration {
        Duration::microseconds((self.hours_by_weekday[weekday] * 3_600_000_000.0).round() as i64)
    }
}

/// Policy entries plus the fallback used when none applies.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyTable {
    entries: Vec<Policy>,
    fallback: Duration,
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            fallback: Duration::seconds(DEFAULT_EXPECTED_SECONDS),
        }
    }
}

impl PolicyTable {
    /// Builds a table with the default 7h12m fallback.
    ///
    /// Every hour value must be finite and non-negative.
    pub fn new(entries: Vec<Policy>) -> Result<Self, AccountingError> {
        for entry in &entries {
            if let Some(bad) = entry
                .hours_by_weekday
                .iter()
                .find(|hours| !hours.is_finite() || **hours < 0.0)
            {
                return Err(AccountingError::InvalidPolicy {
                    effective_from: entry.effective_from,
                    reason: format!("hours must be finite and non-negative, got {bad}"),
                });
            }
        }
        Ok(Self {
            entries,
            ..Self::default()
        })
    }

    /// Replaces the fallback duration.
    #[must_use]
    pub const fn with_fallback(mut self, fallback: Duration) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn entries(&self) -> &[Policy] {
        &self.entries
    }

    pub const fn fallback(&self) -> Duration {
        self.fallback
    }

    /// True when entries are sorted by descending `effective_from`, the only
    /// order in which first-match lookup picks the most recent entry.
    pub fn is_newest_first(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].effective_from >= pair[1].effective_from)
    }
}

/// Expected work duration for `date`.
///
/// Returns the weekday hours of the first entry, in table order, whose
/// `effective_from` is strictly before `date`, or the table's fallback.
pub fn expected_duration(date: NaiveDate, policies: &PolicyTable) -> Duration {
    let weekday = date.weekday().num_days_from_monday() as usize;
    policies
        .entries
        .iter()
        .find(|entry| entry.effective_from < date)
        .map_or(policies.fallback, |entry| {
            tracing::debug!(%date, effective_from = %entry.effective_from, "policy selected");
            entry.expected_for(weekday)
        })
}
