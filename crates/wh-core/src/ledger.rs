//! Event classification and worked-time totals.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::AccountingError;
use crate::event::DayEvents;
use crate::policy::{PolicyTable, expected_duration};

/// How an event category counts toward worked time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// A day off that credits the day's expected duration.
    FullDayOff,
    /// Excluded from worked time entirely.
    Ignored,
    /// Counts its literal wall-clock span.
    Worked,
}

/// Category labels with special accounting rules.
///
/// Matching is exact and case-sensitive against the event summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories {
    pub full_day_off: Vec<String>,
    pub ignored: Vec<String>,
}

impl Default for Categories {
    fn default() -> Self {
        Self {
            full_day_off: [
                "VACATION",
                "6JULYCOMPENSATION",
                "FURLOUGH",
                "NATIONAL HOLIDAY",
                "HOLLIDAY",
            ]
            .map(String::from)
            .to_vec(),
            ignored: ["JOUR", "COMPENSATION"].map(String::from).to_vec(),
        }
    }
}

impl Categories {
    /// Classifies a summary. Full-day-off takes precedence when a label is in both lists.
    pub fn classify(&self, summary: &str) -> Category {
        if self.full_day_off.iter().any(|label| label == summary) {
            Category::FullDayOff
        } else if self.ignored.iter().any(|label| label == summary) {
            Category::Ignored
        } else {
            Category::Worked
        }
    }
}

/// Total worked duration for one day.
///
/// Full-day-off events add the expected duration of their own date, ignored
/// events add nothing and every other event adds its span. Fails on the first
/// event whose span cannot be computed.
pub fn total_worked(
    day: &DayEvents<'_>,
    policies: &PolicyTable,
    categories: &Categories,
) -> Result<Duration, AccountingError> {
    day.iter().try_fold(Duration::zero(), |total, event| {
        let contribution = match categories.classify(&event.summary) {
            Category::FullDayOff => expected_duration(event.date(), policies),
            Category::Ignored => Duration::zero(),
            Category::Worked => event.duration()?,
        };
        Ok(total + contribution)
    })
}
