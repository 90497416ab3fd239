//! CLI subcommand implementations.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, warn};
use wh_core::{Categories, DayEvents, Event, PolicyTable, expected_duration, total_worked};

use crate::Config;

pub mod create;
pub mod delete;
pub mod list;
pub mod start;
pub mod stop;
pub mod summary;
pub mod today;
pub mod update;
pub mod util;

/// Accounting rules resolved from configuration.
#[derive(Debug, Clone, Default)]
pub struct Accounting {
    pub policies: PolicyTable,
    pub categories: Categories,
}

impl Accounting {
    pub fn from_config(config: &Config) -> Result<Self> {
        let policies = config
            .policy_table()
            .context("invalid expected-hours configuration")?;
        if !policies.is_newest_first() {
            warn!(
                "expected-hours entries are not sorted newest first; \
                 the first entry older than a date wins, not the most recent one"
            );
        }
        debug!(entries = policies.entries().len(), "loaded policies");
        Ok(Self {
            policies,
            categories: config.categories(),
        })
    }

    /// `Total time worked today: ...` for `today`.
    pub fn today_line(&self, events: &[Event], today: NaiveDate) -> Result<String> {
        let day = DayEvents::on(events, today);
        let worked = total_worked(&day, &self.policies, &self.categories)
            .with_context(|| format!("failed to total {today}"))?;
        let expected = expected_duration(today, &self.policies);
        Ok(wh_core::today_line(worked, expected))
    }
}

/// Options shared by every mutating command.
#[derive(Debug, Clone, Copy)]
pub struct Mutation {
    /// Answer yes to every confirmation.
    pub force: bool,
    /// Reference date for relative dates and defaults.
    pub today: NaiveDate,
    /// Default time for `start` and `stop`.
    pub now: NaiveTime,
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;
    use wh_core::{Policy, PolicyTable};
    use wh_gcal::NewEvent;

    use super::util::local_to_utc;
    use super::{Accounting, Mutation};
    use crate::calendar::{Calendar, FileCalendar};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    /// Forced mutation on Wednesday 2020-10-14 at 12:00.
    pub fn forced() -> Mutation {
        Mutation {
            force: true,
            today: date(2020, 10, 14),
            now: time(12, 0),
        }
    }

    /// 8h Monday to Friday.
    pub fn accounting() -> Accounting {
        Accounting {
            policies: PolicyTable::new(vec![Policy {
                effective_from: date(2000, 1, 1),
                hours_by_weekday: [8.0, 8.0, 8.0, 8.0, 8.0, 0.0, 0.0],
            }])
            .unwrap(),
            ..Accounting::default()
        }
    }

    /// An empty calendar file; keep the directory alive for the test.
    pub fn file_calendar() -> (TempDir, FileCalendar) {
        let temp = TempDir::new().unwrap();
        let calendar = FileCalendar::open(&temp.path().join("events.json")).unwrap();
        (temp, calendar)
    }

    /// Inserts a local-time event and returns its id.
    pub fn add(
        calendar: &mut FileCalendar,
        summary: &str,
        day: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> String {
        let event = NewEvent::new(
            summary,
            "",
            "",
            local_to_utc(day, start).unwrap(),
            local_to_utc(day, end).unwrap(),
        );
        calendar.insert(&event).unwrap().id
    }
}
