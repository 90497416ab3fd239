//! Range summaries: per-day deviations rolled up by week, month and total.
//!
//! # Algorithm Summary
//!
//! 1. Clamp the range start to the earliest event date
//! 2. Walk the range one calendar day at a time
//! 3. On a Monday, close the running week; on the 1st, close the running month
//! 4. Add the day's deviation (worked minus expected) to every running bucket

use chrono::{Datelike, Duration, Month, NaiveDate, Weekday};

use crate::error::AccountingError;
use crate::event::{DayEvents, Event, earliest_date};
use crate::format::{ELAPSED_FORMAT, format_deviation, format_elapsed, seconds_f64};
use crate::ledger::{Categories, total_worked};
use crate::policy::{PolicyTable, expected_duration};
use crate::timeline::{TimelineWindow, render_timeline};

/// Which entries a summary records.
#[derive(Debug, Clone)]
pub struct SummaryOptions {
    pub days: bool,
    pub weeks: bool,
    pub months: bool,
    /// Window for the per-day timeline. Default: the whole day.
    pub timeline: TimelineWindow,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            days: false,
            weeks: false,
            months: false,
            timeline: TimelineWindow::full_day(),
        }
    }
}

/// One day of a summary.
#[derive(Debug, Clone, PartialEq)]
pub struct DayReport {
    pub date: NaiveDate,
    pub worked: Duration,
    pub expected: Duration,
    /// Worked minus expected, in seconds.
    pub deviation: f64,
    /// Total deviation from the start of the range up to and including this day.
    pub running_total: f64,
    pub timeline: String,
}

impl DayReport {
    pub fn is_weekend(&self) -> bool {
        matches!(self.date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// `date worked deviation timeline running_total`.
    pub fn render(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.date,
            format_elapsed(self.worked, ELAPSED_FORMAT),
            format_deviation(self.deviation),
            self.timeline,
            format_deviation(self.running_total)
        )
    }
}

/// A summary line, in walk order.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryEntry {
    Day(DayReport),
    /// A completed ISO week.
    Week { year: i32, week: u32, deviation: f64 },
    /// A completed calendar month.
    Month { year: i32, month: u32, deviation: f64 },
}

impl SummaryEntry {
    pub fn render(&self) -> String {
        match self {
            Self::Day(day) => day.render(),
            Self::Week {
                week, deviation, ..
            } => format!(" ** WEEK {week} SUMMARY: {}", format_deviation(*deviation)),
            Self::Month {
                month, deviation, ..
            } => format!(
                " **** {} SUMMARY: {}",
                month_name(*month),
                format_deviation(*deviation)
            ),
        }
    }
}

fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .map_or("?", |month| month.name())
}

/// Result of [`summarize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// First day walked: the later of `start` and the earliest event, else `end`.
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub entries: Vec<SummaryEntry>,
    /// Sum of all daily deviations in the walked range, in seconds.
    pub total: f64,
}

impl Summary {
    pub fn days(&self) -> impl Iterator<Item = &DayReport> {
        self.entries.iter().filter_map(|entry| match entry {
            SummaryEntry::Day(day) => Some(day),
            _ => None,
        })
    }

    pub fn total_line(&self) -> String {
        format!("Total: {}", format_deviation(self.total))
    }
}

/// Running deviation buckets for one walk.
#[derive(Debug, Default)]
struct Accumulators {
    total: f64,
    week: f64,
    month: f64,
    week_days: u32,
    month_days: u32,
}

impl Accumulators {
    fn add(&mut self, deviation: f64) {
        self.total += deviation;
        self.week += deviation;
        self.month += deviation;
        self.week_days += 1;
        self.month_days += 1;
    }

    /// Closes the week; `None` when no day of it was walked.
    fn take_week(&mut self) -> Option<f64> {
        let days = std::mem::take(&mut self.week_days);
        let deviation = std::mem::take(&mut self.week);
        (days > 0).then_some(deviation)
    }

    fn take_month(&mut self) -> Option<f64> {
        let days = std::mem::take(&mut self.month_days);
        let deviation = std::mem::take(&mut self.month);
        (days > 0).then_some(deviation)
    }
}

/// Worked minus expected, in seconds. Positive means overworked.
pub fn deviation_seconds(worked: Duration, expected: Duration) -> f64 {
    seconds_f64(worked) - seconds_f64(expected)
}

/// Summarizes `events` over `start..=end`.
///
/// The walk begins at the later of `start` and the earliest event date;
/// without events only `end` is walked.
/// Week and month entries are recorded *before* the Monday / 1st that closes
/// them and only cover days inside the walk. Any malformed event in the
/// range fails the whole summary.
pub fn summarize(
    events: &[Event],
    start: NaiveDate,
    end: NaiveDate,
    policies: &PolicyTable,
    categories: &Categories,
    options: &SummaryOptions,
) -> Result<Summary, AccountingError> {
    let start = start.max(earliest_date(events).unwrap_or(end));
    tracing::debug!(%start, %end, events = events.len(), "summarizing range");

    let mut acc = Accumulators::default();
    let mut entries = Vec::new();

    for date in start.iter_days().take_while(|date| *date <= end) {
        let previous = date.pred_opt().unwrap_or(date);

        if date.weekday() == Weekday::Mon {
            if let Some(deviation) = acc.take_week().filter(|_| options.weeks) {
                let iso = previous.iso_week();
                entries.push(SummaryEntry::Week {
                    year: iso.year(),
                    week: iso.week(),
                    deviation,
                });
            }
        }
        if date.day() == 1 {
            if let Some(deviation) = acc.take_month().filter(|_| options.months) {
                entries.push(SummaryEntry::Month {
                    year: previous.year(),
                    month: previous.month(),
                    deviation,
                });
            }
        }

        let day = DayEvents::on(events, date);
        let worked = total_worked(&day, policies, categories)?;
        let expected = expected_duration(date, policies);
        let deviation = deviation_seconds(worked, expected);
        acc.add(deviation);

        if options.days {
            entries.push(SummaryEntry::Day(DayReport {
                date,
                worked,
                expected,
                deviation,
                running_total: acc.total,
                timeline: render_timeline(&day, &options.timeline),
            }));
        }
    }

    Ok(Summary {
        start,
        end,
        entries,
        total: acc.total,
    })
}

/// `Total time worked today: worked/expected deviation`.
pub fn today_line(worked: Duration, expected: Duration) -> String {
    format!(
        "Total time worked today: {}/{} {}",
        format_elapsed(worked, ELAPSED_FORMAT),
        format_elapsed(expected, ELAPSED_FORMAT),
        format_deviation(deviation_seconds(worked, expected))
    )
}
