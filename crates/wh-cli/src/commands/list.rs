//! List events by start date.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Args;
use wh_core::{Event, format_event};

use super::util::parse_date;
use crate::calendar::Calendar;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// First date to include (defaults to the beginning of time).
    #[arg(short, long)]
    pub start: Option<String>,

    /// Last date to include.
    #[arg(short, long, default_value = "today")]
    pub end: String,
}

/// Start of an unbounded range.
pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

/// Resolves a `--start`/`--end` pair.
pub fn date_range(
    start: Option<&str>,
    end: &str,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    let start = start.map_or(Ok(EPOCH), |raw| parse_date(raw, today))?;
    let end = parse_date(end, today)?;
    if end < start {
        bail!("end date {end} is before start date {start}");
    }
    Ok((start, end))
}

/// Listing lines for events whose start date is within `start..=end`.
pub fn render_list(events: &[Event], start: NaiveDate, end: NaiveDate) -> String {
    events
        .iter()
        .filter(|event| (start..=end).contains(&event.date()))
        .map(|event| format_event(event) + "\n")
        .collect()
}

pub fn run<W: Write>(
    writer: &mut W,
    calendar: &dyn Calendar,
    args: &ListArgs,
    today: NaiveDate,
) -> Result<()> {
    let (start, end) = date_range(args.start.as_deref(), &args.end, today)?;
    let events = calendar.events()?;
    write!(writer, "{}", render_list(&events, start, end))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::DateTime;
    use insta::assert_snapshot;
    use wh_core::EventTime;

    fn event(id: &str, summary: &str, start: &str, end: &str, description: Option<&str>) -> Event {
        Event {
            id: id.to_string(),
            summary: summary.to_string(),
            description: description.map(str::to_string),
            location: None,
            start: EventTime::DateTime(DateTime::parse_from_rfc3339(start).unwrap()),
            end: EventTime::DateTime(DateTime::parse_from_rfc3339(end).unwrap()),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_render_list_filters_by_start_date() {
        let events = vec![
            event("a1", "WORK", "2020-10-13T08:00:00+02:00", "2020-10-13T12:00:00+02:00", None),
            event(
                "b2",
                "WORK",
                "2020-10-14T08:00:00+02:00",
                "2020-10-14T16:45:30+02:00",
                Some("release"),
            ),
            event(
                "c3",
                "JOUR",
                "2020-10-14T17:00:00+02:00",
                "2020-10-14T17:00:00+02:00",
                Some("sync"),
            ),
            event("d4", "WORK", "2020-10-15T08:00:00+02:00", "2020-10-15T09:00:00+02:00", None),
        ];

        let output = render_list(&events, date(2020, 10, 14), date(2020, 10, 14));
        assert_snapshot!(output.trim_end(), @r"
        2020-10-14 08:00:00-16:45:30 (08:45:30 <) WORK [b2] : release
        2020-10-14 17:00:00-17:00:00 (-00:00:00  ) JOUR [c3] : sync
        ");
    }

    #[test]
    fn test_render_list_empty_range() {
        assert_eq!(render_list(&[], EPOCH, date(2020, 10, 14)), "");
    }

    #[test]
    fn test_date_range_defaults_and_validation() {
        let today = date(2020, 10, 14);
        assert_eq!(date_range(None, "today", today).unwrap(), (EPOCH, today));
        assert_eq!(
            date_range(Some("1 week ago"), "yesterday", today).unwrap(),
            (date(2020, 10, 7), date(2020, 10, 13))
        );
        assert!(date_range(Some("2020-10-15"), "2020-10-14", today).is_err());
    }
}
