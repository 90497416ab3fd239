//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use chrono::{
    DateTime, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike, Utc,
};
use dialoguer::Confirm;
use regex::Regex;
use wh_core::event::DATE_FORMAT;
use wh_core::{Event, EventRecord, EventTime, format_event};

/// Pre-compiled regex for relative date parsing.
static RELATIVE_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Conservative bound for relative dates (~1000 years in days).
const MAX_RELATIVE_DAYS: i64 = 1000 * 365;

/// Parse a date as `YYYY-MM-DD` or relative to `today`.
///
/// Supports:
/// - ISO dates: "2020-10-14"
/// - "today", "yesterday"
/// - Relative: "3 days ago", "1 week ago"
pub fn parse_date(s: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(date);
    }
    match s {
        "today" => return Ok(today),
        "yesterday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    let Some(caps) = RELATIVE_DATE_RE.captures(s) else {
        bail!(
            "Invalid date: {s}. Use YYYY-MM-DD, 'today', 'yesterday' \
             or relative (e.g., '3 days ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;
    let days_per_unit = if &caps[2] == "week" { 7 } else { 1 };

    if n > MAX_RELATIVE_DAYS / days_per_unit {
        bail!("Relative date value too large: {n} {}", &caps[2]);
    }

    Ok(today - Duration::days(n * days_per_unit))
}

/// Parse a wall-clock time as `HH:MM` or `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .with_context(|| format!("Invalid time: {s}. Use HH:MM (e.g., 08:30)"))
}

/// Converts a local date and time to UTC.
/// Ambiguous times (DST fall-back) resolve to the earlier instant.
pub fn local_to_utc(date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>> {
    let local = date.and_time(time);
    match Local.from_local_datetime(&local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
        LocalResult::None => bail!("{local} does not exist in the local time zone"),
    }
}

/// Current local date and time of day, truncated to the minute.
pub fn now_local() -> (NaiveDate, NaiveTime) {
    let now = Local::now().naive_local();
    let time = now
        .time()
        .with_second(0)
        .and_then(|time| time.with_nanosecond(0))
        .unwrap_or_else(|| now.time());
    (now.date(), time)
}

/// The listing line for a stored record.
pub fn describe(record: EventRecord) -> Result<String> {
    let event = Event::try_from(record).context("calendar returned a malformed event")?;
    Ok(format_event(&event))
}

/// Start instant of a timed event.
pub fn start_instant(event: &Event) -> Option<DateTime<Utc>> {
    match event.start {
        EventTime::DateTime(at) => Some(at.with_timezone(&Utc)),
        EventTime::Date(_) => None,
    }
}

/// Asks a yes/no question, defaulting to no. `--force` answers yes.
pub fn confirm(prompt: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("failed to read confirmation")
}
