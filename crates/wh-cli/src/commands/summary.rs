//! Summary command: deviation from expected hours over a date range.
//!
//! Human output is the day/week/month report from [`crate::render`];
//! `--json` emits the same entries as structured data.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use wh_core::{Summary, SummaryEntry, SummaryOptions, summarize};

use super::Accounting;
use super::list::date_range;
use crate::calendar::Calendar;
use crate::render::summary_report;

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// First date to include (defaults to the earliest event).
    #[arg(short, long)]
    pub start: Option<String>,

    /// Last date to include.
    #[arg(short, long, default_value = "today")]
    pub end: String,

    /// Print a line per day with its timeline.
    #[arg(short, long)]
    pub days: bool,

    /// Print a subtotal after each completed week.
    #[arg(short, long)]
    pub weeks: bool,

    /// Print a subtotal after each completed month.
    #[arg(short, long)]
    pub months: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct JsonSummary {
    start: NaiveDate,
    end: NaiveDate,
    total_seconds: f64,
    entries: Vec<JsonEntry>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum JsonEntry {
    Day {
        date: NaiveDate,
        worked_seconds: i64,
        expected_seconds: i64,
        deviation_seconds: f64,
        running_total_seconds: f64,
        timeline: String,
    },
    Week {
        year: i32,
        week: u32,
        deviation_seconds: f64,
    },
    Month {
        year: i32,
        month: u32,
        deviation_seconds: f64,
    },
}

impl From<&SummaryEntry> for JsonEntry {
    fn from(entry: &SummaryEntry) -> Self {
        match entry {
            SummaryEntry::Day(day) => Self::Day {
                date: day.date,
                worked_seconds: day.worked.num_seconds(),
                expected_seconds: day.expected.num_seconds(),
                deviation_seconds: day.deviation,
                running_total_seconds: day.running_total,
                timeline: day.timeline.clone(),
            },
            SummaryEntry::Week {
                year,
                week,
                deviation,
            } => Self::Week {
                year: *year,
                week: *week,
                deviation_seconds: *deviation,
            },
            SummaryEntry::Month {
                year,
                month,
                deviation,
            } => Self::Month {
                year: *year,
                month: *month,
                deviation_seconds: *deviation,
            },
        }
    }
}

/// Serializes a summary as pretty JSON.
pub fn format_summary_json(summary: &Summary) -> Result<String> {
    let json = JsonSummary {
        start: summary.start,
        end: summary.end,
        total_seconds: summary.total,
        entries: summary.entries.iter().map(JsonEntry::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

pub fn run<W: Write>(
    writer: &mut W,
    calendar: &dyn Calendar,
    accounting: &Accounting,
    args: &SummaryArgs,
    today: NaiveDate,
    color: bool,
) -> Result<()> {
    let (start, end) = date_range(args.start.as_deref(), &args.end, today)?;
    let events = calendar.events()?;
    let options = SummaryOptions {
        days: args.days,
        weeks: args.weeks,
        months: args.months,
        ..SummaryOptions::default()
    };
    let summary = summarize(
        &events,
        start,
        end,
        &accounting.policies,
        &accounting.categories,
        &options,
    )
    .context("failed to summarize work hours")?;

    if args.json {
        writeln!(writer, "{}", format_summary_json(&summary)?)?;
    } else {
        writeln!(writer, "{}", summary_report(&summary, color))?;
    }
    Ok(())
}
