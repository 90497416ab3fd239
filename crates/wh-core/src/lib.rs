//! Core time-accounting engine for work-hours.
//!
//! This crate contains the fundamental types and logic for:
//! - Policy resolution: expected hours for a date
//! - Classification: worked, full-day-off and ignored event categories
//! - Timelines: fixed-resolution ASCII occupancy bars
//! - Summaries: day/week/month/total deviations over a date range
//!
//! It performs no I/O; events and policies are supplied by the caller.

mod error;
pub mod event;
mod format;
mod ledger;
pub mod policy;
pub mod summary;
pub mod timeline;

pub use error::AccountingError;
pub use event::{DayEvents, Event, EventDateTime, EventRecord, EventTime, earliest_date};
pub use format::{
    ELAPSED_FORMAT, format_deviation, format_elapsed, format_event, format_signed_duration,
    seconds_f64,
};
pub use ledger::{Categories, Category, total_worked};
pub use policy::{DEFAULT_EXPECTED_SECONDS, Policy, PolicyTable, expected_duration};
pub use summary::{
    DayReport, Summary, SummaryEntry, SummaryOptions, deviation_seconds, summarize, today_line,
};
pub use timeline::{TimelineWindow, render_timeline};
