//! Stop the ongoing event.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;
use wh_core::{Event, EventDateTime, format_event};
use wh_gcal::EventPatch;

use super::Mutation;
use super::util::{confirm, describe, local_to_utc, parse_date, parse_time, start_instant};
use crate::calendar::Calendar;

#[derive(Debug, Args)]
pub struct StopArgs {
    /// Date of the stop time (defaults to today).
    #[arg(short, long)]
    pub date: Option<String>,

    /// Stop time (HH:MM, local; defaults to now).
    #[arg(short, long)]
    pub end: Option<String>,

    /// Replace the category.
    #[arg(short = 'S', long)]
    pub summary: Option<String>,

    #[arg(short = 'D', long)]
    pub description: Option<String>,

    #[arg(short, long)]
    pub location: Option<String>,
}

pub fn run<W: Write>(
    writer: &mut W,
    calendar: &mut dyn Calendar,
    args: &StopArgs,
    mutation: Mutation,
) -> Result<()> {
    let ongoing: Vec<Event> = calendar
        .events()?
        .into_iter()
        .filter(Event::is_ongoing)
        .collect();
    let [event] = ongoing.as_slice() else {
        bail!(
            "expected exactly one ongoing event, found {}",
            ongoing.len()
        );
    };

    let date = match &args.date {
        Some(raw) => parse_date(raw, mutation.today)?,
        None => mutation.today,
    };
    let time = match &args.end {
        Some(raw) => parse_time(raw)?,
        None => mutation.now,
    };
    let end = local_to_utc(date, time)?;
    if start_instant(event).is_some_and(|began| end < began) {
        bail!("cannot stop event {} before it started", event.id);
    }

    writeln!(writer, "Event to update:")?;
    writeln!(writer, "{}", format_event(event))?;
    if !confirm("Stop that event?", mutation.force)? {
        return Ok(());
    }

    let patch = EventPatch {
        summary: args.summary.clone(),
        description: args.description.clone(),
        location: args.location.clone(),
        start: None,
        end: Some(EventDateTime::utc(end)),
    };
    let stopped = calendar.patch(&event.id, &patch)?;
    writeln!(writer, "Event stopped: {}", describe(stopped)?)?;
    Ok(())
}
