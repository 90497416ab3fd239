//! Start an open-ended event.
//!
//! An ongoing event is stored with `start == end`; `stop` later sets its end.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;
use wh_core::{Event, EventDateTime, format_event};
use wh_gcal::{EventPatch, NewEvent};

use super::Mutation;
use super::util::{confirm, describe, local_to_utc, parse_date, parse_time, start_instant};
use crate::calendar::Calendar;

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Date of the event (defaults to today).
    #[arg(short, long)]
    pub date: Option<String>,

    /// Start time (HH:MM, local; defaults to now).
    #[arg(short, long)]
    pub start: Option<String>,

    /// Category of the event.
    #[arg(short = 'S', long, default_value = "WORK")]
    pub summary: String,

    #[arg(short = 'D', long, default_value = "")]
    pub description: String,

    #[arg(short, long, default_value = "")]
    pub location: String,
}

pub fn run<W: Write>(
    writer: &mut W,
    calendar: &mut dyn Calendar,
    args: &StartArgs,
    mutation: Mutation,
) -> Result<()> {
    let date = match &args.date {
        Some(raw) => parse_date(raw, mutation.today)?,
        None => mutation.today,
    };
    let time = match &args.start {
        Some(raw) => parse_time(raw)?,
        None => mutation.now,
    };
    let start = local_to_utc(date, time)?;

    let ongoing: Vec<Event> = calendar
        .events()?
        .into_iter()
        .filter(Event::is_ongoing)
        .collect();

    match ongoing.as_slice() {
        [] => {}
        [event] => {
            writeln!(writer, "There is an ongoing event:")?;
            writeln!(writer, "{}", format_event(event))?;
            if confirm("Stop the ongoing event at this time?", mutation.force)? {
                if start_instant(event).is_some_and(|began| start < began) {
                    bail!("cannot stop event {} before it started", event.id);
                }
                let patch = EventPatch {
                    end: Some(EventDateTime::utc(start)),
                    ..EventPatch::default()
                };
                let stopped = calendar.patch(&event.id, &patch)?;
                writeln!(writer, "Event stopped: {}", describe(stopped)?)?;
            }
        }
        events => {
            writeln!(
                writer,
                "There are {} ongoing events, consider stopping them before starting new.",
                events.len()
            )?;
            for event in events {
                writeln!(writer, "{}", format_event(event))?;
            }
            if !confirm("Start event anyway?", mutation.force)? {
                return Ok(());
            }
        }
    }

    let event = NewEvent::new(
        &args.summary,
        &args.description,
        &args.location,
        start,
        start,
    );
    let stored = calendar.insert(&event)?;
    writeln!(writer, "Event started: {}", describe(stored)?)?;
    Ok(())
}
