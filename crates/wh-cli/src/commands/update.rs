//! Replace fields of an existing event.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use clap::Args;
use wh_core::{Event, EventDateTime, EventTime, format_event};
use wh_gcal::EventPatch;

use super::Mutation;
use super::util::{confirm, describe, local_to_utc, parse_date, parse_time};
use crate::calendar::Calendar;

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Id of the event to update.
    #[arg(short, long)]
    pub id: String,

    /// Move the event to this date, keeping its times unless given.
    #[arg(short, long)]
    pub date: Option<String>,

    /// New start time (HH:MM, local).
    #[arg(short, long)]
    pub start: Option<String>,

    /// New end time (HH:MM, local).
    #[arg(short, long)]
    pub end: Option<String>,

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
    args: &UpdateArgs,
    mutation: Mutation,
) -> Result<()> {
    let record = calendar.get(&args.id)?;
    let event = Event::try_from(record.clone()).context("calendar returned a malformed event")?;

    let patch = build_patch(&event, args, mutation.today)?;
    if patch.is_empty() {
        bail!("nothing to update; pass at least one field to change");
    }

    let mut updated = record;
    patch.apply(&mut updated);
    if patch.start.is_some() || patch.end.is_some() {
        Event::try_from(updated.clone())
            .and_then(|event| event.duration().map(drop))
            .context("updated event would be invalid")?;
    }

    writeln!(writer, "Replace event")?;
    writeln!(writer, "{}", format_event(&event))?;
    writeln!(writer, "with:")?;
    writeln!(writer, "{}", describe(updated)?)?;
    if !confirm("Update the above event?", mutation.force)? {
        return Ok(());
    }

    let stored = calendar.patch(&args.id, &patch)?;
    writeln!(writer, "Event updated: {}", describe(stored)?)?;
    Ok(())
}

fn build_patch(event: &Event, args: &UpdateArgs, today: NaiveDate) -> Result<EventPatch> {
    let date = args
        .date
        .as_deref()
        .map(|raw| parse_date(raw, today))
        .transpose()?;
    Ok(EventPatch {
        summary: args.summary.clone(),
        description: args.description.clone(),
        location: args.location.clone(),
        start: moved(event.start, date, args.start.as_deref())?,
        end: moved(event.end, date, args.end.as_deref())?,
    })
}

/// The endpoint with its local date and/or time replaced; `None` when neither changes.
fn moved(
    endpoint: EventTime,
    date: Option<NaiveDate>,
    time: Option<&str>,
) -> Result<Option<EventDateTime>> {
    if date.is_none() && time.is_none() {
        return Ok(None);
    }
    let EventTime::DateTime(at) = endpoint else {
        bail!("cannot change the times of an all-day event");
    };
    let current = at.with_timezone(&Local).naive_local();
    let date = date.unwrap_or_else(|| current.date());
    let time = time.map_or_else(|| Ok(current.time()), parse_time)?;
    Ok(Some(EventDateTime::utc(local_to_utc(date, time)?)))
}
