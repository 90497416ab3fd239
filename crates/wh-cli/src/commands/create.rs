//! Create a finished event from a date and two times.

use std::io::Write;

use anyhow::{Result, bail};
use clap::Args;
use wh_gcal::NewEvent;

use super::Mutation;
use super::util::{describe, local_to_utc, parse_date, parse_time};
use crate::calendar::Calendar;

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Date of the event (YYYY-MM-DD, today, yesterday, "3 days ago").
    #[arg(short, long, default_value = "today")]
    pub date: String,

    /// Start time (HH:MM, local).
    #[arg(short, long)]
    pub start: String,

    /// End time (HH:MM, local).
    #[arg(short, long)]
    pub end: String,

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
    args: &CreateArgs,
    mutation: Mutation,
) -> Result<()> {
    let date = parse_date(&args.date, mutation.today)?;
    let start = local_to_utc(date, parse_time(&args.start)?)?;
    let end = local_to_utc(date, parse_time(&args.end)?)?;
    if end < start {
        bail!("event would end at {} before it starts at {}", args.end, args.start);
    }

    let event = NewEvent::new(
        &args.summary,
        &args.description,
        &args.location,
        start,
        end,
    );
    let stored = calendar.insert(&event)?;
    writeln!(writer, "Event created: {}", describe(stored)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use wh_core::Event;

    use crate::commands::testing::{date, file_calendar, forced};

    fn args(date: &str, start: &str, end: &str) -> CreateArgs {
        CreateArgs {
            date: date.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            summary: "WORK".to_string(),
            description: "planning".to_string(),
            location: String::new(),
        }
    }

    #[test]
    fn creates_event_on_the_local_date() {
        let (_temp, mut calendar) = file_calendar();
        let mut output = Vec::new();

        run(&mut output, &mut calendar, &args("yesterday", "08:00", "16:30"), forced()).unwrap();

        let events = calendar.events().unwrap();
        assert_eq!(events.len(), 1);
        let event: &Event = &events[0];
        assert_eq!(event.date(), date(2020, 10, 13));
        assert_eq!(event.duration().unwrap(), Duration::minutes(510));
        assert_eq!(event.description.as_deref(), Some("planning"));

        let output = String::from_utf8(output).unwrap();
        assert!(
            output.starts_with("Event created: 2020-10-13 08:00:00-16:30:00 (08:30:00 <) WORK [")
        );
        assert!(output.trim_end().ends_with("] : planning"));
    }

    #[test]
    fn rejects_end_before_start() {
        let (_temp, mut calendar) = file_calendar();
        let err = run(
            &mut Vec::new(),
            &mut calendar,
            &args("2020-10-14", "12:00", "11:00"),
            forced(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("before it starts"));
        assert!(calendar.list().unwrap().is_empty());
    }

    #[test]
    fn rejects_unparsable_time() {
        let (_temp, mut calendar) = file_calendar();
        assert!(
            run(
                &mut Vec::new(),
                &mut calendar,
                &args("2020-10-14", "8h", "11:00"),
                forced(),
            )
            .is_err()
        );
    }
}
