//! Delete events by id.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use super::Mutation;
use super::util::{confirm, describe};
use crate::calendar::Calendar;

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Ids of the events to delete.
    #[arg(required = true)]
    pub ids: Vec<String>,
}

/// Shows and confirms each event in turn; declined ones are kept.
pub fn run<W: Write>(
    writer: &mut W,
    calendar: &mut dyn Calendar,
    args: &DeleteArgs,
    mutation: Mutation,
) -> Result<()> {
    for id in &args.ids {
        let record = calendar.get(id)?;
        writeln!(writer, "Delete event")?;
        writeln!(writer, "{}", describe(record)?)?;
        if confirm("Delete the above event?", mutation.force)? {
            calendar.delete(id)?;
            writeln!(writer, "Event deleted: {id}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::commands::testing::{add, date, file_calendar, forced, time};

    #[test]
    fn deletes_every_listed_event() {
        let (_temp, mut calendar) = file_calendar();
        let day = date(2020, 10, 14);
        let first = add(&mut calendar, "WORK", day, time(8, 0), time(9, 0));
        let second = add(&mut calendar, "JOUR", day, time(9, 0), time(10, 0));
        let kept = add(&mut calendar, "WORK", day, time(10, 0), time(11, 0));
        let mut output = Vec::new();

        let args = DeleteArgs {
            ids: vec![first, second.clone()],
        };
        run(&mut output, &mut calendar, &args, forced()).unwrap();

        let remaining: Vec<String> = calendar
            .list()
            .unwrap()
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(remaining, vec![kept]);

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("Delete event\n").count(), 2);
        assert!(output.contains(&format!("Event deleted: {second}")));
    }

    #[test]
    fn unknown_id_stops_before_later_ids() {
        let (_temp, mut calendar) = file_calendar();
        let id = add(&mut calendar, "WORK", date(2020, 10, 14), time(8, 0), time(9, 0));

        let args = DeleteArgs {
            ids: vec!["missing".to_string(), id],
        };
        assert!(run(&mut Vec::new(), &mut calendar, &args, forced()).is_err());
        assert_eq!(calendar.list().unwrap().len(), 1);
    }
}
