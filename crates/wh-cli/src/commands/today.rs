//! Today's worked time against the expected hours.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;

use super::Accounting;
use crate::calendar::Calendar;

pub fn run<W: Write>(
    writer: &mut W,
    calendar: &dyn Calendar,
    accounting: &Accounting,
    today: NaiveDate,
) -> Result<()> {
    let events = calendar.events()?;
    writeln!(writer, "{}", accounting.today_line(&events, today)?)?;
    Ok(())
}
