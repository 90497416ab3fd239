//! Calendar event records and their validated form.
//!
//! [`EventRecord`] is the shape the event source hands over (a subset of the
//! Google Calendar `events` resource). [`Event`] is what the engine computes
//! on: both endpoints parsed, summary present.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::AccountingError;

/// Date format for all-day (`date`) endpoints.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw event as supplied by the calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Opaque identifier, only meaningful to the calendar.
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDateTime>,
}

/// One endpoint of a raw event: either `dateTime` or `date` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    /// Builds a timed endpoint, normalised to UTC like the events the CLI writes.
    pub fn utc(at: DateTime<chrono::Utc>) -> Self {
        Self {
            date_time: Some(at.to_rfc3339()),
            date: None,
            time_zone: Some("UTC".to_string()),
        }
    }
}

/// A parsed event endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    /// A timestamp in the offset it was written with.
    DateTime(DateTime<FixedOffset>),
    /// An all-day placeholder.
    Date(NaiveDate),
}

impl EventTime {
    fn parse(raw: &EventDateTime) -> Result<Self, String> {
        if let Some(value) = raw.date_time.as_deref() {
            return DateTime::parse_from_rfc3339(value)
                .map(Self::DateTime)
                .map_err(|err| format!("unparsable dateTime {value:?}: {err}"));
        }
        if let Some(value) = raw.date.as_deref() {
            return NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map(Self::Date)
                .map_err(|err| format!("unparsable date {value:?}: {err}"));
        }
        Err("neither dateTime nor date is set".to_string())
    }

    /// Calendar date in the endpoint's own offset.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::DateTime(at) => at.date_naive(),
            Self::Date(date) => *date,
        }
    }

    /// Wall-clock time in the endpoint's own offset; `None` for all-day endpoints.
    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            Self::DateTime(at) => Some(at.time()),
            Self::Date(_) => None,
        }
    }
}

/// A validated calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    /// Category label, e.g. `WORK` or `VACATION`.
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
}

impl TryFrom<EventRecord> for Event {
    type Error = AccountingError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let id = record.id;
        let summary = record
            .summary
            .filter(|summary| !summary.is_empty())
            .ok_or_else(|| AccountingError::malformed(&id, "missing summary"))?;
        let start = record
            .start
            .as_ref()
            .ok_or_else(|| AccountingError::malformed(&id, "missing start"))
            .and_then(|raw| {
                EventTime::parse(raw)
                    .map_err(|reason| AccountingError::malformed(&id, format!("start: {reason}")))
            })?;
        let end = record
            .end
            .as_ref()
            .ok_or_else(|| AccountingError::malformed(&id, "missing end"))
            .and_then(|raw| {
                EventTime::parse(raw)
                    .map_err(|reason| AccountingError::malformed(&id, format!("end: {reason}")))
            })?;

        Ok(Self {
            id,
            summary,
            description: record.description,
            location: record.location,
            start,
            end,
        })
    }
}

impl Event {
    /// Validates a batch of records, failing on the first malformed one.
    pub fn from_records(
        records: impl IntoIterator<Item = EventRecord>,
    ) -> Result<Vec<Self>, AccountingError> {
        records.into_iter().map(Self::try_from).collect()
    }

    /// The date the event belongs to: its start date in its own offset.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Literal wall-clock span.
    ///
    /// Zero for an ongoing event. Fails for spans that end before they start
    /// and for all-day endpoints, which have no wall-clock length.
    pub fn duration(&self) -> Result<Duration, AccountingError> {
        match (self.start, self.end) {
            (EventTime::DateTime(start), EventTime::DateTime(end)) => {
                let span = end - start;
                if span < Duration::zero() {
                    return Err(AccountingError::malformed(
                        &self.id,
                        format!("ends {} seconds before it starts", -span.num_seconds()),
                    ));
                }
                Ok(span)
            }
            _ => Err(AccountingError::malformed(
                &self.id,
                "all-day event has no wall-clock duration",
            )),
        }
    }

    /// An open-ended event written by `start`: timed, with `start == end`.
    pub fn is_ongoing(&self) -> bool {
        matches!(
            (self.start, self.end),
            (EventTime::DateTime(start), EventTime::DateTime(end)) if start == end
        )
    }
}

/// Earliest start date among `events`.
pub fn earliest_date(events: &[Event]) -> Option<NaiveDate> {
    events.iter().map(Event::date).min()
}

/// The events of a single calendar date.
///
/// Single-day computations (the ledger and the timeline) take this instead of
/// a bare slice, so an event from another date cannot slip in unnoticed.
#[derive(Debug, Clone)]
pub struct DayEvents<'a> {
    date: NaiveDate,
    events: Vec<&'a Event>,
}

impl<'a> DayEvents<'a> {
    /// Selects the events starting on `date`, keeping their order.
    pub fn on(events: &'a [Event], date: NaiveDate) -> Self {
        Self {
            date,
            events: events.iter().filter(|event| event.date() == date).collect(),
        }
    }

    /// Wraps a list the caller already filtered to `date`.
    pub fn new(
        date: NaiveDate,
        events: impl IntoIterator<Item = &'a Event>,
    ) -> Result<Self, AccountingError> {
        let events: Vec<&Event> = events.into_iter().collect();
        if let Some(stray) = events.iter().find(|event| event.date() != date) {
            return Err(AccountingError::EventOutsideDay {
                id: stray.id.clone(),
                date: stray.date(),
                expected: date,
            });
        }
        Ok(Self { date, events })
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Event> + '_ {
        self.events.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
