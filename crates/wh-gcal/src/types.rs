//! Request and response bodies for the Calendar v3 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wh_core::{EventDateTime, EventRecord};

/// Body for `events.insert`.
///
/// Times are written in UTC with an explicit `timeZone`, without recurrence,
/// attendees or default reminders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub recurrence: Vec<String>,
    pub attendees: Vec<Attendee>,
    pub reminders: Reminders,
}

impl NewEvent {
    pub fn new(
        summary: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            summary: summary.into(),
            location: location.into(),
            description: description.into(),
            start: EventDateTime::utc(start),
            end: EventDateTime::utc(end),
            recurrence: Vec::new(),
            attendees: Vec::new(),
            reminders: Reminders::default(),
        }
    }

    /// The record this body describes, before the calendar assigns an id.
    pub fn to_record(&self, id: impl Into<String>) -> EventRecord {
        EventRecord {
            id: id.into(),
            summary: Some(self.summary.clone()),
            description: Some(self.description.clone()).filter(|d| !d.is_empty()),
            location: Some(self.location.clone()).filter(|l| !l.is_empty()),
            start: Some(self.start.clone()),
            end: Some(self.end.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminders {
    pub use_default: bool,
    pub overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: u32,
}

/// Body for `events.patch`: only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDateTime>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies the patch to a record the way the API would.
    pub fn apply(&self, record: &mut EventRecord) {
        if let Some(summary) = &self.summary {
            record.summary = Some(summary.clone());
        }
        if let Some(description) = &self.description {
            record.description = Some(description.clone());
        }
        if let Some(location) = &self.location {
            record.location = Some(location.clone());
        }
        if let Some(start) = &self.start {
            record.start = Some(start.clone());
        }
        if let Some(end) = &self.end {
            record.end = Some(end.clone());
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CalendarListPage {
    #[serde(default)]
    pub items: Vec<CalendarListEntry>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CalendarListEntry {
    pub id: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventsPage {
    #[serde(default)]
    pub items: Vec<EventRecord>,
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    #[test]
    fn new_event_body_matches_api_shape() {
        let start = Utc.with_ymd_and_hms(2020, 10, 14, 8, 0, 0).unwrap();
        let event = NewEvent::new("WORK", "", "", start, start);
        let body = serde_json::to_value(&event).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "summary": "WORK",
                "location": "",
                "description": "",
                "start": {"dateTime": "2020-10-14T08:00:00+00:00", "timeZone": "UTC"},
                "end": {"dateTime": "2020-10-14T08:00:00+00:00", "timeZone": "UTC"},
                "recurrence": [],
                "attendees": [],
                "reminders": {"useDefault": false, "overrides": []},
            })
        );
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = EventPatch {
            summary: Some("JOUR".to_string()),
            ..EventPatch::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({"summary": "JOUR"})
        );
        assert!(!patch.is_empty());
        assert!(EventPatch::default().is_empty());
    }

    #[test]
    fn patch_apply_keeps_unset_fields() {
        let start = Utc.with_ymd_and_hms(2020, 10, 14, 8, 0, 0).unwrap();
        let mut record = NewEvent::new("WORK", "design", "", start, start).to_record("id-1");
        let end = EventDateTime::utc(Utc.with_ymd_and_hms(2020, 10, 14, 12, 0, 0).unwrap());

        EventPatch {
            end: Some(end.clone()),
            ..EventPatch::default()
        }
        .apply(&mut record);

        assert_eq!(record.summary.as_deref(), Some("WORK"));
        assert_eq!(record.description.as_deref(), Some("design"));
        assert_eq!(record.location, None);
        assert_eq!(record.end, Some(end));
    }
}
