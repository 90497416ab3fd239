//! Event stores the commands read from and write to.
//!
//! [`RemoteCalendar`] talks to Google Calendar; [`FileCalendar`] keeps the
//! same event records in a local JSON file, for offline use and for tests.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, NaiveDate, Utc};
use tokio::runtime::Runtime;
use tracing::{debug, info};
use wh_core::event::DATE_FORMAT;
use wh_core::{Event, EventDateTime, EventRecord};
use wh_gcal::{Client, EventPatch, NewEvent};

use crate::Config;

/// A calendar of work events.
pub trait Calendar {
    /// Every event record.
    fn list(&self) -> Result<Vec<EventRecord>>;
    fn get(&self, id: &str) -> Result<EventRecord>;
    /// Stores a new event and returns it with its assigned id.
    fn insert(&mut self, event: &NewEvent) -> Result<EventRecord>;
    fn patch(&mut self, id: &str, patch: &EventPatch) -> Result<EventRecord>;
    fn delete(&mut self, id: &str) -> Result<()>;

    /// Every event, validated.
    fn events(&self) -> Result<Vec<Event>> {
        Event::from_records(self.list()?).context("calendar contains a malformed event")
    }
}

/// Opens the calendar selected by the configuration.
pub fn open(config: &Config) -> Result<Box<dyn Calendar>> {
    if let Some(path) = &config.events_file {
        return Ok(Box::new(FileCalendar::open(path)?));
    }
    let token = config
        .access_token
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            anyhow!(
                "missing access token (set WH_ACCESS_TOKEN, access_token in config.toml, \
                 or use --events-file)"
            )
        })?;
    let calendar = RemoteCalendar::connect(token, &config.api_base, &config.calendar)?;
    Ok(Box::new(calendar))
}

/// Google Calendar through the async client, driven on a private runtime.
pub struct RemoteCalendar {
    client: Client,
    calendar_id: String,
    runtime: Runtime,
}

impl RemoteCalendar {
    /// Builds the client and resolves `calendar` to its id.
    pub fn connect(token: &str, api_base: &str, calendar: &str) -> Result<Self> {
        let client = Client::new(token)
            .and_then(|client| client.with_base_url(api_base))
            .context("failed to create calendar client")?;
        let runtime = Runtime::new().context("failed to initialize tokio runtime")?;
        let calendar_id = runtime
            .block_on(client.find_calendar_id(calendar))
            .with_context(|| format!("failed to find calendar {calendar:?}"))?;
        Ok(Self {
            client,
            calendar_id,
            runtime,
        })
    }
}

impl Calendar for RemoteCalendar {
    fn list(&self) -> Result<Vec<EventRecord>> {
        self.runtime
            .block_on(self.client.list_events(&self.calendar_id))
            .context("failed to list events")
    }

    fn get(&self, id: &str) -> Result<EventRecord> {
        self.runtime
            .block_on(self.client.get_event(&self.calendar_id, id))
            .with_context(|| format!("failed to fetch event {id}"))
    }

    fn insert(&mut self, event: &NewEvent) -> Result<EventRecord> {
        let stored = self
            .runtime
            .block_on(self.client.insert_event(&self.calendar_id, event))
            .context("failed to create event")?;
        info!(id = %stored.id, "event created");
        Ok(stored)
    }

    fn patch(&mut self, id: &str, patch: &EventPatch) -> Result<EventRecord> {
        let stored = self
            .runtime
            .block_on(self.client.patch_event(&self.calendar_id, id, patch))
            .with_context(|| format!("failed to update event {id}"))?;
        info!(id, "event updated");
        Ok(stored)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.runtime
            .block_on(self.client.delete_event(&self.calendar_id, id))
            .with_context(|| format!("failed to delete event {id}"))?;
        info!(id, "event deleted");
        Ok(())
    }
}

/// Event records in a JSON array on disk, rewritten after every change.
#[derive(Debug)]
pub struct FileCalendar {
    path: PathBuf,
    records: Vec<EventRecord>,
}

impl FileCalendar {
    /// Reads `path`; a missing file is an empty calendar.
    pub fn open(path: &Path) -> Result<Self> {
        let records = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
        } else {
            Vec::new()
        };
        debug!(path = %path.display(), count = records.len(), "opened events file");
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| anyhow!("no event with id {id}"))
    }

    fn save(&mut self) -> Result<()> {
        self.records.sort_by_key(start_key);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

impl Calendar for FileCalendar {
    fn list(&self) -> Result<Vec<EventRecord>> {
        Ok(self.records.clone())
    }

    fn get(&self, id: &str) -> Result<EventRecord> {
        Ok(self.records[self.position(id)?].clone())
    }

    fn insert(&mut self, event: &NewEvent) -> Result<EventRecord> {
        let mut record = event.to_record(uuid::Uuid::new_v4().simple().to_string());
        localize(&mut record);
        self.records.push(record.clone());
        self.save()?;
        info!(id = %record.id, "event created");
        Ok(record)
    }

    fn patch(&mut self, id: &str, patch: &EventPatch) -> Result<EventRecord> {
        let index = self.position(id)?;
        let record = &mut self.records[index];
        patch.apply(record);
        localize(record);
        let record = record.clone();
        self.save()?;
        info!(id, "event updated");
        Ok(record)
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let index = self.position(id)?;
        self.records.remove(index);
        self.save()?;
        info!(id, "event deleted");
        Ok(())
    }
}

/// Rewrites UTC timestamps in the local offset, the way Google returns
/// events in the calendar's own zone.
fn localize(record: &mut EventRecord) {
    for endpoint in [record.start.as_mut(), record.end.as_mut()]
        .into_iter()
        .flatten()
    {
        localize_endpoint(endpoint);
    }
}

fn localize_endpoint(endpoint: &mut EventDateTime) {
    let Some(local) = endpoint
        .date_time
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|at| at.with_timezone(&Local))
    else {
        return;
    };
    endpoint.date_time = Some(local.fixed_offset().to_rfc3339());
}

/// Sort key for the file order: start instant, all-day events at UTC midnight.
fn start_key(record: &EventRecord) -> Option<DateTime<Utc>> {
    let start = record.start.as_ref()?;
    if let Some(raw) = start.date_time.as_deref() {
        return DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|at| at.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(start.date.as_deref()?, DATE_FORMAT).ok()?;
    Some(date.and_time(chrono::NaiveTime::MIN).and_utc())
}
