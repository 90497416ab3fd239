//! Google Calendar v3 client for work-hours.
//!
//! Covers the handful of REST calls the tracker needs:
//! - Resolving a calendar id from its display name
//! - Listing, fetching, inserting, patching and deleting events
//!
//! Authentication is a bearer access token obtained elsewhere.

mod types;

use std::fmt;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use wh_core::EventRecord;

pub use types::{Attendee, EventPatch, NewEvent, ReminderOverride, Reminders};

use types::{CalendarListPage, EventsPage};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Production API root.
pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

/// Calendar client errors.
#[derive(Debug, Error)]
pub enum GcalError {
    /// The provided access token was invalid.
    #[error("invalid access token: {reason}")]
    InvalidToken { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// The configured API root is not a usable base URL.
    #[error("invalid API base URL {0:?}")]
    InvalidBaseUrl(String),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// No calendar in the user's list has this name.
    #[error("no calendar named {name:?}")]
    CalendarNotFound { name: String },
}

/// Google Calendar API client.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    access_token: String,
    base_url: Url,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("access_token", &"[REDACTED]")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client against the production API.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or whitespace-only, or if the
    /// HTTP client fails to build.
    pub fn new(access_token: impl Into<String>) -> Result<Self, GcalError> {
        let access_token = access_token.into();

        if access_token.is_empty() {
            return Err(GcalError::InvalidToken {
                reason: "access token cannot be empty",
            });
        }
        if access_token.trim().is_empty() {
            return Err(GcalError::InvalidToken {
                reason: "access token cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(GcalError::ClientBuild)?;
        let base_url = parse_base_url(GOOGLE_CALENDAR_API)?;

        Ok(Self {
            http,
            access_token,
            base_url,
        })
    }

    /// Points the client at another API root, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, GcalError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Looks up the id of the calendar whose summary is `name`.
    pub async fn find_calendar_id(&self, name: &str) -> Result<String, GcalError> {
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self.request(Method::GET, &["users", "me", "calendarList"])?;
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let page: CalendarListPage = send_json(request).await?;
            if let Some(entry) = page.items.into_iter().find(|entry| entry.summary == name) {
                debug!(calendar = name, id = %entry.id, "resolved calendar");
                return Ok(entry.id);
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => {
                    return Err(GcalError::CalendarNotFound {
                        name: name.to_string(),
                    });
                }
            }
        }
    }

    /// All events of a calendar, recurring events expanded, ordered by start.
    pub async fn list_events(&self, calendar_id: &str) -> Result<Vec<EventRecord>, GcalError> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .request(Method::GET, &["calendars", calendar_id, "events"])?
                .query(&[("singleEvents", "true"), ("orderBy", "startTime")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }
            let page: EventsPage = send_json(request).await?;
            events.extend(page.items);
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        debug!(calendar = calendar_id, count = events.len(), "listed events");
        Ok(events)
    }

    pub async fn get_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<EventRecord, GcalError> {
        let request = self.request(Method::GET, &["calendars", calendar_id, "events", event_id])?;
        send_json(request).await
    }

    /// Inserts an event and returns it as stored, with its assigned id.
    pub async fn insert_event(
        &self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> Result<EventRecord, GcalError> {
        let request = self
            .request(Method::POST, &["calendars", calendar_id, "events"])?
            .json(event);
        send_json(request).await
    }

    /// Updates only the fields set in `patch`.
    pub async fn patch_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        patch: &EventPatch,
    ) -> Result<EventRecord, GcalError> {
        let request = self
            .request(Method::PATCH, &["calendars", calendar_id, "events", event_id])?
            .json(patch);
        send_json(request).await
    }

    pub async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<(), GcalError> {
        let request =
            self.request(Method::DELETE, &["calendars", calendar_id, "events", event_id])?;
        send(request).await.map(drop)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, GcalError> {
        let url = endpoint(&self.base_url, segments)?;
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(&self.access_token))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, GcalError> {
    let url = Url::parse(raw).map_err(|_| GcalError::InvalidBaseUrl(raw.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(GcalError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(url)
}

/// Appends percent-encoded path segments to the API root.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, GcalError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| GcalError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Sends a request and returns the body of a successful response.
async fn send(request: RequestBuilder) -> Result<String, GcalError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(parse_api_error(status.as_u16(), &body).unwrap_or_else(|| GcalError::Api {
            status: status.as_u16(),
            message: body,
        }));
    }
    Ok(body)
}

async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, GcalError> {
    let body = send(request).await?;
    serde_json::from_str(&body).map_err(|err| GcalError::InvalidResponse(err.to_string()))
}

fn parse_api_error(status: u16, body: &str) -> Option<GcalError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| GcalError::Api {
            status,
            message: payload.error.message,
        })
}
