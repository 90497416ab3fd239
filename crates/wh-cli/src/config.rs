//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Duration;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use wh_core::{AccountingError, Categories, Policy, PolicyTable};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Display name of the calendar holding the work events.
    pub calendar: String,
    /// OAuth bearer token for the Google Calendar API.
    pub access_token: Option<String>,
    /// Google Calendar API root.
    pub api_base: String,
    /// Local JSON calendar used instead of the remote API when set.
    pub events_file: Option<PathBuf>,
    /// Expected hours when no policy entry applies.
    pub fallback_hours: f64,
    pub full_day_off: Vec<String>,
    pub ignored: Vec<String>,
    /// Expected-hours policies, searched in file order.
    pub expected: Vec<Policy>,
    /// Highlight weekends and subtotals in summaries.
    pub color: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("calendar", &self.calendar)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("api_base", &self.api_base)
            .field("events_file", &self.events_file)
            .field("fallback_hours", &self.fallback_hours)
            .field("full_day_off", &self.full_day_off)
            .field("ignored", &self.ignored)
            .field("expected", &self.expected)
            .field("color", &self.color)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let categories = Categories::default();
        Self {
            calendar: "Work Hours".to_string(),
            access_token: None,
            api_base: wh_gcal::GOOGLE_CALENDAR_API.to_string(),
            events_file: None,
            fallback_hours: 7.2,
            full_day_off: categories.full_day_off,
            ignored: categories.ignored,
            expected: Vec::new(),
            color: true,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // WH_CALENDAR, WH_ACCESS_TOKEN, WH_EVENTS_FILE, ...
        figment = figment.merge(Env::prefixed("WH_"));

        figment.extract()
    }

    /// The policy table with the configured fallback.
    pub fn policy_table(&self) -> Result<PolicyTable, AccountingError> {
        let fallback = hours_to_duration(self.fallback_hours).ok_or_else(|| {
            AccountingError::InvalidPolicy {
                effective_from: chrono::NaiveDate::MIN,
                reason: format!(
                    "fallback_hours must be finite and non-negative, got {}",
                    self.fallback_hours
                ),
            }
        })?;
        Ok(PolicyTable::new(self.expected.clone())?.with_fallback(fallback))
    }

    pub fn categories(&self) -> Categories {
        Categories {
            full_day_off: self.full_day_off.clone(),
            ignored: self.ignored.clone(),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "hours are validated as a small non-negative value first"
)]
fn hours_to_duration(hours: f64) -> Option<Duration> {
    (hours.is_finite() && hours >= 0.0)
        .then(|| Duration::milliseconds((hours * 3_600_000.0).round() as i64))
}

/// Returns the platform-specific config directory for work-hours.
///
/// On Linux: `~/.config/work-hours`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("work-hours"))
}
