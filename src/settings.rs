//! Runtime settings loaded from a JSON file.
//!
//! # Format
//!
//! ```json
//! {
//!   "log-level": "info",
//!   "page": "agenda",
//!   "output": "output.png",
//!   "time-zone": "Europe/Berlin",
//!   "all-day-style": "suffix",
//!   "time-format": "%H:%M",
//!   "date-format": "%B %-d, %Y",
//!   "assets": { "logo": "images/logo.png", "weather-icons": "images/weather" },
//!   "fetch": { "retries": 2, "backoff-ms": 500, "timeout-secs": 30 },
//!   "calendars": [
//!     { "type": "ical", "url": "https://example.com/cal.ics" },
//!     { "type": "caldav", "url": "https://dav.example.com/cal/", "username": "u", "password": "p" }
//!   ],
//!   "weather": { "latitude": 52.5, "longitude": 13.4, "time-zone": "Europe/Berlin" }
//! }
//! ```
//!
//! Everything is optional. Rendering the agenda page without `calendars` is
//! refused once the page to draw is known.
//!
//! # Calendar Type Inference
//!
//! Entries without a `type` are accepted: an entry carrying both `username`
//! and `password` is a CalDAV collection, anything else an iCal feed.
//!
//! Validation runs once at load time. A settings error is fatal and happens
//! before anything is fetched or drawn.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use chrono_tz::Tz;
use inkboard_common::{AllDayStyle, Page, Presentation};
use serde::Deserialize;
use url::Url;

use crate::clock::RenderZone;
use crate::error::SettingsError;

/// Log levels accepted in the settings file.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warning", "warn", "error"];

// =============================================================================
// Calendars
// =============================================================================

/// Basic-auth credentials.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum CalendarKind {
    Ical,
    Caldav,
}

/// Calendar entry as written in the file.
#[derive(Deserialize)]
struct RawCalendar {
    #[serde(rename = "type")]
    kind: Option<CalendarKind>,
    url: String,
    name: Option<String>,
    username: Option<String>,
    password: Option<String>,
}

/// A validated calendar source configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCalendar")]
pub enum CalendarConfig {
    /// An iCalendar feed fetched with a plain GET.
    ICal { url: Url, name: Option<String>, credentials: Option<Credentials> },
    /// A CalDAV calendar collection queried with `REPORT`.
    CalDav { url: Url, name: Option<String>, credentials: Credentials },
}

impl TryFrom<RawCalendar> for CalendarConfig {
    type Error = String;

    fn try_from(raw: RawCalendar) -> Result<Self, Self::Error> {
        let url = Url::parse(&raw.url).map_err(|e| format!("calendar URL {:?}: {e}", raw.url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!("calendar URL {:?} must use http or https", raw.url));
        }
        let credentials = match (raw.username, raw.password) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            _ => None,
        };
        let kind = raw.kind.unwrap_or(if credentials.is_some() { CalendarKind::Caldav } else { CalendarKind::Ical });

        match kind {
            CalendarKind::Ical => Ok(Self::ICal { url, name: raw.name, credentials }),
            CalendarKind::Caldav => match credentials {
                Some(c) if !c.username.is_empty() && !c.password.is_empty() => {
                    Ok(Self::CalDav { url, name: raw.name, credentials: c })
                }
                _ => Err(format!("CalDAV calendar {url} needs a username and a password")),
            },
        }
    }
}

impl CalendarConfig {
    pub const fn url(&self) -> &Url {
        match self {
            Self::ICal { url, .. } | Self::CalDav { url, .. } => url,
        }
    }

    /// Name used in logs: the configured name, else the URL host.
    pub fn label(&self) -> String {
        let name = match self {
            Self::ICal { name, .. } | Self::CalDav { name, .. } => name,
        };
        match name {
            Some(name) => name.clone(),
            None => self.url().host_str().unwrap_or("calendar").to_owned(),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Image locations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AssetSettings {
    pub logo: Option<PathBuf>,
    /// Directory with one `<icon-code>.png` per weather condition.
    pub weather_icons: Option<PathBuf>,
}

/// Network behaviour shared by calendar and weather requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchSettings {
    /// Extra attempts after the first failed one.
    pub retries: u32,
    /// Delay before the first retry, doubled for each further retry.
    pub backoff_ms: u64,
    pub timeout_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self { Self { retries: 2, backoff_ms: 500, timeout_secs: 30 } }
}

impl FetchSettings {
    #[inline]
    pub const fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }

    #[inline]
    pub const fn backoff(&self) -> Duration { Duration::from_millis(self.backoff_ms) }
}

/// Location for the weather lookup.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WeatherSettings {
    pub latitude: f64,
    pub longitude: f64,
    pub time_zone: Option<String>,
}

// =============================================================================
// Settings
// =============================================================================

fn default_log_level() -> String { "info".into() }

fn default_output() -> PathBuf { PathBuf::from("output.png") }

fn default_time_format() -> String { inkboard_common::config::DEFAULT_TIME_FORMAT.into() }

fn default_date_format() -> String { inkboard_common::config::DEFAULT_DATE_FORMAT.into() }

/// All runtime settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub page: Page,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// IANA zone for the render. Host local time when absent.
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub all_day_style: AllDayStyle,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub assets: AssetSettings,
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub calendars: Vec<CalendarConfig>,
    #[serde(default)]
    pub weather: Option<WeatherSettings>,
}

impl Settings {
    /// Read, parse and validate the settings file at `path`.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text =
            std::fs::read_to_string(path).map_err(|source| SettingsError::Io { path: path.to_owned(), source })?;
        Self::from_json(&text).map_err(|e| match e {
            SettingsError::Json { source, .. } => SettingsError::Json { path: path.to_owned(), source },
            other => other,
        })
    }

    /// Parse and validate settings from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(text).map_err(|source| SettingsError::Json { path: PathBuf::new(), source })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: String| Err(SettingsError::Invalid(msg));

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return invalid(format!("unknown log level {:?}", self.log_level));
        }
        if let Some(zone) = &self.time_zone {
            parse_zone(zone)?;
        }
        for (key, format) in [("time-format", &self.time_format), ("date-format", &self.date_format)] {
            if !is_valid_strftime(format) {
                return invalid(format!("{key} {format:?} is not a valid strftime pattern"));
            }
        }
        if let Some(weather) = &self.weather {
            if !(-90.0..=90.0).contains(&weather.latitude) {
                return invalid(format!("weather latitude {} out of range", weather.latitude));
            }
            if !(-180.0..=180.0).contains(&weather.longitude) {
                return invalid(format!("weather longitude {} out of range", weather.longitude));
            }
            if let Some(zone) = &weather.time_zone {
                parse_zone(zone)?;
            }
        }
        Ok(())
    }

    /// Zone for time-of-day computations.
    pub fn render_zone(&self) -> Result<RenderZone, SettingsError> {
        match &self.time_zone {
            Some(zone) => parse_zone(zone).map(RenderZone::Named),
            None => Ok(RenderZone::Local),
        }
    }

    /// Formatting choices handed to the views.
    pub fn presentation(&self) -> Presentation {
        Presentation {
            all_day: self.all_day_style,
            time_format: self.time_format.clone(),
            date_format: self.date_format.clone(),
        }
    }
}

fn parse_zone(zone: &str) -> Result<Tz, SettingsError> {
    zone.parse::<Tz>().map_err(|_| SettingsError::Invalid(format!("unknown time zone {zone:?}")))
}

fn is_valid_strftime(format: &str) -> bool { !StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) }

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const MINIMAL: &str = r#"{ "calendars": [ { "url": "https://example.com/cal.ics" } ] }"#;

    fn invalid_message(json: &str) -> String {
        match Settings::from_json(json) {
            Err(SettingsError::Invalid(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_json(MINIMAL).expect("valid settings");
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.page, Page::Agenda);
        assert_eq!(settings.output, PathBuf::from("output.png"));
        assert_eq!(settings.fetch, FetchSettings::default());
        assert_eq!(settings.render_zone().expect("zone"), RenderZone::Local);
        assert_eq!(settings.presentation(), Presentation::default());
        assert!(settings.weather.is_none());
    }

    #[test]
    fn test_untagged_inference() {
        let json = r#"{ "calendars": [
            { "url": "https://example.com/cal.ics" },
            { "url": "https://dav.example.com/cal/", "username": "u", "password": "p" }
        ] }"#;
        let settings = Settings::from_json(json).expect("valid settings");
        assert!(matches!(settings.calendars[0], CalendarConfig::ICal { credentials: None, .. }));
        assert!(matches!(settings.calendars[1], CalendarConfig::CalDav { .. }));
    }

    #[test]
    fn test_tagged_ical_keeps_credentials() {
        let json = r#"{ "calendars": [
            { "type": "ical", "url": "https://example.com/private.ics", "username": "u", "password": "p" }
        ] }"#;
        let settings = Settings::from_json(json).expect("valid settings");
        assert!(matches!(settings.calendars[0], CalendarConfig::ICal { credentials: Some(_), .. }));
    }

    #[test]
    fn test_caldav_requires_credentials() {
        let json = r#"{ "calendars": [ { "type": "caldav", "url": "https://dav.example.com/" } ] }"#;
        assert!(matches!(Settings::from_json(json), Err(SettingsError::Json { .. })));
    }

    #[test]
    fn test_bad_url_rejected() {
        let json = r#"{ "calendars": [ { "url": "not a url" } ] }"#;
        assert!(matches!(Settings::from_json(json), Err(SettingsError::Json { .. })));
        let json = r#"{ "calendars": [ { "url": "ftp://example.com/cal.ics" } ] }"#;
        assert!(matches!(Settings::from_json(json), Err(SettingsError::Json { .. })));
    }

    #[test]
    fn test_calendars_optional_in_file() {
        let agenda = Settings::from_json("{}").expect("the page can be overridden on the command line");
        assert_eq!(agenda.page, Page::Agenda);
        assert!(agenda.calendars.is_empty());
        let today = Settings::from_json(r#"{ "page": "today" }"#).expect("today needs no calendars");
        assert_eq!(today.page, Page::Today);
    }

    #[test]
    fn test_validation_errors() {
        let with = |extra: &str| {
            format!(r#"{{ "calendars": [ {{ "url": "https://example.com/cal.ics" }} ], {extra} }}"#)
        };
        assert!(invalid_message(&with(r#""log-level": "loud""#)).contains("log level"));
        assert!(invalid_message(&with(r#""time-zone": "Mars/Olympus""#)).contains("time zone"));
        assert!(invalid_message(&with(r#""time-format": "%Q""#)).contains("time-format"));
        assert!(invalid_message(&with(r#""weather": { "latitude": 95.0, "longitude": 0.0 }"#)).contains("latitude"));
        assert!(invalid_message(&with(r#""weather": { "latitude": 0.0, "longitude": 200.0 }"#)).contains("longitude"));
    }

    #[test]
    fn test_label() {
        let settings = Settings::from_json(
            r#"{ "calendars": [
                { "url": "https://example.com/cal.ics", "name": "Work" },
                { "url": "https://example.org/cal.ics" }
            ] }"#,
        )
        .expect("valid settings");
        assert_eq!(settings.calendars[0].label(), "Work");
        assert_eq!(settings.calendars[1].label(), "example.org");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(MINIMAL.as_bytes()).expect("write settings");
        let settings = Settings::load(file.path()).expect("valid settings");
        assert_eq!(settings.calendars.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing.json");
        assert!(matches!(Settings::load(&path), Err(SettingsError::Io { .. })));
    }

    #[test]
    fn test_load_reports_path_on_bad_json() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"{ not json").expect("write settings");
        match Settings::load(file.path()) {
            Err(SettingsError::Json { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected json error, got {other:?}"),
        }
    }

    #[test]
    fn test_debug_hides_password() {
        let credentials = Credentials { username: "u".into(), password: "secret".into() };
        assert!(!format!("{credentials:?}").contains("secret"));
    }
}
