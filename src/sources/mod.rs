//! Calendar sources.
//!
//! A source is either a plain iCalendar feed fetched with `GET` or a CalDAV
//! collection queried with `REPORT`. Both end in [`ics::parse_calendar`], so
//! they produce the same window-filtered [`Event`]s.

pub mod caldav;
pub mod ics;

use std::time::Duration;

use inkboard_common::{Event, RenderWindow};
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::clock::RenderZone;
use crate::error::SourceError;
use crate::settings::{CalendarConfig, Credentials};

/// Shared HTTP client for calendar and weather requests.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// One configured calendar, ready to load.
#[derive(Clone, Debug)]
pub enum CalendarSource {
    ICal {
        label: String,
        url: Url,
        credentials: Option<Credentials>,
    },
    CalDav {
        label: String,
        url: Url,
        credentials: Credentials,
    },
}

impl From<&CalendarConfig> for CalendarSource {
    fn from(config: &CalendarConfig) -> Self {
        let label = config.label();
        match config {
            CalendarConfig::ICal { url, credentials, .. } => {
                Self::ICal { label, url: url.clone(), credentials: credentials.clone() }
            }
            CalendarConfig::CalDav { url, credentials, .. } => {
                Self::CalDav { label, url: url.clone(), credentials: credentials.clone() }
            }
        }
    }
}

impl CalendarSource {
    /// Name used in logs.
    pub fn label(&self) -> &str {
        match self {
            Self::ICal { label, .. } | Self::CalDav { label, .. } => label,
        }
    }

    /// Fetch and parse this source, keeping only events relevant to `window`.
    pub async fn load(
        &self,
        client: &Client,
        window: &RenderWindow,
        zone: RenderZone,
    ) -> Result<Vec<Event>, SourceError> {
        match self {
            Self::ICal { url, credentials, .. } => {
                let text = download(client, url, credentials.as_ref()).await?;
                ics::parse_calendar(&text, window, zone)
            }
            Self::CalDav { url, credentials, label } => {
                let mut events = Vec::new();
                for payload in caldav::query(client, url, credentials, window).await? {
                    match ics::parse_calendar(&payload, window, zone) {
                        Ok(batch) => events.extend(batch),
                        Err(e) => warn!(source = %label, error = %e, "skipping unreadable CalDAV object"),
                    }
                }
                Ok(events)
            }
        }
    }
}

async fn download(
    client: &Client,
    url: &Url,
    credentials: Option<&Credentials>,
) -> Result<String, SourceError> {
    let mut request = client.get(url.clone());
    if let Some(credentials) = credentials {
        request = request.basic_auth(&credentials.username, Some(&credentials.password));
    }
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status { status });
    }
    let text = response.text().await?;
    debug!(%url, bytes = text.len(), "downloaded calendar");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const ICS: &str = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\n\
        BEGIN:VEVENT\r\nSUMMARY:Standup\r\nDTSTART:20261016T090000\r\nDTEND:20261016T091500\r\nEND:VEVENT\r\n\
        END:VCALENDAR\r\n";

    fn window() -> RenderWindow {
        let now = chrono_tz::Europe::Berlin
            .with_ymd_and_hms(2026, 10, 16, 8, 0, 0)
            .single()
            .expect("valid test time")
            .fixed_offset();
        RenderWindow::for_day(now)
    }

    fn client() -> Client { http_client(Duration::from_secs(5)).expect("client builds") }

    fn url(
        server: &mockito::ServerGuard,
        path: &str,
    ) -> Url {
        Url::parse(&format!("{}{path}", server.url())).expect("valid mock url")
    }

    const BERLIN: RenderZone = RenderZone::Named(chrono_tz::Europe::Berlin);

    #[test]
    fn test_from_config_label() {
        let config: CalendarConfig = serde_json::from_str(r#"{"url": "https://cal.example.com/a.ics"}"#).expect("valid config");
        let source = CalendarSource::from(&config);
        assert_eq!(source.label(), "cal.example.com");
        assert!(matches!(source, CalendarSource::ICal { credentials: None, .. }));
    }

    #[tokio::test]
    async fn test_ical_download() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/team.ics")
            .with_status(200)
            .with_header("content-type", "text/calendar")
            .with_body(ICS)
            .create_async()
            .await;

        let source = CalendarSource::ICal { label: "team".into(), url: url(&server, "/team.ics"), credentials: None };
        let events = source.load(&client(), &window(), BERLIN).await.expect("source loads");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary(), "Standup");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ical_status_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/gone.ics").with_status(404).create_async().await;

        let source = CalendarSource::ICal { label: "gone".into(), url: url(&server, "/gone.ics"), credentials: None };
        let err = source.load(&client(), &window(), BERLIN).await.expect_err("404 fails");
        assert!(matches!(err, SourceError::Status { status } if status == reqwest::StatusCode::NOT_FOUND));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_caldav_report() {
        let mut server = mockito::Server::new_async().await;
        let escaped = ICS.replace('\r', "&#13;");
        let body = format!(
            "<?xml version=\"1.0\"?><d:multistatus xmlns:d=\"DAV:\" xmlns:c=\"urn:ietf:params:xml:ns:caldav\">\
             <d:response><d:propstat><d:prop><c:calendar-data>{escaped}</c:calendar-data></d:prop></d:propstat></d:response>\
             </d:multistatus>"
        );
        let mock = server
            .mock("REPORT", "/dav/work/")
            .match_header("depth", "1")
            // "alice:secret"
            .match_header("authorization", "Basic YWxpY2U6c2VjcmV0")
            .match_body(mockito::Matcher::Regex("calendar-query".into()))
            .with_status(207)
            .with_body(body)
            .create_async()
            .await;

        let source = CalendarSource::CalDav {
            label: "work".into(),
            url: url(&server, "/dav/work/"),
            credentials: Credentials { username: "alice".into(), password: "secret".into() },
        };
        let events = source.load(&client(), &window(), BERLIN).await.expect("source loads");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].localized_start("%H:%M"), "09:00");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_caldav_rejects_non_multistatus() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("REPORT", "/dav/")
            .with_status(200)
            .with_body("<html>sign in</html>")
            .create_async()
            .await;

        let source = CalendarSource::CalDav {
            label: "dav".into(),
            url: url(&server, "/dav/"),
            credentials: Credentials { username: "u".into(), password: "p".into() },
        };
        let err = source.load(&client(), &window(), BERLIN).await.expect_err("not multistatus");
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
