//! Event loading across all configured sources.
//!
//! Sources are loaded one after the other. A failing source is retried while
//! its error is transient, then logged and skipped; it never aborts the
//! render. Whatever the surviving sources return is merged into one
//! [`EventCollection`].

use std::future::Future;
use std::time::Duration;

use inkboard_common::{EventCollection, RenderWindow};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::clock::RenderZone;
use crate::error::SourceError;
use crate::settings::FetchSettings;
use crate::sources::CalendarSource;

/// Retry behaviour for one source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Extra attempts after the first one.
    pub retries: u32,
    /// Delay before the first retry, doubled after each one.
    pub backoff: Duration,
}

impl From<&FetchSettings> for FetchPolicy {
    fn from(settings: &FetchSettings) -> Self { Self { retries: settings.retries, backoff: settings.backoff() } }
}

/// Result of loading one source.
#[derive(Debug)]
pub struct SourceOutcome {
    pub label: String,
    /// Number of relevant events on success.
    pub result: Result<usize, SourceError>,
}

/// Run `op` until it succeeds, fails permanently or runs out of retries.
pub async fn with_retry<T, F, Fut>(
    policy: FetchPolicy,
    label: &str,
    mut op: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut delay = policy.backoff;
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.retries => {
                attempt += 1;
                debug!(source = label, attempt, error = %e, ?delay, "retrying");
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Load every source into `events` and report how each one went.
pub async fn fetch_events(
    sources: &[CalendarSource],
    client: &Client,
    window: &RenderWindow,
    zone: RenderZone,
    policy: FetchPolicy,
    events: &mut EventCollection,
) -> Vec<SourceOutcome> {
    let mut outcomes = Vec::with_capacity(sources.len());

    for source in sources {
        let label = source.label();
        let result = with_retry(policy, label, || source.load(client, window, zone)).await;
        let result = match result {
            Ok(batch) => {
                let count = batch.len();
                debug!(source = label, count, "source loaded");
                events.add_events(batch);
                Ok(count)
            }
            Err(e) => {
                warn!(source = label, error = %e, "calendar source failed, skipping");
                Err(e)
            }
        };
        outcomes.push(SourceOutcome { label: label.to_owned(), result });
    }

    let failed: Vec<&str> = outcomes.iter().filter(|o| o.result.is_err()).map(|o| o.label.as_str()).collect();
    info!(sources = sources.len(), ?failed, events = events.len(), "events loaded");
    outcomes
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use chrono::TimeZone;
    use url::Url;

    use super::*;
    use crate::sources::http_client;

    const FAST: FetchPolicy = FetchPolicy { retries: 2, backoff: Duration::from_millis(1) };

    const BERLIN: RenderZone = RenderZone::Named(chrono_tz::Europe::Berlin);

    fn window() -> RenderWindow {
        let now = chrono_tz::Europe::Berlin
            .with_ymd_and_hms(2026, 10, 16, 8, 0, 0)
            .single()
            .expect("valid test time")
            .fixed_offset();
        RenderWindow::for_day(now)
    }

    fn unavailable() -> SourceError { SourceError::Status { status: reqwest::StatusCode::SERVICE_UNAVAILABLE } }

    #[tokio::test]
    async fn test_retry_until_success() {
        let calls = Cell::new(0);
        let result = with_retry(FAST, "flaky", || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move { if n < 3 { Err(unavailable()) } else { Ok(n) } }
        })
        .await;
        assert_eq!(result.expect("third attempt succeeds"), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retry(FAST, "down", || {
            calls.set(calls.get() + 1);
            async { Err(unavailable()) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let calls = Cell::new(0);
        let result: Result<(), _> = with_retry(FAST, "broken", || {
            calls.set(calls.get() + 1);
            async { Err(SourceError::Parse("no VCALENDAR component".into())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_policy_from_settings() {
        let policy = FetchPolicy::from(&FetchSettings::default());
        assert_eq!(policy, FetchPolicy { retries: 2, backoff: Duration::from_millis(500) });
    }

    #[tokio::test]
    async fn test_failed_source_is_skipped() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server
            .mock("GET", "/ok.ics")
            .with_status(200)
            .with_body(concat!(
                "BEGIN:VCALENDAR\r\n",
                "BEGIN:VEVENT\r\nSUMMARY:Late\r\nDTSTART:20261016T170000\r\nDTEND:20261016T180000\r\nEND:VEVENT\r\n",
                "BEGIN:VEVENT\r\nSUMMARY:Early\r\nDTSTART:20261016T090000\r\nDTEND:20261016T100000\r\nEND:VEVENT\r\n",
                "END:VCALENDAR\r\n",
            ))
            .create_async()
            .await;
        let _missing = server.mock("GET", "/missing.ics").with_status(404).create_async().await;

        let source = |label: &str, path: &str| CalendarSource::ICal {
            label: label.into(),
            url: Url::parse(&format!("{}{path}", server.url())).expect("valid mock url"),
            credentials: None,
        };
        let sources = [source("missing", "/missing.ics"), source("ok", "/ok.ics")];
        let client = http_client(Duration::from_secs(5)).expect("client builds");

        let mut events = EventCollection::new();
        let outcomes = fetch_events(&sources, &client, &window(), BERLIN, FAST, &mut events).await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].result.is_err());
        assert_eq!(outcomes[1].result.as_ref().ok(), Some(&2));
        let summaries: Vec<_> = events.iter().map(|e| e.summary()).collect();
        assert_eq!(summaries, vec!["Early", "Late"]);
    }
}
