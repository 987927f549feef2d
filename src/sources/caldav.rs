//! CalDAV `calendar-query` client.
//!
//! Sends a single `REPORT` against the configured collection URL, asking the
//! server for the events that overlap the rest of the render day, and pulls
//! the embedded iCalendar payloads out of the multistatus reply. No
//! principal or collection discovery is done.

use inkboard_common::RenderWindow;
use reqwest::{Client, Method};
use tracing::{debug, warn};
use url::Url;

use crate::error::SourceError;
use crate::settings::Credentials;

const CALDAV_TIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// `calendar-query` body restricted to VEVENTs overlapping `window`.
pub fn query_body(window: &RenderWindow) -> String {
    let start = window.now.naive_utc().format(CALDAV_TIME_FORMAT);
    let end = window.end_of_day.naive_utc().format(CALDAV_TIME_FORMAT);
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<C:calendar-query xmlns:D="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
  <D:prop>
    <C:calendar-data/>
  </D:prop>
  <C:filter>
    <C:comp-filter name="VCALENDAR">
      <C:comp-filter name="VEVENT">
        <C:time-range start="{start}" end="{end}"/>
      </C:comp-filter>
    </C:comp-filter>
  </C:filter>
</C:calendar-query>
"#
    )
}

/// Run the query and return the raw iCalendar payloads.
pub async fn query(
    client: &Client,
    url: &Url,
    credentials: &Credentials,
    window: &RenderWindow,
) -> Result<Vec<String>, SourceError> {
    let report = Method::from_bytes(b"REPORT").map_err(|e| SourceError::Request(e.to_string()))?;
    let response = client
        .request(report, url.clone())
        .basic_auth(&credentials.username, Some(&credentials.password))
        .header("Depth", "1")
        .header("Content-Type", "application/xml; charset=utf-8")
        .body(query_body(window))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status { status });
    }

    let body = response.text().await?;
    let payloads = extract_calendar_data(&body);
    if payloads.is_empty() && !body.contains("multistatus") {
        warn!(%url, "CalDAV reply is not a multistatus document");
        return Err(SourceError::Parse("expected a multistatus reply".into()));
    }
    debug!(%url, count = payloads.len(), "CalDAV query answered");
    Ok(payloads)
}

// =============================================================================
// Multistatus Scanning
// =============================================================================

/// Collect the text of every `calendar-data` element, whatever namespace
/// prefix the server picked. Empty and self-closing elements are skipped.
pub fn extract_calendar_data(xml: &str) -> Vec<String> {
    let mut payloads = Vec::new();
    let mut rest = xml;

    while let Some(open) = rest.find('<') {
        rest = &rest[open + 1..];
        let Some(tag_end) = rest.find('>') else { break };
        let tag = &rest[..tag_end];
        let name = tag.split(|c: char| c.is_whitespace() || c == '/').next().unwrap_or_default();
        let local = name.rsplit(':').next().unwrap_or(name);

        if local != "calendar-data" || tag.ends_with('/') {
            continue;
        }

        let body = &rest[tag_end + 1..];
        let close = format!("</{name}>");
        let Some(end) = body.find(&close) else { break };
        let raw = body[..end].trim();
        let text = match cdata(raw) {
            Some(inner) => inner.to_owned(),
            None => unescape_xml(raw),
        };
        if !text.trim().is_empty() {
            payloads.push(text);
        }
        rest = &body[end + close.len()..];
    }
    payloads
}

fn cdata(text: &str) -> Option<&str> { text.strip_prefix("<![CDATA[").and_then(|t| t.strip_suffix("]]>")) }

/// Replace the predefined entities and numeric character references.
fn unescape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let Some(semi) = rest.find(';') else { break };
        let entity = &rest[1..semi];
        let decoded = match entity {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
