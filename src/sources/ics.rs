//! Minimal iCalendar (RFC 5545) reader shared by both source kinds.
//!
//! Reads `VEVENT` components and the handful of properties the agenda shows:
//! `SUMMARY`, `LOCATION`, `DTSTART`, `DTEND`, `DURATION` and `STATUS`.
//!
//! # Times
//!
//! | Form | Example | Interpreted as |
//! |------|---------|----------------|
//! | UTC | `20261016T070000Z` | that instant |
//! | Zoned | `TZID=Europe/Berlin:20261016T090000` | wall clock in the named zone |
//! | Floating | `20261016T090000` | wall clock in the render zone |
//! | Date | `VALUE=DATE:20261016` | midnight in the render zone |
//!
//! Everything ends up in the render zone. A missing `DTEND` falls back to
//! `DURATION`, then to one day for date starts, then to a zero-length event.
//!
//! Each record is checked against the render window before an
//! [`Event`] is built. Recurrence rules are not expanded: a recurring
//! series contributes its first occurrence only.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use inkboard_common::{Event, RenderWindow};
use tracing::debug;

use crate::clock::RenderZone;
use crate::error::SourceError;

// =============================================================================
// Content Lines
// =============================================================================

/// Join folded lines: a line starting with a space or tab continues the
/// previous one.
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        if let Some(rest) = raw.strip_prefix([' ', '\t']) {
            if let Some(last) = lines.last_mut() {
                last.push_str(rest);
                continue;
            }
        }
        if !raw.is_empty() {
            lines.push(raw.to_owned());
        }
    }
    lines
}

/// `NAME;PARAM=VALUE;...:VALUE`
#[derive(Debug, PartialEq, Eq)]
struct ContentLine<'a> {
    name: String,
    params: Vec<(String, &'a str)>,
    value: &'a str,
}

impl<'a> ContentLine<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let mut in_quotes = false;
        let colon = line.char_indices().find_map(|(i, c)| {
            match c {
                '"' => in_quotes = !in_quotes,
                ':' if !in_quotes => return Some(i),
                _ => {}
            }
            None
        })?;
        let (head, value) = (&line[..colon], &line[colon + 1..]);
        let mut parts = head.split(';');
        let name = parts.next()?.trim().to_ascii_uppercase();
        let params = parts
            .filter_map(|p| p.split_once('='))
            .map(|(k, v)| (k.trim().to_ascii_uppercase(), v.trim().trim_matches('"')))
            .collect();
        Some(Self { name, params, value })
    }

    fn param(
        &self,
        key: &str,
    ) -> Option<&'a str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

/// Undo RFC 5545 TEXT escaping.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(escaped @ (',' | ';' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

// =============================================================================
// Date Values
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DateValue {
    Date(NaiveDate),
    Utc(NaiveDateTime),
    Zoned(Tz, NaiveDateTime),
    Floating(NaiveDateTime),
}

impl DateValue {
    fn parse(line: &ContentLine<'_>) -> Option<Self> {
        let value = line.value.trim();
        if line.param("VALUE") == Some("DATE") || value.len() == 8 {
            return NaiveDate::parse_from_str(value, "%Y%m%d").ok().map(Self::Date);
        }
        if let Some(utc) = value.strip_suffix('Z') {
            return NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S").ok().map(Self::Utc);
        }
        let local = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").ok()?;
        match line.param("TZID") {
            Some(tzid) => match tzid.trim_start_matches('/').parse::<Tz>() {
                Ok(tz) => Some(Self::Zoned(tz, local)),
                Err(_) => {
                    debug!(tzid, "unknown TZID, treating time as floating");
                    Some(Self::Floating(local))
                }
            },
            None => Some(Self::Floating(local)),
        }
    }

    fn resolve(
        self,
        zone: RenderZone,
    ) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Date(date) => zone.start_of(date),
            Self::Utc(utc) => Some(zone.convert(utc.and_utc())),
            Self::Zoned(tz, local) => zone.resolve_in(tz, local),
            Self::Floating(local) => zone.resolve(local),
        }
    }
}

/// ISO 8601 duration as used by `DURATION` (`P1D`, `PT1H30M`, `-P1W`).
fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (negative, rest) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let rest = rest.strip_prefix('P')?;

    let mut total: i64 = 0;
    let mut digits = String::new();
    let mut in_time = false;
    for c in rest.chars() {
        if c == 'T' {
            in_time = true;
            continue;
        }
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let n: i64 = digits.parse().ok()?;
        digits.clear();
        let unit: i64 = match (c, in_time) {
            ('W', false) => 7 * 86_400,
            ('D', false) => 86_400,
            ('H', true) => 3_600,
            ('M', true) => 60,
            ('S', true) => 1,
            _ => return None,
        };
        total = total.checked_add(n.checked_mul(unit)?)?;
    }
    if !digits.is_empty() {
        return None;
    }
    Duration::try_seconds(if negative { -total } else { total })
}

// =============================================================================
// Events
// =============================================================================

#[derive(Default)]
struct RawEvent {
    summary: Option<String>,
    location: Option<String>,
    start: Option<DateValue>,
    end: Option<DateValue>,
    duration: Option<Duration>,
    bad_duration: bool,
    cancelled: bool,
}

impl RawEvent {
    fn apply(
        &mut self,
        line: &ContentLine<'_>,
    ) {
        match line.name.as_str() {
            "SUMMARY" => self.summary = Some(unescape_text(line.value)),
            "LOCATION" => self.location = Some(unescape_text(line.value)),
            "DTSTART" => self.start = DateValue::parse(line),
            "DTEND" => self.end = DateValue::parse(line),
            "DURATION" => {
                self.duration = parse_duration(line.value);
                self.bad_duration = self.duration.is_none();
            }
            "STATUS" => self.cancelled = line.value.trim().eq_ignore_ascii_case("CANCELLED"),
            _ => {}
        }
    }

    /// Resolve times, check the window and build the event.
    fn into_event(
        self,
        window: &RenderWindow,
        zone: RenderZone,
    ) -> Option<Event> {
        let summary = self.summary.unwrap_or_else(|| "(no title)".into());
        if self.cancelled {
            debug!(%summary, "skipping cancelled event");
            return None;
        }
        if self.bad_duration {
            debug!(%summary, "skipping event with an unreadable DURATION");
            return None;
        }
        let Some(start_value) = self.start else {
            debug!(%summary, "skipping event without DTSTART");
            return None;
        };
        let Some(start) = start_value.resolve(zone) else {
            debug!(%summary, "skipping event with an unresolvable start");
            return None;
        };
        let end = match (self.end, self.duration, start_value) {
            (Some(end), _, _) => end.resolve(zone),
            (None, Some(duration), _) => start.checked_add_signed(duration),
            (None, None, DateValue::Date(date)) => date.succ_opt().and_then(|next| zone.start_of(next)),
            (None, None, _) => Some(start),
        };
        let Some(end) = end else {
            debug!(%summary, "skipping event with an unresolvable end");
            return None;
        };

        if !window.is_relevant(&start, &end) {
            return None;
        }
        Some(Event::new(summary, start, end, self.location))
    }
}

/// Parse one `VCALENDAR` document and keep the events relevant to `window`.
///
/// Malformed events are skipped. Only a payload without any calendar is an
/// error.
pub fn parse_calendar(
    text: &str,
    window: &RenderWindow,
    zone: RenderZone,
) -> Result<Vec<Event>, SourceError> {
    let lines = unfold(text);
    let is_calendar = lines
        .iter()
        .filter_map(|l| ContentLine::parse(l))
        .any(|l| l.name == "BEGIN" && l.value.trim().eq_ignore_ascii_case("VCALENDAR"));
    if !is_calendar {
        return Err(SourceError::Parse("no VCALENDAR component".into()));
    }

    let mut events = Vec::new();
    let mut current: Option<RawEvent> = None;
    // Depth of components nested inside the current VEVENT (e.g. VALARM)
    let mut nested = 0usize;

    for line in lines.iter().filter_map(|l| ContentLine::parse(l)) {
        let component = line.value.trim().to_ascii_uppercase();
        match (line.name.as_str(), current.is_some()) {
            ("BEGIN", false) if component == "VEVENT" => current = Some(RawEvent::default()),
            ("BEGIN", true) => nested += 1,
            ("END", true) if nested > 0 => nested -= 1,
            ("END", true) if component == "VEVENT" => {
                if let Some(event) = current.take().and_then(|raw| raw.into_event(window, zone)) {
                    events.push(event);
                }
            }
            (_, true) if nested == 0 => {
                if let Some(raw) = current.as_mut() {
                    raw.apply(&line);
                }
            }
            _ => {}
        }
    }

    debug!(count = events.len(), "parsed calendar");
    Ok(events)
}
