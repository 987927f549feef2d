//! Event model and the ordered event collection.
//!
//! # Pipeline
//!
//! 1. Sources check each raw record with [`filter`] against the render's
//!    [`RenderWindow`] before building an [`Event`]
//! 2. Each source's batch is merged with [`EventCollection::add_events`]
//! 3. Views read the collection; nothing mutates it during drawing
//!
//! # Ordering
//!
//! The collection is sorted by the end time reduced to seconds since
//! midnight, ascending. The sort is stable, so events with the same end time
//! of day keep their insertion order.

use core::fmt::Write;

use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone, Timelike};

use crate::thresholds::FULL_DAY_SECS;

// =============================================================================
// Render Window
// =============================================================================

/// The time range a render cares about: from local midnight to 23:59:59 of
/// the day containing `now`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderWindow {
    pub now: DateTime<FixedOffset>,
    pub begin_of_day: DateTime<FixedOffset>,
    pub end_of_day: DateTime<FixedOffset>,
}

impl RenderWindow {
    #[inline]
    pub const fn new(
        now: DateTime<FixedOffset>,
        begin_of_day: DateTime<FixedOffset>,
        end_of_day: DateTime<FixedOffset>,
    ) -> Self {
        Self { now, begin_of_day, end_of_day }
    }

    /// Build the window for the calendar day containing `now`, keeping
    /// `now`'s offset all day. Zones with DST changes build their window
    /// from real wall-clock times instead.
    pub fn for_day(now: DateTime<FixedOffset>) -> Self {
        let at = |time: NaiveTime| {
            now.timezone()
                .from_local_datetime(&now.date_naive().and_time(time))
                .single()
                .unwrap_or(now)
        };
        Self {
            now,
            begin_of_day: NaiveTime::from_hms_opt(0, 0, 0).map_or(now, at),
            end_of_day: NaiveTime::from_hms_opt(23, 59, 59).map_or(now, at),
        }
    }

    /// See [`filter`].
    #[inline]
    pub fn is_relevant(
        &self,
        start: &DateTime<FixedOffset>,
        end: &DateTime<FixedOffset>,
    ) -> bool {
        filter(start, end, self)
    }
}

/// An event is relevant if it has not ended yet (`now < end`) and it starts
/// before the window closes (`start <= end_of_day`).
///
/// Evaluated on the source's raw start/end before an [`Event`] is built.
pub fn filter<Tz: TimeZone>(
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
    window: &RenderWindow,
) -> bool {
    window.now < *end && *start <= window.end_of_day
}

// =============================================================================
// Event
// =============================================================================

/// A single calendar entry, immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    summary: String,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    location: Option<String>,
}

impl Event {
    /// Build an event. An `end` before `start` is clamped to `start` so the
    /// duration is never negative. Blank locations are treated as absent.
    pub fn new(
        summary: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        location: Option<String>,
    ) -> Self {
        let end = if end < start { start } else { end };
        let location = location.filter(|l| !l.trim().is_empty());
        Self { summary: summary.into(), start, end, location }
    }

    #[inline]
    pub fn summary(&self) -> &str { &self.summary }

    #[inline]
    pub const fn start(&self) -> &DateTime<FixedOffset> { &self.start }

    #[inline]
    pub const fn end(&self) -> &DateTime<FixedOffset> { &self.end }

    #[inline]
    pub fn location(&self) -> Option<&str> { self.location.as_deref() }

    /// `end - start` in seconds (never negative).
    #[inline]
    pub fn duration_secs(&self) -> i64 { (self.end - self.start).num_seconds() }

    /// True iff start and end share hour, minute and second of day and the
    /// event spans at least one day.
    ///
    /// Time-of-day equality, not calendar-day equality, is the test: a
    /// three-day event from 14:00 to 14:00 also counts.
    pub fn is_full_day(&self) -> bool {
        self.start.hour() == self.end.hour()
            && self.start.minute() == self.end.minute()
            && self.start.second() == self.end.second()
            && self.duration_secs() >= FULL_DAY_SECS
    }

    /// Sort key: end time as seconds since midnight.
    #[inline]
    pub fn sort_key(&self) -> u32 { self.end.num_seconds_from_midnight() }

    /// Start time of day formatted with a `strftime` pattern.
    pub fn localized_start(
        &self,
        format: &str,
    ) -> String {
        format_time(&self.start, format)
    }

    /// End time of day formatted with a `strftime` pattern.
    pub fn localized_end(
        &self,
        format: &str,
    ) -> String {
        format_time(&self.end, format)
    }
}

/// Format `time` without panicking on an invalid pattern (yields "" instead).
pub fn format_time(
    time: &DateTime<FixedOffset>,
    format: &str,
) -> String {
    let mut out = String::new();
    if write!(out, "{}", time.format(format)).is_err() {
        out.clear();
    }
    out
}

// =============================================================================
// Event Collection
// =============================================================================

/// Events to render, ordered by end time of day.
#[derive(Clone, Debug, Default)]
pub struct EventCollection {
    events: Vec<Event>,
}

impl EventCollection {
    pub const fn new() -> Self { Self { events: Vec::new() } }

    /// Merge a batch, keeping the end-time-of-day order.
    ///
    /// An empty batch is a no-op. Equal keys keep insertion order.
    pub fn add_events(
        &mut self,
        batch: Vec<Event>,
    ) {
        if batch.is_empty() {
            return;
        }
        self.events.extend(batch);
        self.events.sort_by_key(Event::sort_key);
    }

    #[inline]
    pub fn len(&self) -> usize { self.events.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.events.is_empty() }

    #[inline]
    pub fn as_slice(&self) -> &[Event] { &self.events }

    pub fn iter(&self) -> impl Iterator<Item = &Event> { self.events.iter() }

    /// Full-day events in collection order.
    pub fn full_day(&self) -> impl Iterator<Item = &Event> { self.events.iter().filter(|e| e.is_full_day()) }

    /// Timed (not full-day) events in collection order.
    pub fn timed(&self) -> impl Iterator<Item = &Event> { self.events.iter().filter(|e| !e.is_full_day()) }
}
