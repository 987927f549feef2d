//! Page composition.
//!
//! Two pages share the canvas, one per invocation:
//!
//! - [`Page::Agenda`]: title with logo, today's events, "no more events" footer
//! - [`Page::Today`]: large date tile with an optional weather badge
//!
//! Both views read a [`RenderContext`] built once per render and borrow the
//! surface for the whole draw pass through a
//! [`LayoutCursor`](crate::cursor::LayoutCursor).

mod agenda;
mod today;

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::config::{DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT};
use crate::event::EventCollection;
use crate::surface::{Bitmap, Surface};
use crate::weather::WeatherReading;

pub use agenda::AgendaView;
pub use today::TodayView;

// =============================================================================
// Page Selection
// =============================================================================

/// Available pages.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    /// Title, full-day events, timed events, footer.
    #[default]
    Agenda,

    /// Weekday, day-of-month numeral and month name, plus weather badge.
    Today,
}

impl Page {
    /// Whether this page lists calendar events (and so needs them fetched).
    #[inline]
    pub const fn needs_events(self) -> bool { matches!(self, Self::Agenda) }

    /// Draw this page onto `surface`, returning the final cursor offset.
    pub fn draw<S>(
        self,
        surface: &mut S,
        ctx: &RenderContext<'_>,
    ) -> f32
    where
        S: Surface + ?Sized,
    {
        match self {
            Self::Agenda => AgendaView::new(ctx).draw(surface),
            Self::Today => TodayView::new(ctx).draw(surface),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Agenda => "agenda",
            Self::Today => "today",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized page name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown page {0:?} (expected \"agenda\" or \"today\")")]
pub struct UnknownPage(pub String);

impl FromStr for Page {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agenda" => Ok(Self::Agenda),
            "today" => Ok(Self::Today),
            _ => Err(UnknownPage(s.into())),
        }
    }
}

// =============================================================================
// Presentation
// =============================================================================

/// How full-day events are labelled on the agenda.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllDayStyle {
    /// "Offsite (all day)"
    #[default]
    Suffix,
    /// "All day Offsite"
    Prefix,
}

/// Locale-like formatting choices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    pub all_day: AllDayStyle,
    /// `strftime` pattern for event start/end times.
    pub time_format: String,
    /// `strftime` pattern for the agenda title date.
    pub date_format: String,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            all_day: AllDayStyle::default(),
            time_format: DEFAULT_TIME_FORMAT.into(),
            date_format: DEFAULT_DATE_FORMAT.into(),
        }
    }
}

/// Decoded images. Absent images are skipped at draw time.
#[derive(Clone, Debug, Default)]
pub struct Assets {
    pub logo: Option<Bitmap>,
    /// Icon matching the current weather reading, if any.
    pub weather_icon: Option<Bitmap>,
}

// =============================================================================
// Render Context
// =============================================================================

/// Everything a view reads during one render. Built once, passed by reference.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext<'a> {
    /// Render time in the render time zone.
    pub now: DateTime<FixedOffset>,
    pub events: &'a EventCollection,
    pub weather: Option<&'a WeatherReading>,
    pub assets: &'a Assets,
    pub presentation: &'a Presentation,
}
