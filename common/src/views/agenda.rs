//! Agenda page: title, full-day events, timed events, footer.
//!
//! # Layout (top to bottom)
//!
//! ```text
//! +--------------------------------------+
//! | October 16, 2026, 12°C        [logo] |  title block
//! | - - - - - - - - - - - - - - - - - -  |  dashed rule
//! | Offsite (all day)                    |  full-day pass
//! |......................................|  hairline rule
//! | 09:00 Standup                        |  timed pass
//! | 09:15 Room 2                         |  optional detail line
//! |......................................|
//! |                                      |
//! | ···· No more events today ·········· |  footer, bottom-anchored
//! +--------------------------------------+
//! ```
//!
//! The passes run once each, in this order. Each event line sets its own font
//! and is truncated independently to [`MAX_LINE_WIDTH`].

use core::fmt::Write;

use tracing::{debug, warn};

use super::{AllDayStyle, RenderContext};
use crate::config::{
    ALL_DAY_PREFIX, ALL_DAY_SUFFIX, EVENT_FONT_SIZE, FOOTER_MAX_FONT_SIZE, FOOTER_TEXT, H_SPACE, HEIGHT_F,
    LOGO_HEIGHT, LOGO_WIDTH, MAX_LINE_WIDTH, TITLE_FONT_SIZE, V_SPACE, WIDTH_F,
};
use crate::cursor::{LayoutCursor, RuleSpan};
use crate::event::{Event, format_time};
use crate::fonts::select_font;
use crate::surface::{LineDash, Surface};
use crate::text::{line_height, truncate_to_width};
use crate::thresholds::{FOOTER_MIN_FONT_SIZE, FOOTER_MIN_SPACE, wants_end_detail};

// =============================================================================
// Layout Positions
// =============================================================================

/// Logo left edge, one pixel inside the right margin.
const LOGO_X: f32 = WIDTH_F - H_SPACE - LOGO_WIDTH as f32 - 1.0;

const _: () = assert!(LOGO_X > H_SPACE, "Logo must stay inside the canvas");

/// Agenda page view.
pub struct AgendaView<'a> {
    ctx: RenderContext<'a>,
}

impl<'a> AgendaView<'a> {
    pub fn new(ctx: &RenderContext<'a>) -> Self { Self { ctx: *ctx } }

    /// Draw the whole page. Returns the final cursor offset.
    pub fn draw<S>(
        &self,
        surface: &mut S,
    ) -> f32
    where
        S: Surface + ?Sized,
    {
        let mut cursor = LayoutCursor::new(surface);
        self.draw_title(&mut cursor);

        for event in self.ctx.events.full_day() {
            self.draw_event(&mut cursor, event);
        }
        for event in self.ctx.events.timed() {
            self.draw_event(&mut cursor, event);
        }

        draw_footer(&mut cursor);
        cursor.offset()
    }

    /// Date plus optional temperature, e.g. "October 16, 2026, 12°C".
    pub fn title_text(&self) -> String {
        let mut title = format_time(&self.ctx.now, &self.ctx.presentation.date_format);
        if let Some(label) = self.ctx.weather.and_then(|w| w.temperature_label()) {
            let _ = write!(title, ", {label}");
        }
        title
    }

    fn draw_title<S>(
        &self,
        cursor: &mut LayoutCursor<'_, S>,
    ) where
        S: Surface + ?Sized,
    {
        let title = self.title_text();
        cursor.advance(H_SPACE);

        cursor.surface().set_font(&select_font(TITLE_FONT_SIZE, &title));
        let lh = line_height(&cursor.surface().measure_text(&title));
        let logo_height = LOGO_HEIGHT as f32;
        let block = logo_height.max(lh) + 2.0 * V_SPACE;

        cursor.place_line(&title, H_SPACE, (block + lh) / 2.0);
        match &self.ctx.assets.logo {
            Some(logo) => cursor.place_image(logo, LOGO_X, (block - logo_height) / 2.0),
            None => debug!("no logo loaded, leaving its slot empty"),
        }

        cursor.advance(block);
        cursor.draw_rule(LineDash::Dashed, RuleSpan::Inset, 0.0);
        cursor.advance(V_SPACE);
    }

    /// Main line plus optional detail line, then a hairline rule.
    fn draw_event<S>(
        &self,
        cursor: &mut LayoutCursor<'_, S>,
        event: &Event,
    ) where
        S: Surface + ?Sized,
    {
        let presentation = self.ctx.presentation;
        cursor.advance(V_SPACE);

        let (body, suffix) = if event.is_full_day() {
            match presentation.all_day {
                AllDayStyle::Suffix => (event.summary().to_owned(), ALL_DAY_SUFFIX),
                AllDayStyle::Prefix => (format!("{ALL_DAY_PREFIX}{}", event.summary()), ""),
            }
        } else {
            (format!("{} {}", event.localized_start(&presentation.time_format), event.summary()), "")
        };

        cursor.surface().set_font(&select_font(EVENT_FONT_SIZE, &body));
        let mut line = truncate_to_width(&*cursor.surface(), &body, suffix, MAX_LINE_WIDTH);
        line.push_str(suffix);
        let lh = line_height(&cursor.surface().measure_text(&line));

        cursor.advance(V_SPACE);
        cursor.place_line(&line, H_SPACE, 0.0);
        cursor.advance(lh + V_SPACE);
        debug!(summary = event.summary(), offset = cursor.offset(), "event placed");

        if let Some(detail) = detail_text(event, &presentation.time_format) {
            cursor.surface().set_font(&select_font(EVENT_FONT_SIZE, &detail));
            let detail = truncate_to_width(&*cursor.surface(), &detail, "", MAX_LINE_WIDTH);
            let lh = line_height(&cursor.surface().measure_text(&detail));
            cursor.place_line(&detail, H_SPACE, 0.0);
            cursor.advance(lh);
        }

        cursor.draw_rule(LineDash::Hairline, RuleSpan::FullWidth, 0.0);
        cursor.advance(1.0);
    }
}

/// Second line of an event: end time (timed events longer than five
/// minutes) and location, joined by a single space.
pub fn detail_text(
    event: &Event,
    time_format: &str,
) -> Option<String> {
    let mut parts: Vec<String> = Vec::with_capacity(2);
    if !event.is_full_day() && wants_end_detail(event.duration_secs()) {
        parts.push(event.localized_end(time_format));
    }
    if let Some(location) = event.location() {
        parts.push(location.to_owned());
    }
    if parts.is_empty() { None } else { Some(parts.join(" ")) }
}

/// Shrink the footer message from [`FOOTER_MAX_FONT_SIZE`] until it fits the
/// space left below the cursor, then anchor it to the bottom margin if the
/// cursor is not already past that point.
///
/// The remaining space is measured once, before the loop. Returns `false`
/// and draws nothing if no size fits.
fn draw_footer<S>(cursor: &mut LayoutCursor<'_, S>) -> bool
where
    S: Surface + ?Sized,
{
    cursor.advance(V_SPACE);
    let remaining = HEIGHT_F - cursor.offset();

    let mut size = FOOTER_MAX_FONT_SIZE;
    while remaining > FOOTER_MIN_SPACE && size > FOOTER_MIN_FONT_SIZE {
        cursor.surface().set_font(&select_font(size, FOOTER_TEXT));
        let metrics = cursor.surface().measure_text(FOOTER_TEXT);
        let lh = line_height(&metrics);
        if lh <= remaining {
            cursor.advance_to(HEIGHT_F - lh - V_SPACE);
            cursor.place_between_rules(FOOTER_TEXT, metrics.width, LineDash::Dotted, lh / 2.0, lh);
            debug!(size, offset = cursor.offset(), "footer placed");
            return true;
        }
        size -= 1;
    }

    warn!(remaining, "no room left for the footer, skipping it");
    false
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, TimeZone};

    use super::*;
    use crate::event::EventCollection;
    use crate::recording::{DrawOp, RecordingSurface};
    use crate::views::{Assets, Presentation};
    use crate::weather::WeatherReading;

    fn at(
        hour: u32,
        minute: u32,
    ) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .and_then(|tz| tz.with_ymd_and_hms(2026, 10, 16, hour, minute, 0).single())
            .expect("valid test timestamp")
    }

    fn render(
        events: &EventCollection,
        weather: Option<&WeatherReading>,
        presentation: &Presentation,
    ) -> RecordingSurface {
        let assets = Assets::default();
        let ctx = RenderContext { now: at(8, 0), events, weather, assets: &assets, presentation };
        let mut surface = RecordingSurface::new();
        AgendaView::new(&ctx).draw(&mut surface);
        surface
    }

    fn texts(surface: &RecordingSurface) -> Vec<&str> { surface.texts().map(|(t, _, _)| t).collect() }

    #[test]
    fn test_title_with_temperature() {
        let events = EventCollection::new();
        let weather = WeatherReading { degrees: Some(12.4), icon: None };
        let surface = render(&events, Some(&weather), &Presentation::default());
        assert_eq!(texts(&surface)[0], "October 16, 2026, 12\u{b0}C");
    }

    #[test]
    fn test_title_without_weather() {
        let events = EventCollection::new();
        let surface = render(&events, None, &Presentation::default());
        assert_eq!(texts(&surface)[0], "October 16, 2026");
    }

    #[test]
    fn test_prefix_style() {
        let mut events = EventCollection::new();
        events.add_events(vec![Event::new("Offsite", at(0, 0), at(0, 0) + chrono::Duration::days(1), None)]);
        let presentation = Presentation { all_day: AllDayStyle::Prefix, ..Presentation::default() };
        let surface = render(&events, None, &presentation);
        assert_eq!(texts(&surface)[1], "All day Offsite");
    }

    #[test]
    fn test_long_summary_truncated() {
        let mut events = EventCollection::new();
        let summary = "Quarterly planning with the extended leadership team and guests";
        events.add_events(vec![Event::new(summary, at(10, 0), at(10, 5), None)]);
        let surface = render(&events, None, &Presentation::default());
        let line = texts(&surface)[1];
        assert!(line.starts_with("10:00 Quarterly"));
        assert!(line.ends_with("..."));
        // 28px recording font: 14px per char
        assert!(line.chars().count() as f32 * 14.0 <= MAX_LINE_WIDTH);
    }

    #[test]
    fn test_short_event_has_no_detail_line() {
        let mut events = EventCollection::new();
        events.add_events(vec![Event::new("Ping", at(10, 0), at(10, 5), None)]);
        let surface = render(&events, None, &Presentation::default());
        assert_eq!(texts(&surface), vec!["October 16, 2026", "10:00 Ping", FOOTER_TEXT]);
    }

    #[test]
    fn test_hebrew_event_uses_fallback_font() {
        let mut events = EventCollection::new();
        events.add_events(vec![Event::new("\u{05E4}\u{05D2}\u{05D9}\u{05E9}\u{05D4}", at(10, 0), at(10, 5), None)]);
        let surface = render(&events, None, &Presentation::default());
        assert!(
            surface
                .ops()
                .contains(&DrawOp::SetFont(crate::fonts::FontSpec::new(crate::fonts::FontFamily::Fallback, 24)))
        );
    }

    #[test]
    fn test_detail_text() {
        let timed = Event::new("Standup", at(9, 0), at(9, 15), Some("Room 2".into()));
        assert_eq!(detail_text(&timed, "%H:%M").as_deref(), Some("09:15 Room 2"));

        let short = Event::new("Ping", at(9, 0), at(9, 5), None);
        assert_eq!(detail_text(&short, "%H:%M"), None);

        let short_with_room = Event::new("Ping", at(9, 0), at(9, 5), Some("Room 2".into()));
        assert_eq!(detail_text(&short_with_room, "%H:%M").as_deref(), Some("Room 2"));

        let full_day = Event::new("Offsite", at(0, 0), at(0, 0) + chrono::Duration::days(1), None);
        assert_eq!(detail_text(&full_day, "%H:%M"), None);
    }

    #[test]
    fn test_footer_skipped_when_page_full() {
        let mut events = EventCollection::new();
        // 45px per event: 95 + 16 * 45 + 10 leaves no room
        events.add_events((0..16).map(|_| Event::new("Ping", at(10, 0), at(10, 5), None)).collect());
        let surface = render(&events, None, &Presentation::default());
        assert!(!texts(&surface).contains(&FOOTER_TEXT));
    }

    #[test]
    fn test_footer_follows_last_event_when_it_cannot_anchor() {
        let mut events = EventCollection::new();
        // Offset reaches 780 before the footer, past the 774 anchor
        events.add_events((0..15).map(|_| Event::new("Ping", at(10, 0), at(10, 5), None)).collect());
        let surface = render(&events, None, &Presentation::default());
        let footer = surface.texts().find(|(t, _, _)| *t == FOOTER_TEXT).expect("footer drawn");
        assert_eq!(footer.2, 796.0);
    }

    #[test]
    fn test_footer_text_between_rules() {
        let surface = render(&EventCollection::new(), None, &Presentation::default());
        let ops = surface.ops();
        let at_text = ops
            .iter()
            .position(|op| matches!(op, DrawOp::FillText { text, .. } if text == FOOTER_TEXT))
            .expect("footer drawn");
        assert!(matches!(ops[at_text - 1], DrawOp::StrokeLine { from: (x, _), .. } if x == H_SPACE));
        assert!(matches!(ops[at_text + 1], DrawOp::StrokeLine { to: (x, _), .. } if x == WIDTH_F - 1.0 - H_SPACE));
        assert_eq!(ops.len(), at_text + 2);
    }
}
