//! End-to-end page layouts against the recording surface.
//!
//! Recording metrics: a glyph is half the pixel size wide and the line height
//! is `ceil(px / 2)`. Latin text gets +2px from font selection.

use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use inkboard_common::config::FOOTER_TEXT;
use inkboard_common::{
    AgendaView, Assets, Bitmap, DrawOp, Event, EventCollection, FontFamily, FontSpec, LineDash, Page, Presentation,
    RecordingSurface, RenderContext, TodayView,
};

fn at(
    day: u32,
    hour: u32,
    minute: u32,
) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .and_then(|tz| tz.with_ymd_and_hms(2026, 10, day, hour, minute, 0).single())
        .expect("valid test timestamp")
}

fn agenda(
    events: &EventCollection,
    assets: &Assets,
) -> RecordingSurface {
    let presentation = Presentation::default();
    let ctx = RenderContext { now: at(16, 8, 0), events, weather: None, assets, presentation: &presentation };
    let mut surface = RecordingSurface::new();
    AgendaView::new(&ctx).draw(&mut surface);
    surface
}

#[test]
fn test_agenda_full_day_then_timed_with_detail() {
    let mut events = EventCollection::new();
    events.add_events(vec![
        Event::new("Standup", at(16, 9, 0), at(16, 9, 15), Some("Room 2".into())),
        Event::new("Offsite", at(16, 0, 0), at(17, 0, 0), None),
    ]);
    let assets = Assets { logo: Some(Bitmap::from_fn(55, 55, |x, y| x == y)), weather_icon: None };
    let surface = agenda(&events, &assets);

    let texts: Vec<_> = surface.texts().collect();
    assert_eq!(
        texts,
        vec![
            ("October 16, 2026", 10.0, 58.0),
            ("Offsite (all day)", 10.0, 115.0),
            ("09:00 Standup", 10.0, 160.0),
            ("09:15 Room 2", 10.0, 184.0),
            (FOOTER_TEXT, 80.0, 790.0),
        ]
    );

    assert!(surface.ops().contains(&DrawOp::DrawImage { width: 55, height: 55, x: 414.0, y: 20.0 }));

    let lines: Vec<_> = surface.lines().collect();
    assert_eq!(
        lines,
        vec![
            ((10.0, 85.0), (469.0, 85.0)),
            ((0.0, 139.0), (479.0, 139.0)),
            ((0.0, 198.0), (479.0, 198.0)),
            ((10.0, 782.0), (70.0, 782.0)),
            ((410.0, 782.0), (469.0, 782.0)),
        ]
    );
}

#[test]
fn test_agenda_without_events_still_has_footer() {
    let events = EventCollection::new();
    let surface = agenda(&events, &Assets::default());

    let texts: Vec<_> = surface.texts().map(|(t, _, y)| (t, y)).collect();
    // Footer at 32px: line height 16, anchored at 800 - 16 - 10
    assert_eq!(texts, vec![("October 16, 2026", 58.0), (FOOTER_TEXT, 790.0)]);
    assert!(!surface.ops().iter().any(|op| matches!(op, DrawOp::DrawImage { .. })));

    let dashes: Vec<_> = surface
        .ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::SetLineDash(dash) => Some(*dash),
            _ => None,
        })
        .collect();
    assert_eq!(dashes, vec![LineDash::Dashed, LineDash::Dotted]);
    assert!(surface.ops().contains(&DrawOp::SetFont(FontSpec::new(FontFamily::Regular, 32))));
}

#[test]
fn test_today_without_weather() {
    let events = EventCollection::new();
    let presentation = Presentation::default();
    let assets = Assets::default();
    let ctx =
        RenderContext { now: at(16, 8, 0), events: &events, weather: None, assets: &assets, presentation: &presentation };
    let mut surface = RecordingSurface::new();
    TodayView::new(&ctx).draw(&mut surface);

    // Weekday 90px line, gap 30, numeral 175px line: block 295, centered in 0..760
    let texts: Vec<_> = surface.texts().collect();
    assert_eq!(texts, vec![("FRI", 105.0, 322.5), ("16", 65.0, 527.5), ("OCTOBER", 135.0, 790.0)]);
    assert!(surface.ops().contains(&DrawOp::SetFont(FontSpec::black(350))));
    assert!(!surface.ops().iter().any(|op| matches!(op, DrawOp::DrawImage { .. })));
}

#[test]
fn test_page_dispatch_matches_views() {
    let mut events = EventCollection::new();
    events.add_events(vec![Event::new("Review", at(16, 14, 0), at(16, 14, 0) + Duration::hours(1), None)]);
    let presentation = Presentation::default();
    let assets = Assets::default();
    let ctx =
        RenderContext { now: at(16, 8, 0), events: &events, weather: None, assets: &assets, presentation: &presentation };

    let mut direct = RecordingSurface::new();
    AgendaView::new(&ctx).draw(&mut direct);
    let mut dispatched = RecordingSurface::new();
    Page::Agenda.draw(&mut dispatched, &ctx);
    assert_eq!(direct.ops(), dispatched.ops());
}

#[test]
fn test_rendering_is_deterministic() {
    let mut events = EventCollection::new();
    events.add_events(vec![
        Event::new("\u{05E4}\u{05D2}\u{05D9}\u{05E9}\u{05D4}", at(16, 11, 0), at(16, 12, 0), Some("HQ".into())),
        Event::new("Offsite", at(16, 0, 0), at(17, 0, 0), None),
    ]);
    let first = agenda(&events, &Assets::default()).into_ops();
    let second = agenda(&events, &Assets::default()).into_ops();
    assert_eq!(first, second);
}
