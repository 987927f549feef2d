//! Render time zone.
//!
//! All time-of-day logic (the day window, full-day detection, the sort key,
//! formatted times) runs on `DateTime<FixedOffset>` values expressed in the
//! render zone. This module is the only place that turns UTC instants,
//! zoned calendar values and floating local times into that form.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use inkboard_common::RenderWindow;

/// The zone a page is rendered in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderZone {
    /// The host's local zone.
    Local,
    /// An IANA zone from the settings.
    Named(Tz),
}

impl RenderZone {
    /// Current instant in this zone.
    pub fn now(self) -> DateTime<FixedOffset> { self.convert(Utc::now()) }

    /// Start of `date` in this zone, `None` if midnight falls in a DST gap.
    pub fn start_of(
        self,
        date: NaiveDate,
    ) -> Option<DateTime<FixedOffset>> {
        NaiveTime::from_hms_opt(0, 0, 0).and_then(|midnight| self.resolve(date.and_time(midnight)))
    }

    /// Render window for the day containing `now`, with midnight and
    /// 23:59:59 resolved in this zone so a DST change during the day
    /// moves the end of the window with it.
    pub fn window(
        self,
        now: DateTime<FixedOffset>,
    ) -> RenderWindow {
        let fixed = RenderWindow::for_day(now);
        let date = now.date_naive();
        let at = |h, m, s| NaiveTime::from_hms_opt(h, m, s).and_then(|time| self.resolve(date.and_time(time)));
        RenderWindow::new(now, at(0, 0, 0).unwrap_or(fixed.begin_of_day), at(23, 59, 59).unwrap_or(fixed.end_of_day))
    }

    /// Express a UTC instant in this zone.
    pub fn convert(
        self,
        instant: DateTime<Utc>,
    ) -> DateTime<FixedOffset> {
        match self {
            Self::Local => instant.with_timezone(&Local).fixed_offset(),
            Self::Named(tz) => instant.with_timezone(&tz).fixed_offset(),
        }
    }

    /// Resolve a wall-clock time in this zone. Ambiguous times take the
    /// earlier instant; times inside a DST gap yield `None`.
    pub fn resolve(
        self,
        local: NaiveDateTime,
    ) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Local => Local.from_local_datetime(&local).earliest().map(|t| t.fixed_offset()),
            Self::Named(tz) => tz.from_local_datetime(&local).earliest().map(|t| t.fixed_offset()),
        }
    }

    /// Resolve a wall-clock time in another zone and express it in this one.
    pub fn resolve_in(
        self,
        zone: Tz,
        local: NaiveDateTime,
    ) -> Option<DateTime<FixedOffset>> {
        zone.from_local_datetime(&local).earliest().map(|t| self.convert(t.with_timezone(&Utc)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid test datetime")
    }

    #[test]
    fn test_convert_named() {
        let zone = RenderZone::Named(chrono_tz::Europe::Berlin);
        let utc = Utc.with_ymd_and_hms(2026, 10, 16, 7, 0, 0).single().expect("valid");
        let local = zone.convert(utc);
        assert_eq!(local.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(local.format("%H:%M").to_string(), "09:00");
    }

    #[test]
    fn test_resolve_in_other_zone() {
        let zone = RenderZone::Named(chrono_tz::Europe::Berlin);
        let t = zone
            .resolve_in(chrono_tz::America::New_York, naive("2026-10-16 09:00:00"))
            .expect("valid time");
        assert_eq!(t.format("%H:%M").to_string(), "15:00");
    }

    #[test]
    fn test_dst_gap_is_none() {
        let zone = RenderZone::Named(chrono_tz::Europe::Berlin);
        assert!(zone.resolve(naive("2026-03-29 02:30:00")).is_none());
    }

    #[test]
    fn test_window_on_dst_change_day() {
        let zone = RenderZone::Named(chrono_tz::Europe::Berlin);
        let date = NaiveDate::from_ymd_opt(2026, 3, 29).expect("valid date");
        let window = zone.window(zone.start_of(date).expect("midnight exists"));

        let fmt = "%Y-%m-%d %H:%M:%S %z";
        assert_eq!(window.begin_of_day.format(fmt).to_string(), "2026-03-29 00:00:00 +0100");
        assert_eq!(window.end_of_day.format(fmt).to_string(), "2026-03-29 23:59:59 +0200");

        let after_midnight = zone.resolve(naive("2026-03-30 00:30:00")).expect("valid time");
        let later = zone.resolve(naive("2026-03-30 01:00:00")).expect("valid time");
        assert!(!window.is_relevant(&after_midnight, &later));
        let evening = zone.resolve(naive("2026-03-29 23:30:00")).expect("valid time");
        assert!(window.is_relevant(&evening, &after_midnight));
    }

    #[test]
    fn test_window_matches_fixed_day() {
        let zone = RenderZone::Named(chrono_tz::Europe::Berlin);
        let now = zone.resolve(naive("2026-10-16 08:00:00")).expect("valid time");
        assert_eq!(zone.window(now), RenderWindow::for_day(now));
    }

    #[test]
    fn test_start_of_day() {
        let zone = RenderZone::Named(chrono_tz::Europe::Berlin);
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date");
        let start = zone.start_of(date).expect("midnight exists");
        assert_eq!(start.format("%Y-%m-%d %H:%M:%S %z").to_string(), "2026-10-16 00:00:00 +0200");
    }
}
