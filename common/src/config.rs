//! Canvas and layout configuration constants.
//!
//! The dashboard renders exactly one page size. Every layout position is
//! derived from these constants, so changing the panel means changing this
//! file and nothing else.

// =============================================================================
// Display Configuration
// =============================================================================

/// Canvas width in pixels (7.5" e-ink panel in portrait orientation).
pub const WIDTH: u32 = 480;

/// Canvas height in pixels.
pub const HEIGHT: u32 = 800;

/// Canvas width as `f32` for layout arithmetic.
pub const WIDTH_F: f32 = WIDTH as f32;

/// Canvas height as `f32` for layout arithmetic.
pub const HEIGHT_F: f32 = HEIGHT as f32;

/// Vertical margin between stacked blocks.
pub const V_SPACE: f32 = 10.0;

/// Horizontal margin from the canvas edges and around centered text.
pub const H_SPACE: f32 = 10.0;

/// Widest a single text line may be before it gets truncated.
pub const MAX_LINE_WIDTH: f32 = WIDTH_F - 2.0 * H_SPACE;

// =============================================================================
// Agenda Page
// =============================================================================

/// Logo width reserved in the title block, whether or not the logo loaded.
pub const LOGO_WIDTH: u32 = 55;

/// Logo height reserved in the title block.
pub const LOGO_HEIGHT: u32 = 55;

/// Nominal headline size for the title (before script offsets).
pub const TITLE_FONT_SIZE: u32 = 40;

/// Nominal size for event lines.
pub const EVENT_FONT_SIZE: u32 = 26;

/// Largest size tried by the footer shrink-to-fit search.
pub const FOOTER_MAX_FONT_SIZE: u32 = 30;

/// Message drawn at the end of the agenda.
pub const FOOTER_TEXT: &str = "No more events today";

/// Suffix appended to full-day events in [`AllDayStyle::Suffix`](crate::views::AllDayStyle) mode.
pub const ALL_DAY_SUFFIX: &str = " (all day)";

/// Prefix for full-day events in [`AllDayStyle::Prefix`](crate::views::AllDayStyle) mode.
pub const ALL_DAY_PREFIX: &str = "All day ";

/// Glyph sequence appended to truncated lines.
pub const ELLIPSIS: &str = "...";

// =============================================================================
// Today Page
// =============================================================================

/// Day-of-month numeral size.
pub const TODAY_DATE_SIZE: u32 = 350;

/// Weekday abbreviation size.
pub const TODAY_WEEKDAY_SIZE: u32 = 180;

/// Month name size.
pub const TODAY_MONTH_SIZE: u32 = 60;

/// Weather badge temperature size.
pub const TODAY_BADGE_SIZE: u32 = 48;

/// Gap between the weekday and the numeral below it.
pub const TODAY_WEEKDAY_GAP: f32 = 30.0;

// =============================================================================
// Default Formats
// =============================================================================

/// Default `strftime` pattern for event start/end times.
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M";

/// Default `strftime` pattern for the agenda title date.
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

// Layout sanity: the logo must fit beside a reasonable title.
const _: () = assert!(LOGO_WIDTH < WIDTH / 4);
const _: () = assert!(LOGO_HEIGHT < HEIGHT / 8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_line_width() {
        assert_eq!(MAX_LINE_WIDTH, 460.0);
    }

    #[test]
    fn test_today_sizes_descending() {
        assert!(TODAY_DATE_SIZE > TODAY_WEEKDAY_SIZE);
        assert!(TODAY_WEEKDAY_SIZE > TODAY_MONTH_SIZE);
    }
}
