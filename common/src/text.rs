//! Single-line text fitting.
//!
//! - [`truncate_to_width`]: shrink a line until it plus a suffix fits a pixel
//!   budget, then mark the cut with an ellipsis
//! - [`line_height`]: vertical extent used for block stacking

use crate::config::ELLIPSIS;
use crate::surface::{Surface, TextMetrics};

/// Line height in whole pixels: `ceil(|descent - ascent|)`.
///
/// This is not `ascent + descent`. Stacked blocks throughout the dashboard
/// were tuned against this value, so keep it.
#[inline]
pub fn line_height(metrics: &TextMetrics) -> f32 { (metrics.descent - metrics.ascent).abs().ceil() }

/// First physical line of `text` (split on `\r\n`, `\r` or `\n`).
fn first_line(text: &str) -> &str {
    match text.find(['\r', '\n']) {
        Some(end) => &text[..end],
        None => text,
    }
}

/// Truncate `line` so that `line + suffix` fits in `max_width` on `surface`.
///
/// Only the first physical line is kept. If the line already fits it is
/// returned as-is. Otherwise trailing characters are dropped until
/// `line + suffix` fits in `max_width` minus the ellipsis width, and the
/// ellipsis is appended. The suffix is measured but never returned.
///
/// If `max_width` is narrower than the ellipsis itself, characters are
/// dropped until the line is empty and the result is the ellipsis alone.
///
/// The surface's current font is used for all measurements.
pub fn truncate_to_width<S>(
    surface: &S,
    line: &str,
    suffix: &str,
    max_width: f32,
) -> String
where
    S: Surface + ?Sized,
{
    if line.is_empty() {
        return String::new();
    }
    let mut line = String::from(first_line(line));

    let measure = |line: &str| {
        let mut candidate = String::with_capacity(line.len() + suffix.len());
        candidate.push_str(line);
        candidate.push_str(suffix);
        surface.measure_text(&candidate).width
    };

    if measure(&line) > max_width {
        let budget = max_width - surface.measure_text(ELLIPSIS).width;
        while !line.is_empty() && measure(&line) > budget {
            line.pop();
        }
        line.push_str(ELLIPSIS);
    }
    line
}
