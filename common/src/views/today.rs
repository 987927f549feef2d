//! Today page: a large date tile.
//!
//! ```text
//! +----------------------+
//! |     13°C [icon]      |  optional weather badge
//! |                      |
//! |         FRI          |  weekday abbreviation
//! |          16          |  day-of-month numeral
//! |                      |
//! |       OCTOBER        |  month, pinned to the bottom margin
//! +----------------------+
//! ```
//!
//! Every element is horizontally centered by its measured width and set in
//! the black family. The weekday and numeral form one block, vertically
//! centered between the badge (or the top edge) and the month line.

use chrono::Datelike;
use tracing::debug;

use super::RenderContext;
use crate::config::{
    H_SPACE, HEIGHT_F, TODAY_BADGE_SIZE, TODAY_DATE_SIZE, TODAY_MONTH_SIZE, TODAY_WEEKDAY_GAP, TODAY_WEEKDAY_SIZE,
    V_SPACE, WIDTH_F,
};
use crate::cursor::LayoutCursor;
use crate::event::format_time;
use crate::fonts::FontSpec;
use crate::surface::{Surface, TextMetrics};
use crate::text::line_height;

/// Month baseline, pinned above the bottom margin.
const MONTH_BASELINE: f32 = HEIGHT_F - V_SPACE;

/// Today page view.
pub struct TodayView<'a> {
    ctx: RenderContext<'a>,
}

/// Set `font` and measure `text` in one go.
fn measure_in<S>(
    cursor: &mut LayoutCursor<'_, S>,
    font: FontSpec,
    text: &str,
) -> TextMetrics
where
    S: Surface + ?Sized,
{
    cursor.surface().set_font(&font);
    cursor.surface().measure_text(text)
}

#[inline]
fn centered_x(width: f32) -> f32 { (WIDTH_F - width) / 2.0 }

impl<'a> TodayView<'a> {
    pub fn new(ctx: &RenderContext<'a>) -> Self { Self { ctx: *ctx } }

    /// Draw the whole page. Returns the final cursor offset.
    pub fn draw<S>(
        &self,
        surface: &mut S,
    ) -> f32
    where
        S: Surface + ?Sized,
    {
        let now = self.ctx.now;
        let day = now.day().to_string();
        let weekday = format_time(&now, "%a").to_uppercase();
        let month = format_time(&now, "%B").to_uppercase();

        let mut cursor = LayoutCursor::new(surface);
        self.draw_badge(&mut cursor);

        let month_font = FontSpec::black(TODAY_MONTH_SIZE);
        let weekday_font = FontSpec::black(TODAY_WEEKDAY_SIZE);
        let date_font = FontSpec::black(TODAY_DATE_SIZE);

        let month_metrics = measure_in(&mut cursor, month_font, &month);
        let weekday_metrics = measure_in(&mut cursor, weekday_font, &weekday);
        let date_metrics = measure_in(&mut cursor, date_font, &day);

        let weekday_lh = line_height(&weekday_metrics);
        let date_lh = line_height(&date_metrics);
        let block = weekday_lh + TODAY_WEEKDAY_GAP + date_lh;

        // Center the block in the band between the cursor and the month line
        let band_top = cursor.offset();
        let band_bottom = MONTH_BASELINE - line_height(&month_metrics);
        cursor.advance_to(band_top + (band_bottom - band_top - block) / 2.0);

        cursor.surface().set_font(&weekday_font);
        cursor.place_line(&weekday, centered_x(weekday_metrics.width), weekday_lh);
        cursor.surface().set_font(&date_font);
        cursor.place_line(&day, centered_x(date_metrics.width), block);
        cursor.advance(block);

        cursor.surface().set_font(&month_font);
        cursor.place_pinned(&month, centered_x(month_metrics.width), MONTH_BASELINE);
        debug!(%weekday, %day, %month, "date tile placed");

        cursor.offset()
    }

    /// Temperature label and icon side by side, centered, above the date
    /// block. Skipped when there is neither a label nor an icon.
    fn draw_badge<S>(
        &self,
        cursor: &mut LayoutCursor<'_, S>,
    ) where
        S: Surface + ?Sized,
    {
        let Some(weather) = self.ctx.weather else {
            debug!("no weather reading, skipping badge");
            return;
        };
        let label = weather.temperature_label();
        let icon = self.ctx.assets.weather_icon.as_ref();
        if label.is_none() && icon.is_none() {
            return;
        }

        cursor.advance(V_SPACE);

        let (label_width, label_lh) = match &label {
            Some(label) => {
                let metrics = measure_in(cursor, FontSpec::black(TODAY_BADGE_SIZE), label);
                (metrics.width, line_height(&metrics))
            }
            None => (0.0, 0.0),
        };
        let (icon_width, icon_height) = icon.map_or((0.0, 0.0), |i| (i.width() as f32, i.height() as f32));
        let gap = if label.is_some() && icon.is_some() { H_SPACE } else { 0.0 };

        let block = label_lh.max(icon_height);
        let x = centered_x(label_width + gap + icon_width);

        if let Some(label) = &label {
            cursor.place_line(label, x, (block + label_lh) / 2.0);
        }
        if let Some(icon) = icon {
            cursor.place_image(icon, x + label_width + gap, (block - icon_height) / 2.0);
        }
        cursor.advance(block + V_SPACE);
    }
}
