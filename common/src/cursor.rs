//! Vertical layout cursor.
//!
//! Views stack blocks top-down. The cursor owns the single running vertical
//! offset and borrows the surface for the whole draw pass, so every
//! placement goes through one place and the offset can only move forward.
//!
//! # Baselines
//!
//! Text is placed by baseline, and measurements give ascent/descent rather
//! than a top-to-baseline distance. Call sites therefore compute baselines
//! with `(block_height + line_height) / 2` style formulas relative to the
//! offset instead of using the line height alone.

use crate::config::{H_SPACE, WIDTH_F};
use crate::surface::{Bitmap, LineDash, Surface};

/// Horizontal extent of a rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RuleSpan {
    /// Edge to edge: `0 ..= WIDTH - 1`.
    FullWidth,
    /// Inside the horizontal margins: `H_SPACE ..= WIDTH - 1 - H_SPACE`.
    Inset,
    /// Two inset segments flanking a horizontally centered text block of
    /// the given width, each stopping `H_SPACE` short of the text.
    SplitAround { text_width: f32 },
}

impl RuleSpan {
    /// Segments `(x_start, x_end)` covered by this span.
    pub fn segments(self) -> heapless::Vec<(f32, f32), 2> {
        let mut out = heapless::Vec::new();
        let last = WIDTH_F - 1.0;
        let center = WIDTH_F / 2.0;
        // Capacity is 2 and no arm pushes more than twice
        let _ = match self {
            Self::FullWidth => out.push((0.0, last)),
            Self::Inset => out.push((H_SPACE, last - H_SPACE)),
            Self::SplitAround { text_width } => {
                let half = text_width / 2.0;
                out.push((H_SPACE, center - half - H_SPACE))
                    .and_then(|()| out.push((center + half + H_SPACE, last - H_SPACE)))
            }
        };
        out
    }
}

/// Running vertical offset plus exclusive access to the surface.
pub struct LayoutCursor<'s, S: Surface + ?Sized> {
    surface: &'s mut S,
    offset: f32,
}

impl<'s, S: Surface + ?Sized> LayoutCursor<'s, S> {
    /// Start a draw pass at the top of the canvas.
    pub fn new(surface: &'s mut S) -> Self { Self { surface, offset: 0.0 } }

    /// Current vertical offset from the top of the canvas.
    #[inline]
    pub const fn offset(&self) -> f32 { self.offset }

    /// Mutable access for font selection and measurement.
    #[inline]
    pub fn surface(&mut self) -> &mut S { self.surface }

    /// Move down by `delta`. Negative deltas are ignored.
    pub fn advance(
        &mut self,
        delta: f32,
    ) {
        if delta > 0.0 {
            self.offset += delta;
        }
    }

    /// Move down to `y` if it is below the current offset.
    pub fn advance_to(
        &mut self,
        y: f32,
    ) {
        if y > self.offset {
            self.offset = y;
        }
    }

    /// Stroke a horizontal rule at `offset + dy`.
    pub fn draw_rule(
        &mut self,
        dash: LineDash,
        span: RuleSpan,
        dy: f32,
    ) {
        let y = self.offset + dy;
        self.surface.set_line_dash(dash);
        for (x0, x1) in span.segments() {
            self.surface.stroke_line((x0, y), (x1, y));
        }
    }

    /// Fill `text` at `x` with its baseline at `offset + baseline`.
    pub fn place_line(
        &mut self,
        text: &str,
        x: f32,
        baseline: f32,
    ) {
        self.surface.fill_text(text, x, self.offset + baseline);
    }

    /// Fill `text` centered on the canvas with a rule on either side, in
    /// left rule, text, right rule order.
    pub fn place_between_rules(
        &mut self,
        text: &str,
        text_width: f32,
        dash: LineDash,
        rule_dy: f32,
        baseline: f32,
    ) {
        let y = self.offset + rule_dy;
        let mut segments = RuleSpan::SplitAround { text_width }.segments().into_iter();
        self.surface.set_line_dash(dash);
        if let Some((x0, x1)) = segments.next() {
            self.surface.stroke_line((x0, y), (x1, y));
        }
        self.surface.fill_text(text, WIDTH_F / 2.0 - text_width / 2.0, self.offset + baseline);
        for (x0, x1) in segments {
            self.surface.stroke_line((x0, y), (x1, y));
        }
    }

    /// Draw `image` at `x` with its top at `offset + dy`.
    pub fn place_image(
        &mut self,
        image: &Bitmap,
        x: f32,
        dy: f32,
    ) {
        self.surface.draw_image(image, x, self.offset + dy);
    }

    /// Fill `text` at an absolute canvas position, independent of the offset.
    ///
    /// Used for elements pinned to the canvas edge.
    pub fn place_pinned(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
    ) {
        self.surface.fill_text(text, x, y);
    }
}
