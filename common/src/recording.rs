//! A [`Surface`] that records draw operations instead of rasterizing.
//!
//! Metrics are synthetic but deterministic, which makes layouts reproducible
//! without any font data:
//!
//! | Metric | Value at pixel size `px` |
//! |--------|--------------------------|
//! | width | `chars * px / 2` |
//! | ascent | `px * 3 / 4` |
//! | descent | `px / 4` |
//!
//! so [`line_height`](crate::text::line_height) is `ceil(px / 2)`.
//!
//! Used by the `--dry-run` mode of the application and by layout tests.

use core::fmt;

use crate::fonts::{FontFamily, FontSpec};
use crate::surface::{Bitmap, LineDash, Surface, TextMetrics};

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    SetFont(FontSpec),
    FillText { text: String, x: f32, y: f32 },
    DrawImage { width: u32, height: u32, x: f32, y: f32 },
    SetLineDash(LineDash),
    StrokeLine { from: (f32, f32), to: (f32, f32) },
}

impl fmt::Display for DrawOp {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::SetFont(font) => write!(f, "font   {font}"),
            Self::FillText { text, x, y } => write!(f, "text   ({x:.1}, {y:.1}) {text:?}"),
            Self::DrawImage { width, height, x, y } => write!(f, "image  {width}x{height} at ({x:.1}, {y:.1})"),
            Self::SetLineDash(dash) => write!(f, "dash   {:?}", dash.pattern()),
            Self::StrokeLine { from, to } => {
                write!(f, "line   ({:.1}, {:.1}) -> ({:.1}, {:.1})", from.0, from.1, to.0, to.1)
            }
        }
    }
}

/// Recording surface with synthetic metrics.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    font: FontSpec,
    ops: Vec<DrawOp>,
}

impl Default for RecordingSurface {
    fn default() -> Self { Self::new() }
}

impl RecordingSurface {
    /// Default font before any `set_font`: 10px Regular.
    pub const fn new() -> Self { Self { font: FontSpec::new(FontFamily::Regular, 10), ops: Vec::new() } }

    /// All operations recorded so far.
    #[inline]
    pub fn ops(&self) -> &[DrawOp] { &self.ops }

    /// Consume the surface, returning the recorded operations.
    #[inline]
    pub fn into_ops(self) -> Vec<DrawOp> { self.ops }

    /// Recorded `FillText` operations as `(text, x, y)`.
    pub fn texts(&self) -> impl Iterator<Item = (&str, f32, f32)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::FillText { text, x, y } => Some((text.as_str(), *x, *y)),
            _ => None,
        })
    }

    /// Recorded `StrokeLine` operations.
    pub fn lines(&self) -> impl Iterator<Item = ((f32, f32), (f32, f32))> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::StrokeLine { from, to } => Some((*from, *to)),
            _ => None,
        })
    }

    /// The metrics this surface reports for `text` at `font`.
    pub fn metrics_for(
        font: &FontSpec,
        text: &str,
    ) -> TextMetrics {
        let px = font.pixel_size as f32;
        TextMetrics { width: text.chars().count() as f32 * px / 2.0, ascent: px * 0.75, descent: px * 0.25 }
    }
}

impl Surface for RecordingSurface {
    fn set_font(
        &mut self,
        font: &FontSpec,
    ) {
        self.font = *font;
        self.ops.push(DrawOp::SetFont(*font));
    }

    fn measure_text(
        &self,
        text: &str,
    ) -> TextMetrics {
        Self::metrics_for(&self.font, text)
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
    ) {
        self.ops.push(DrawOp::FillText { text: text.into(), x, y });
    }

    fn draw_image(
        &mut self,
        image: &Bitmap,
        x: f32,
        y: f32,
    ) {
        self.ops.push(DrawOp::DrawImage { width: image.width(), height: image.height(), x, y });
    }

    fn set_line_dash(
        &mut self,
        dash: LineDash,
    ) {
        self.ops.push(DrawOp::SetLineDash(dash));
    }

    fn stroke_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
    ) {
        self.ops.push(DrawOp::StrokeLine { from, to });
    }
}
