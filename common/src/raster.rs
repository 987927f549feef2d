//! [`Surface`] over any embedded-graphics `DrawTarget<Color = BinaryColor>`.
//!
//! Coordinates are rounded to the nearest pixel. Off-canvas drawing is
//! clipped by the wrapped target; draw errors are ignored like elsewhere in
//! the widget layer.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use crate::fonts::{FontFamily, FontSpec};
use crate::styles::ScaledFont;
use crate::surface::{Bitmap, LineDash, Surface, TextMetrics};
use crate::widgets::{draw_bitmap, draw_dashed_line, draw_scaled_text};

#[inline]
fn px(v: f32) -> i32 { v.round() as i32 }

/// Rasterizing surface.
pub struct RasterSurface<D> {
    target: D,
    font: ScaledFont,
    dash: LineDash,
}

impl<D> RasterSurface<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    pub fn new(target: D) -> Self {
        Self { target, font: ScaledFont::resolve(&FontSpec::new(FontFamily::Regular, 10)), dash: LineDash::Solid }
    }

    /// The wrapped draw target.
    #[inline]
    pub const fn target(&self) -> &D { &self.target }

    /// Unwrap the draw target, e.g. to encode it.
    #[inline]
    pub fn into_inner(self) -> D { self.target }
}

impl<D> Surface for RasterSurface<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    fn set_font(
        &mut self,
        font: &FontSpec,
    ) {
        self.font = ScaledFont::resolve(font);
    }

    fn measure_text(
        &self,
        text: &str,
    ) -> TextMetrics {
        self.font.measure(text)
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
    ) {
        draw_scaled_text(&mut self.target, text, self.font, px(x), px(y));
    }

    fn draw_image(
        &mut self,
        image: &Bitmap,
        x: f32,
        y: f32,
    ) {
        draw_bitmap(&mut self.target, image, Point::new(px(x), px(y)));
    }

    fn set_line_dash(
        &mut self,
        dash: LineDash,
    ) {
        self.dash = dash;
    }

    fn stroke_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
    ) {
        draw_dashed_line(
            &mut self.target,
            Point::new(px(from.0), px(from.1)),
            Point::new(px(to.0), px(to.1)),
            self.dash,
        );
    }
}
