//! Low-level drawing primitives: scaled text, dashed lines and bitmaps.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, Rectangle};
use embedded_graphics::text::{Baseline, Text, TextStyleBuilder};

use crate::colors::INK;
use crate::styles::ScaledFont;
use crate::surface::{Bitmap, LineDash};

/// Half extent of the virtual canvas seen by text drawn through [`Scaled`].
const SCALED_EXTENT: i32 = 1 << 20;

// =============================================================================
// Scaling Adapter
// =============================================================================

/// Draw target adapter that blows every pixel up into a `scale` x `scale`
/// block anchored at `origin`.
///
/// Text is drawn at `(0, 0)` in adapter space, so glyph rows above the
/// baseline have negative coordinates. The adapter reports a large virtual
/// bounding box; clipping is left to the wrapped target.
struct Scaled<'a, D> {
    inner: &'a mut D,
    origin: Point,
    scale: u32,
}

impl<D> Dimensions for Scaled<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        let side = (SCALED_EXTENT as u32) * 2;
        Rectangle::new(Point::new(-SCALED_EXTENT, -SCALED_EXTENT), Size::new(side, side))
    }
}

impl<D> DrawTarget for Scaled<'_, D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    type Color = BinaryColor;
    type Error = D::Error;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let scale = self.scale as i32;
        let block = Size::new_equal(self.scale);
        for Pixel(point, color) in pixels {
            let top_left = self.origin + point * scale;
            self.inner.fill_solid(&Rectangle::new(top_left, block), color)?;
        }
        Ok(())
    }
}

// =============================================================================
// Primitives
// =============================================================================

/// Draw `text` with its left edge at `x` and alphabetic baseline at `y`.
pub fn draw_scaled_text<D>(
    display: &mut D,
    text: &str,
    font: ScaledFont,
    x: i32,
    y: i32,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = TextStyleBuilder::new().baseline(Baseline::Alphabetic).build();
    let mut scaled = Scaled { inner: display, origin: Point::new(x, y), scale: font.scale.max(1) };
    Text::with_text_style(text, Point::zero(), font.style(), style)
        .draw(&mut scaled)
        .ok();
}

/// Stroke a 1px line, skipping the off runs of `dash`.
pub fn draw_dashed_line<D>(
    display: &mut D,
    from: Point,
    to: Point,
    dash: LineDash,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let pixels = Line::new(from, to)
        .points()
        .enumerate()
        .filter(|(i, _)| dash.is_on(*i as u32))
        .map(|(_, p)| Pixel(p, INK));
    display.draw_iter(pixels).ok();
}

/// Draw the ink pixels of `image` with its top-left corner at `top_left`.
/// Paper pixels are left untouched.
pub fn draw_bitmap<D>(
    display: &mut D,
    image: &Bitmap,
    top_left: Point,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let pixels = image
        .ink_pixels()
        .map(|(x, y)| Pixel(top_left + Point::new(x as i32, y as i32), INK));
    display.draw_iter(pixels).ok();
}

#[cfg(test)]
mod tests {
    use embedded_graphics::mock_display::MockDisplay;

    use super::*;

    #[test]
    fn test_dashed_line_skips_gaps() {
        let mut display: MockDisplay<BinaryColor> = MockDisplay::new();
        draw_dashed_line(&mut display, Point::new(0, 0), Point::new(5, 0), LineDash::Hairline);
        display.assert_pattern(&["# # #"]);
    }

    #[test]
    fn test_bitmap_draws_ink_only() {
        let mut display: MockDisplay<BinaryColor> = MockDisplay::new();
        let image = Bitmap::from_fn(2, 2, |x, y| x == y);
        draw_bitmap(&mut display, &image, Point::new(1, 1));
        display.assert_pattern(&["   ", " # ", "  #"]);
    }

    #[test]
    fn test_scaled_text_draws_blocks() {
        let mut display: MockDisplay<BinaryColor> = MockDisplay::new();
        display.set_allow_overdraw(true);
        let font = ScaledFont { font: &embedded_graphics::mono_font::ascii::FONT_4X6, scale: 2 };
        draw_scaled_text(&mut display, "|", font, 0, 10);
        let area = display.affected_area();
        assert!(area.size.height >= 2);
        assert_eq!(area.size.height % 2, 0);
    }
}
