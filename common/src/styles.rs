//! Bitmap font ladders and scaled font resolution.
//!
//! # Scalable Text From Mono Fonts
//!
//! The layout engine asks for arbitrary pixel sizes (26px event lines, a 350px
//! day numeral). Each [`FontFamily`] maps to a ladder of fixed-size
//! `MonoFont`s and a request is served by the ladder font whose integer
//! multiple lands closest to the requested height:
//!
//! ```ignore
//! scale = max(1, round(target / font_height))
//! error = |font_height * scale - target|
//! ```
//!
//! Ties go to the larger base font, which keeps glyph detail at big sizes.
//!
//! # Metrics
//!
//! Ascent is the font's baseline offset and descent the remainder of the cell,
//! both multiplied by the scale. Width comes from the font's own string
//! measurement.

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        iso_8859_1::{
            FONT_4X6, FONT_5X8, FONT_6X10, FONT_6X12, FONT_6X13_BOLD, FONT_7X13, FONT_7X14_BOLD, FONT_8X13_BOLD,
            FONT_9X15, FONT_9X15_BOLD, FONT_9X18, FONT_9X18_BOLD, FONT_10X20,
        },
    },
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, renderer::TextRenderer},
};
use profont::{
    PROFONT_7_POINT, PROFONT_9_POINT, PROFONT_10_POINT, PROFONT_12_POINT, PROFONT_14_POINT, PROFONT_18_POINT,
    PROFONT_24_POINT,
};

use crate::colors::INK;
use crate::fonts::{FontFamily, FontSpec};
use crate::surface::TextMetrics;

// =============================================================================
// Font Ladders (ascending cell height)
// =============================================================================

/// `ProFont` sizes for Latin text.
const REGULAR_LADDER: &[&MonoFont<'static>] = &[
    &PROFONT_7_POINT,
    &PROFONT_9_POINT,
    &PROFONT_10_POINT,
    &PROFONT_12_POINT,
    &PROFONT_14_POINT,
    &PROFONT_18_POINT,
    &PROFONT_24_POINT,
];

/// Latin-1 fixed fonts used as the fallback family.
const FALLBACK_LADDER: &[&MonoFont<'static>] =
    &[&FONT_4X6, &FONT_5X8, &FONT_6X10, &FONT_6X12, &FONT_7X13, &FONT_9X15, &FONT_9X18, &FONT_10X20];

/// Bold fixed fonts for the Today tile.
const BLACK_LADDER: &[&MonoFont<'static>] =
    &[&FONT_6X13_BOLD, &FONT_8X13_BOLD, &FONT_7X14_BOLD, &FONT_9X15_BOLD, &FONT_9X18_BOLD];

/// Ladder for a family.
#[inline]
pub const fn ladder(family: FontFamily) -> &'static [&'static MonoFont<'static>] {
    match family {
        FontFamily::Regular => REGULAR_LADDER,
        FontFamily::Fallback => FALLBACK_LADDER,
        FontFamily::Black => BLACK_LADDER,
    }
}

// =============================================================================
// Scaled Font
// =============================================================================

/// A ladder font plus the integer scale that approximates a requested size.
#[derive(Clone, Copy)]
pub struct ScaledFont {
    pub font: &'static MonoFont<'static>,
    pub scale: u32,
}

impl core::fmt::Debug for ScaledFont {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("ScaledFont")
            .field("cell", &self.font.character_size)
            .field("scale", &self.scale)
            .finish()
    }
}

impl ScaledFont {
    /// Pick the ladder font and scale closest to `spec.pixel_size`.
    pub fn resolve(spec: &FontSpec) -> Self {
        let target = spec.pixel_size.max(1);
        let fonts = ladder(spec.family);
        let mut best = Self { font: fonts[0], scale: 1 };
        let mut best_error = u32::MAX;
        for &font in fonts {
            let height = font.character_size.height.max(1);
            let scale = ((target + height / 2) / height).max(1);
            let error = (height * scale).abs_diff(target);
            if error <= best_error {
                best = Self { font, scale };
                best_error = error;
            }
        }
        best
    }

    /// Rendered cell height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 { self.font.character_size.height * self.scale }

    /// Text style for drawing at scale 1.
    #[inline]
    pub const fn style(&self) -> MonoTextStyle<'static, BinaryColor> { MonoTextStyle::new(self.font, INK) }

    /// Measure `text` at the effective size.
    pub fn measure(
        &self,
        text: &str,
    ) -> TextMetrics {
        let advance = self.style().measure_string(text, Point::zero(), Baseline::Alphabetic).next_position.x;
        let scale = self.scale as f32;
        let baseline = self.font.baseline as f32;
        let height = self.font.character_size.height as f32;
        TextMetrics { width: advance as f32 * scale, ascent: baseline * scale, descent: (height - baseline) * scale }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladders_ascending() {
        for family in [FontFamily::Regular, FontFamily::Fallback, FontFamily::Black] {
            let heights: Vec<u32> = ladder(family).iter().map(|f| f.character_size.height).collect();
            assert!(heights.windows(2).all(|w| w[0] <= w[1]), "{family:?} ladder not ascending");
        }
    }

    #[test]
    fn test_resolve_small_sizes_unscaled() {
        let font = ScaledFont::resolve(&FontSpec::new(FontFamily::Fallback, 20));
        assert_eq!(font.scale, 1);
        assert_eq!(font.height(), 20);
    }

    #[test]
    fn test_resolve_large_sizes_scale_up() {
        let font = ScaledFont::resolve(&FontSpec::black(350));
        assert!(font.scale > 10);
        assert!(font.height().abs_diff(350) <= 10);
    }

    #[test]
    fn test_resolve_zero_is_clamped() {
        let font = ScaledFont::resolve(&FontSpec::new(FontFamily::Regular, 0));
        assert_eq!(font.scale, 1);
    }

    #[test]
    fn test_measure_scales_width() {
        let one = ScaledFont { font: &FONT_10X20, scale: 1 };
        let two = ScaledFont { font: &FONT_10X20, scale: 2 };
        assert_eq!(one.measure("abc").width, 30.0);
        assert_eq!(two.measure("abc").width, 60.0);
        let metrics = two.measure("abc");
        assert_eq!(metrics.ascent + metrics.descent, 40.0);
    }
}
