//! The drawing surface contract consumed by the layout engine.
//!
//! Views never rasterize anything themselves. They talk to a [`Surface`], which
//! mirrors a 2D canvas context: select a font, measure a string, fill text at
//! a baseline position, blit an image, and stroke a (possibly dashed) line.
//!
//! Two implementations ship with this crate:
//! - [`RasterSurface`](crate::raster::RasterSurface) draws into any
//!   embedded-graphics `DrawTarget<Color = BinaryColor>`
//! - [`RecordingSurface`](crate::recording::RecordingSurface) records the
//!   operations with deterministic metrics (dry runs and tests)
//!
//! Coordinates are `f32` canvas pixels. Text `y` is the alphabetic baseline.

use crate::fonts::FontSpec;

// =============================================================================
// Text Metrics
// =============================================================================

/// Measured extents of a string in the current font.
///
/// `ascent` is the distance above the baseline, `descent` the distance below
/// it. Both are non-negative for ordinary text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width of the whole string.
    pub width: f32,
    /// Extent above the alphabetic baseline.
    pub ascent: f32,
    /// Extent below the alphabetic baseline.
    pub descent: f32,
}

// =============================================================================
// Line Dash Patterns
// =============================================================================

/// Dash pattern used by [`Surface::stroke_line`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineDash {
    /// Continuous line.
    #[default]
    Solid,
    /// Long dashes (10 on, 10 off). Separates the title block.
    Dashed,
    /// Short dots (3 on, 3 off). Flanks the footer message.
    Dotted,
    /// Alternating pixels (1 on, 1 off). Separates event blocks.
    Hairline,
}

impl LineDash {
    /// On/off run lengths in pixels. Empty means solid.
    #[inline]
    pub const fn pattern(self) -> &'static [u32] {
        match self {
            Self::Solid => &[],
            Self::Dashed => &[10, 10],
            Self::Dotted => &[3, 3],
            Self::Hairline => &[1, 1],
        }
    }

    /// Whether the pixel at `index` along the line is inked.
    pub fn is_on(
        self,
        index: u32,
    ) -> bool {
        let pattern = self.pattern();
        let period: u32 = pattern.iter().sum();
        if period == 0 {
            return true;
        }
        let mut pos = index % period;
        for (i, run) in pattern.iter().enumerate() {
            if pos < *run {
                return i % 2 == 0;
            }
            pos -= run;
        }
        true
    }
}

// =============================================================================
// Bitmap Images
// =============================================================================

/// A 1-bit image (logo, weather icon). `true` pixels are ink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl Bitmap {
    /// Create a bitmap from row-major pixels. Returns `None` if the pixel
    /// count does not match `width * height`.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<bool>,
    ) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self { width, height, pixels })
    }

    /// Create a bitmap by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(
        width: u32,
        height: u32,
        mut f: F,
    ) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self { width, height, pixels }
    }

    #[inline]
    pub const fn width(&self) -> u32 { self.width }

    #[inline]
    pub const fn height(&self) -> u32 { self.height }

    /// Whether `(x, y)` is ink. Out-of-range coordinates are paper.
    pub fn is_ink(
        &self,
        x: u32,
        y: u32,
    ) -> bool {
        x < self.width && y < self.height && self.pixels[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Iterate over the coordinates of all ink pixels.
    pub fn ink_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let width = self.width.max(1);
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, ink)| **ink)
            .map(move |(i, _)| ((i as u32) % width, (i as u32) / width))
    }
}

// =============================================================================
// Surface Trait
// =============================================================================

/// A fixed-size 2D drawing surface.
///
/// The current font and dash pattern are surface state, like a canvas context.
pub trait Surface {
    /// Select the font used by subsequent `measure_text` and `fill_text` calls.
    fn set_font(
        &mut self,
        font: &FontSpec,
    );

    /// Measure `text` in the current font.
    fn measure_text(
        &self,
        text: &str,
    ) -> TextMetrics;

    /// Draw `text` with its left edge at `x` and its baseline at `y`.
    fn fill_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
    );

    /// Draw `image` with its top-left corner at `(x, y)`.
    fn draw_image(
        &mut self,
        image: &Bitmap,
        x: f32,
        y: f32,
    );

    /// Select the dash pattern used by subsequent `stroke_line` calls.
    fn set_line_dash(
        &mut self,
        dash: LineDash,
    );

    /// Stroke a 1px line from `from` to `to` with the current dash pattern.
    fn stroke_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
    );
}
