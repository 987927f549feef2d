//! Script-aware font selection.
//!
//! Event summaries can be Latin or Hebrew. The default family has no Hebrew
//! glyphs, so any text containing a code point from the Hebrew block switches
//! to the fallback family.
//!
//! # Size Compensation Policy
//!
//! The two families do not share a cap height at the same nominal size: the
//! fallback glyphs look larger, the default glyphs look smaller. Selection
//! therefore nudges the pixel size by
//! [`FALLBACK_SIZE_OFFSET`](crate::thresholds::FALLBACK_SIZE_OFFSET) or
//! [`DEFAULT_SIZE_OFFSET`](crate::thresholds::DEFAULT_SIZE_OFFSET) so mixed
//! pages read at the same visual size. This is intentional, not a rounding bug.

use core::fmt;

use crate::thresholds::{DEFAULT_SIZE_OFFSET, FALLBACK_SIZE_OFFSET};

/// First code point of the Hebrew Unicode block.
const HEBREW_FIRST: char = '\u{0590}';

/// Last code point of the Hebrew Unicode block.
const HEBREW_LAST: char = '\u{05FF}';

/// Font families known to the layout engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// Default family for Latin text.
    Regular,
    /// Fallback family reserved for right-to-left/Hebrew text.
    Fallback,
    /// Heavy family for the Today tile.
    Black,
}

impl FontFamily {
    /// Human-readable family name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Regular => "ProFont",
            Self::Fallback => "Fixed",
            Self::Black => "FixedBold",
        }
    }
}

/// Optional font weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
    Black,
}

impl FontWeight {
    /// CSS-style numeric weight.
    pub const fn numeric(self) -> u16 {
        match self {
            Self::Regular => 400,
            Self::Bold => 700,
            Self::Black => 900,
        }
    }
}

/// A fully resolved font request: family, pixel size and optional weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FontSpec {
    pub family: FontFamily,
    pub pixel_size: u32,
    pub weight: Option<FontWeight>,
}

impl FontSpec {
    /// A font with no explicit weight.
    pub const fn new(
        family: FontFamily,
        pixel_size: u32,
    ) -> Self {
        Self { family, pixel_size, weight: None }
    }

    /// The heavy Today-tile font. No script offset is applied.
    pub const fn black(pixel_size: u32) -> Self {
        Self { family: FontFamily::Black, pixel_size, weight: Some(FontWeight::Black) }
    }
}

impl fmt::Display for FontSpec {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if let Some(weight) = self.weight {
            write!(f, "{} ", weight.numeric())?;
        }
        write!(f, "{}px {}", self.pixel_size, self.family.name())
    }
}

/// Check whether `text` contains any code point in U+0590..=U+05FF.
pub fn contains_hebrew(text: &str) -> bool { text.chars().any(|c| (HEBREW_FIRST..=HEBREW_LAST).contains(&c)) }

/// Pick the family and compensated pixel size for rendering `sample_text`
/// at a nominal `desired_pixel_size`.
pub fn select_font(
    desired_pixel_size: u32,
    sample_text: &str,
) -> FontSpec {
    let (family, offset) = if contains_hebrew(sample_text) {
        (FontFamily::Fallback, FALLBACK_SIZE_OFFSET)
    } else {
        (FontFamily::Regular, DEFAULT_SIZE_OFFSET)
    };
    FontSpec::new(family, desired_pixel_size.saturating_add_signed(offset).max(1))
}
