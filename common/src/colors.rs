//! Color constants for the 1-bit e-ink canvas.
//!
//! The panel only knows two states, so everything is drawn in [`BinaryColor`].
//! `On` means ink (black on the panel), `Off` means bare paper (white).
//! The framebuffer is cleared to [`PAPER`] before a render starts.

use embedded_graphics::pixelcolor::BinaryColor;

/// Ink (black). Used for text, rules and image foreground pixels.
pub const INK: BinaryColor = BinaryColor::On;

/// Paper (white). Used for the background and unset pixels.
pub const PAPER: BinaryColor = BinaryColor::Off;

/// Luma value written to the output image for an ink pixel.
pub const INK_LUMA: u8 = 0;

/// Luma value written to the output image for a paper pixel.
pub const PAPER_LUMA: u8 = 255;

/// Luma at or below which an asset pixel is treated as ink when thresholding.
pub const INK_THRESHOLD: u8 = 127;

/// Convert a panel color to the luma written to the output image.
#[inline]
pub const fn luma(color: BinaryColor) -> u8 {
    match color {
        BinaryColor::On => INK_LUMA,
        BinaryColor::Off => PAPER_LUMA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ink_is_black() {
        assert_eq!(luma(INK), 0);
        assert_eq!(luma(PAPER), 255);
    }

    #[test]
    fn test_threshold_between_ink_and_paper() {
        assert!(INK_LUMA <= INK_THRESHOLD);
        assert!(INK_THRESHOLD < PAPER_LUMA);
    }
}
