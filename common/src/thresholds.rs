//! Centralized fitting thresholds and size offsets.
//!
//! All thresholds are compile-time constants with validation assertions, so a
//! misconfigured pair (e.g. a footer minimum above the footer maximum) fails
//! the build instead of silently drawing nothing.

use crate::config::FOOTER_MAX_FONT_SIZE;

// =============================================================================
// Footer Shrink-to-Fit
// =============================================================================

/// The footer is not attempted unless more than this much vertical space remains.
pub const FOOTER_MIN_SPACE: f32 = 17.0;

/// The footer search stops once the candidate size drops to this value.
pub const FOOTER_MIN_FONT_SIZE: u32 = 17;

const _: () = assert!(FOOTER_MIN_FONT_SIZE < FOOTER_MAX_FONT_SIZE);

// =============================================================================
// Event Classification
// =============================================================================

/// Shortest span (seconds) that still counts as a full-day event.
pub const FULL_DAY_SECS: i64 = 24 * 3600;

/// Timed events longer than this (seconds) get an end-time detail line.
pub const DETAIL_MIN_DURATION_SECS: i64 = 5 * 60;

const _: () = assert!(DETAIL_MIN_DURATION_SECS < FULL_DAY_SECS);

// =============================================================================
// Script-Aware Size Offsets
// =============================================================================

/// Pixel offset applied when the fallback (Hebrew) family is selected.
///
/// The fallback glyphs render visually larger at the same nominal size.
pub const FALLBACK_SIZE_OFFSET: i32 = -2;

/// Pixel offset applied to the default family.
///
/// The default glyphs render visually smaller at the same nominal size.
pub const DEFAULT_SIZE_OFFSET: i32 = 2;

const _: () = assert!(FALLBACK_SIZE_OFFSET < 0);
const _: () = assert!(DEFAULT_SIZE_OFFSET > 0);

/// Check whether an event of `duration_secs` gets an end-time detail line.
#[inline]
pub const fn wants_end_detail(duration_secs: i64) -> bool { duration_secs > DETAIL_MIN_DURATION_SECS }
