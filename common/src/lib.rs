//! Layout and text-fitting engine for the inkboard e-ink dashboard.
//!
//! This crate turns a day's calendar events (plus an optional weather reading)
//! into a deterministic sequence of draw operations on a fixed 480x800 canvas.
//! It contains no I/O: retrieval, configuration files, logging setup and PNG
//! encoding live in the `inkboard` application crate.
//!
//! - [`colors`]: 1-bit ink/paper color constants
//! - [`config`]: Canvas dimensions, margins and font sizes
//! - [`thresholds`]: Fitting thresholds and script size offsets
//! - [`surface`]: The [`Surface`] drawing contract consumed by the views
//! - [`fonts`]: Script-aware font selection
//! - [`text`]: Truncation to width and line-height computation
//! - [`event`]: Event model, relevance filter and the end-time-ordered collection
//! - [`weather`]: Weather reading model
//! - [`cursor`]: Vertical layout cursor and horizontal rules
//! - [`views`]: Agenda and Today page composition
//! - [`styles`]: Bitmap font ladders and integer scaling for raster output
//! - [`raster`]: [`Surface`] implementation over any embedded-graphics `DrawTarget`
//! - [`recording`]: [`Surface`] implementation that records draw operations
//!
//! # Draw Pass Ownership
//!
//! A view borrows the surface mutably for the whole draw pass and owns the
//! cursor offset. Two views can never draw to the same surface at once.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod colors;
pub mod config;
pub mod cursor;
pub mod event;
pub mod fonts;
pub mod raster;
pub mod recording;
pub mod styles;
pub mod surface;
pub mod text;
pub mod thresholds;
pub mod views;
pub mod weather;
mod widgets;

// Re-export commonly used items
pub use cursor::{LayoutCursor, RuleSpan};
pub use event::{Event, EventCollection, RenderWindow};
pub use fonts::{FontFamily, FontSpec, FontWeight, select_font};
pub use raster::RasterSurface;
pub use recording::{DrawOp, RecordingSurface};
pub use surface::{Bitmap, LineDash, Surface, TextMetrics};
pub use text::{line_height, truncate_to_width};
pub use views::{AgendaView, AllDayStyle, Assets, Page, Presentation, RenderContext, TodayView, UnknownPage};
pub use weather::WeatherReading;
