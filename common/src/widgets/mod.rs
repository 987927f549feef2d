//! Pixel-level drawing helpers behind [`RasterSurface`](crate::raster::RasterSurface).
//!
//! All helpers are generic over `DrawTarget<Color = BinaryColor>`.

mod primitives;

pub use primitives::{draw_bitmap, draw_dashed_line, draw_scaled_text};
