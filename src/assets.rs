//! Logo and weather icon loading.
//!
//! Images are decoded with `image`, resized to their slot and thresholded to
//! 1-bit. Transparent pixels count as paper. A missing or unreadable image is
//! logged and the page renders without it.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use inkboard_common::colors::INK_THRESHOLD;
use inkboard_common::config::{LOGO_HEIGHT, LOGO_WIDTH, TODAY_BADGE_SIZE};
use inkboard_common::{Assets, Bitmap, WeatherReading};
use tracing::{debug, warn};

use crate::error::AssetError;
use crate::settings::AssetSettings;

/// Alpha below which a pixel is treated as transparent.
const ALPHA_CUTOFF: u8 = 128;

/// Decode `path` into a bitmap, resized to `size` when given.
pub fn load_bitmap(
    path: &Path,
    size: Option<(u32, u32)>,
) -> Result<Bitmap, AssetError> {
    let mut image = image::open(path).map_err(|source| AssetError::Image { path: path.to_owned(), source })?;
    if let Some((width, height)) = size {
        if image.width() != width || image.height() != height {
            image = image.resize_exact(width, height, FilterType::Triangle);
        }
    }
    let pixels = image.to_luma_alpha8();
    Ok(Bitmap::from_fn(pixels.width(), pixels.height(), |x, y| {
        let [value, alpha] = pixels.get_pixel(x, y).0;
        alpha >= ALPHA_CUTOFF && value <= INK_THRESHOLD
    }))
}

/// Icon file for a condition code, rejecting anything that is not a plain
/// `[a-z0-9-]` name.
fn icon_path(
    dir: &Path,
    code: &str,
) -> Option<PathBuf> {
    let plain = !code.is_empty() && code.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    plain.then(|| dir.join(format!("{code}.png")))
}

fn load_optional(
    what: &str,
    path: &Path,
    size: (u32, u32),
) -> Option<Bitmap> {
    match load_bitmap(path, Some(size)) {
        Ok(bitmap) => {
            debug!(what, path = %path.display(), "image loaded");
            Some(bitmap)
        }
        Err(e) => {
            warn!(what, error = %e, "image unavailable, skipping");
            None
        }
    }
}

/// Load the images a render needs.
pub fn load_assets(
    settings: &AssetSettings,
    weather: Option<&WeatherReading>,
) -> Assets {
    let logo = settings.logo.as_deref().and_then(|path| load_optional("logo", path, (LOGO_WIDTH, LOGO_HEIGHT)));

    let code = weather.and_then(|w| w.icon.as_deref());
    let weather_icon = match (settings.weather_icons.as_deref(), code) {
        (Some(dir), Some(code)) => match icon_path(dir, code) {
            Some(path) => load_optional("weather icon", &path, (TODAY_BADGE_SIZE, TODAY_BADGE_SIZE)),
            None => {
                warn!(code, "ignoring weather icon code with unexpected characters");
                None
            }
        },
        _ => None,
    };

    Assets { logo, weather_icon }
}
