//! Current weather from the Bright Sky API (DWD data).
//!
//! Weather is decoration: any failure is logged and the page renders
//! without it.

use inkboard_common::WeatherReading;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::WeatherError;
use crate::settings::WeatherSettings;

/// Public Bright Sky endpoint.
pub const BRIGHT_SKY_URL: &str = "https://api.brightsky.dev";

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    weather: Option<Conditions>,
}

#[derive(Debug, Deserialize)]
struct Conditions {
    temperature: Option<f64>,
    icon: Option<String>,
}

/// `current_weather` request URL for `settings`.
pub fn request_url(
    base: &str,
    settings: &WeatherSettings,
) -> Result<Url, WeatherError> {
    let mut params = vec![
        ("lat", settings.latitude.to_string()),
        ("lon", settings.longitude.to_string()),
    ];
    if let Some(tz) = &settings.time_zone {
        params.push(("tz", tz.clone()));
    }
    params.push(("units", "dwd".into()));
    Ok(Url::parse_with_params(&format!("{}/current_weather", base.trim_end_matches('/')), &params)?)
}

/// Fetch the current conditions from `base`.
pub async fn fetch_weather(
    client: &Client,
    base: &str,
    settings: &WeatherSettings,
) -> Result<WeatherReading, WeatherError> {
    let url = request_url(base, settings)?;
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(WeatherError::Status { status });
    }
    let body: CurrentWeather = response.json().await?;
    let conditions = body.weather.unwrap_or(Conditions { temperature: None, icon: None });
    Ok(WeatherReading {
        degrees: conditions.temperature.filter(|t| t.is_finite()),
        icon: conditions.icon.filter(|i| !i.trim().is_empty()),
    })
}

/// Weather for the render, or `None` when unconfigured or unavailable.
pub async fn load_weather(
    client: &Client,
    base: &str,
    settings: Option<&WeatherSettings>,
) -> Option<WeatherReading> {
    let Some(settings) = settings else {
        debug!("weather not configured");
        return None;
    };
    match fetch_weather(client, base, settings).await {
        Ok(reading) => {
            debug!(degrees = ?reading.degrees, icon = ?reading.icon, "weather loaded");
            Some(reading)
        }
        Err(e) => {
            warn!(error = %e, "weather unavailable, rendering without it");
            None
        }
    }
}
