//! Error types for the application stages.
//!
//! Each stage has its own enum. Only settings errors are fatal; source,
//! weather and asset errors are logged and recovered where they occur.

use std::path::PathBuf;

use thiserror::Error;

/// Loading or validating the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings file {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Retrieving or parsing one calendar source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed")]
    Http(#[from] reqwest::Error),

    #[error("server answered {status}")]
    Status { status: reqwest::StatusCode },

    #[error("unparsable calendar data: {0}")]
    Parse(String),

    #[error("cannot build request: {0}")]
    Request(String),
}

impl SourceError {
    /// Whether another attempt could succeed: transport failures and server
    /// side statuses are retried, client errors and bad payloads are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Status { status } => status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS,
            Self::Parse(_) | Self::Request(_) => false,
        }
    }
}

/// Retrieving the current weather.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather request failed")]
    Http(#[from] reqwest::Error),

    #[error("weather service answered {status}")]
    Status { status: reqwest::StatusCode },

    #[error("invalid weather endpoint: {0}")]
    Url(#[from] url::ParseError),
}

/// Loading an image asset.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("cannot decode image {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Writing the rendered page.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot write {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
