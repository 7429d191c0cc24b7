//! Geocoding error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeocodingError {
    #[error("API key is required for Google Geocoding access")]
    MissingApiKey,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse geocoding response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Google returned a status other than OK / ZERO_RESULTS
    #[error("Geocoding API error {status}: {message}")]
    Api { status: String, message: String },

    /// `OVER_QUERY_LIMIT` or HTTP 429
    #[error("Rate limited by Google Geocoding API")]
    RateLimited,

    #[error("Request to Google Geocoding timed out")]
    Timeout,
}

impl GeocodingError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::RateLimited => true,
            Self::Api { status, .. } => status == "UNKNOWN_ERROR",
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || matches!(e.status(), Some(status) if status.is_server_error())
            }
            _ => false,
        }
    }
}

pub type GeocodingResult<T> = Result<T, GeocodingError>;
