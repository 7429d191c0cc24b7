//! Yelp Fusion error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum YelpError {
    #[error("API key is required for Yelp Fusion access")]
    MissingApiKey,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse Yelp response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Yelp wraps failures as `{"error": {"code": "...", "description": "..."}}`
    #[error("Yelp API error {status} ({code}): {description}")]
    Api {
        status: u16,
        code: String,
        description: String,
    },

    #[error("Rate limited by Yelp Fusion API")]
    RateLimited,

    #[error("Request to Yelp timed out")]
    Timeout,
}

impl YelpError {
    /// Check if this error is a transient failure worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::RateLimited => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || matches!(e.status(), Some(status) if status.is_server_error())
            }
            _ => false,
        }
    }
}

pub type YelpResult<T> = Result<T, YelpError>;
