//! Amadeus API error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmadeusError {
    #[error("client id and secret are required for Amadeus API access")]
    MissingCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse Amadeus response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The token endpoint refused our client credentials
    #[error("Amadeus authentication failed: {0}")]
    Authentication(String),

    /// The cached token was rejected; the next attempt fetches a new one
    #[error("Amadeus access token expired")]
    TokenExpired,

    #[error("Amadeus API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited by Amadeus API")]
    RateLimited,

    #[error("Request to Amadeus timed out")]
    Timeout,
}

impl AmadeusError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::RateLimited | Self::TokenExpired => true,
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

pub type AmadeusResult<T> = Result<T, AmadeusError>;
