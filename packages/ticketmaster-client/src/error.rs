//! Ticketmaster API error types

use thiserror::Error;

/// Ticketmaster client errors
#[derive(Error, Debug)]
pub enum TicketmasterError {
    /// API key is missing or blank
    #[error("API key is required for Ticketmaster API access")]
    MissingApiKey,

    /// Caller passed coordinates or a radius Ticketmaster would reject
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expected
    #[error("Failed to parse Ticketmaster response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Non-success status other than 429
    #[error("Ticketmaster API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Quota exceeded (HTTP 429)
    #[error("Rate limited by Ticketmaster API")]
    RateLimited,

    /// Request timeout
    #[error("Request to Ticketmaster timed out")]
    Timeout,
}

impl TicketmasterError {
    /// Check if this error is a transient failure worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::RateLimited => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Http(e) => {
                if e.is_timeout() || e.is_connect() {
                    return true;
                }
                matches!(e.status(), Some(status) if status.is_server_error())
            }
            _ => false,
        }
    }
}

/// Result type for Ticketmaster operations
pub type TicketmasterResult<T> = Result<T, TicketmasterError>;
