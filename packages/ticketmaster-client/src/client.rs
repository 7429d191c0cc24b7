//! Ticketmaster Discovery API client implementation

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::error::{TicketmasterError, TicketmasterResult};
use crate::models::{SearchResponse, TicketmasterEvent};

/// Ticketmaster API base URL
const TICKETMASTER_API_URL: &str = "https://app.ticketmaster.com";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Discovery API page size (its maximum is 200)
const PAGE_SIZE: u32 = 100;

/// Largest radius the Discovery API accepts, in miles
const MAX_RADIUS_MILES: u32 = 19_999;

/// Default number of retry attempts for transient failures
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds)
const RETRY_BASE_DELAY_MS: u64 = 100;

/// Ticketmaster Discovery API client
#[derive(Clone)]
pub struct TicketmasterClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
}

impl fmt::Debug for TicketmasterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicketmasterClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl TicketmasterClient {
    /// Create a client against the public Ticketmaster API
    ///
    /// # Errors
    /// Returns `TicketmasterError::MissingApiKey` if the API key is blank
    pub fn new(api_key: impl Into<String>) -> TicketmasterResult<Self> {
        Self::with_base_url(api_key, TICKETMASTER_API_URL)
    }

    /// Create a client against a custom host (used by tests and proxies)
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> TicketmasterResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(TicketmasterError::MissingApiKey);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .user_agent("Ventaura/1.0")
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Override the retry budget (zero disables retries)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn validate_search(latitude: f64, longitude: f64, radius_miles: u32) -> TicketmasterResult<()> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(TicketmasterError::InvalidInput(format!(
                "latitude out of range: {}",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(TicketmasterError::InvalidInput(format!(
                "longitude out of range: {}",
                longitude
            )));
        }
        if radius_miles == 0 || radius_miles > MAX_RADIUS_MILES {
            return Err(TicketmasterError::InvalidInput(format!(
                "radius must be between 1 and {} miles",
                MAX_RADIUS_MILES
            )));
        }
        Ok(())
    }

    /// Execute an operation with retry logic for transient failures
    async fn with_retry<T, F, Fut>(&self, operation: F) -> TicketmasterResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = TicketmasterResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = RETRY_BASE_DELAY_MS * 2u64.pow(attempt);
                    warn!(
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms,
                        error = %e,
                        "Ticketmaster request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn make_request(&self, params: &[(&str, &str)]) -> TicketmasterResult<String> {
        let url = format!("{}/discovery/v2/events.json", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TicketmasterError::Timeout
                } else {
                    TicketmasterError::Http(e)
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!("Ticketmaster API rate limited");
            return Err(TicketmasterError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TicketmasterError::Api {
                status: status.as_u16(),
                message: truncate(&message, 200),
            });
        }

        response.text().await.map_err(TicketmasterError::Http)
    }

    /// Search for events within `radius_miles` of a coordinate
    ///
    /// # Errors
    /// - `TicketmasterError::InvalidInput` - coordinates or radius out of range
    /// - `TicketmasterError::Api` - Ticketmaster returned a non-success status
    /// - `TicketmasterError::Http` - the request could not be completed
    #[instrument(skip(self))]
    pub async fn search_events(
        &self,
        latitude: f64,
        longitude: f64,
        radius_miles: u32,
    ) -> TicketmasterResult<Vec<TicketmasterEvent>> {
        Self::validate_search(latitude, longitude, radius_miles)?;

        let latlong = format!("{},{}", latitude, longitude);
        let radius = radius_miles.to_string();
        let size = PAGE_SIZE.to_string();

        let text = self
            .with_retry(|| async {
                self.make_request(&[
                    ("apikey", self.api_key.as_str()),
                    ("latlong", &latlong),
                    ("radius", &radius),
                    ("unit", "miles"),
                    ("size", &size),
                ])
                .await
            })
            .await?;

        let response: SearchResponse = serde_json::from_str(&text)?;
        let events: Vec<TicketmasterEvent> = response
            .embedded
            .map(|e| e.events)
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect();

        debug!(result_count = events.len(), "Fetched Ticketmaster events");

        Ok(events)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        assert!(matches!(
            TicketmasterClient::new(""),
            Err(TicketmasterError::MissingApiKey)
        ));
        assert!(matches!(
            TicketmasterClient::new("   "),
            Err(TicketmasterError::MissingApiKey)
        ));
    }

    #[test]
    fn test_client_debug_redacts_api_key() {
        let client = TicketmasterClient::new("tm_secret_key").unwrap();
        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("tm_secret_key"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = TicketmasterClient::with_base_url("key", "http://localhost:1234/").unwrap();
        assert_eq!(client.base_url, "http://localhost:1234");
    }

    #[test]
    fn test_validate_search_bounds() {
        assert!(TicketmasterClient::validate_search(42.0, -71.0, 20).is_ok());
        assert!(TicketmasterClient::validate_search(91.0, -71.0, 20).is_err());
        assert!(TicketmasterClient::validate_search(42.0, 181.0, 20).is_err());
        assert!(TicketmasterClient::validate_search(f64::NAN, 0.0, 20).is_err());
        assert!(TicketmasterClient::validate_search(42.0, -71.0, 0).is_err());
    }

    #[test]
    fn test_error_is_retryable() {
        assert!(TicketmasterError::Timeout.is_retryable());
        assert!(TicketmasterError::RateLimited.is_retryable());
        assert!(TicketmasterError::Api {
            status: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(!TicketmasterError::Api {
            status: 401,
            message: String::new()
        }
        .is_retryable());
        assert!(!TicketmasterError::MissingApiKey.is_retryable());
    }
}
