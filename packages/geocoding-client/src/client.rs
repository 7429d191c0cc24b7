//! Google Geocoding client implementation

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

use crate::error::{GeocodingError, GeocodingResult};
use crate::models::{Coordinates, GeocodeResponse};

const GOOGLE_MAPS_API_URL: &str = "https://maps.googleapis.com";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Longest address we are willing to send upstream
const MAX_ADDRESS_LENGTH: usize = 512;

const DEFAULT_MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY_MS: u64 = 100;

/// Google Geocoding API client
#[derive(Clone)]
pub struct GeocodingClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
}

impl fmt::Debug for GeocodingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocodingClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeocodingClient {
    pub fn new(api_key: impl Into<String>) -> GeocodingResult<Self> {
        Self::with_base_url(api_key, GOOGLE_MAPS_API_URL)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> GeocodingResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeocodingError::MissingApiKey);
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

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn validate_address(address: &str) -> GeocodingResult<&str> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(GeocodingError::InvalidInput(
                "address cannot be empty".to_string(),
            ));
        }
        if trimmed.len() > MAX_ADDRESS_LENGTH {
            return Err(GeocodingError::InvalidInput(format!(
                "address too long (max {} characters)",
                MAX_ADDRESS_LENGTH
            )));
        }
        Ok(trimmed)
    }

    async fn with_retry<T, F, Fut>(&self, operation: F) -> GeocodingResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = GeocodingResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = RETRY_BASE_DELAY_MS * 2u64.pow(attempt);
                    warn!(attempt, delay_ms, error = %e, "Geocoding request failed, retrying");
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Run a lookup and map Google's status field onto our error type
    ///
    /// `ZERO_RESULTS` yields an empty response rather than an error.
    async fn lookup(&self, params: &[(&str, &str)]) -> GeocodingResult<GeocodeResponse> {
        let response = self
            .http_client
            .get(format!("{}/maps/api/geocode/json", self.base_url))
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::Http(e)
                }
            })?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimited);
        }

        let response = response.error_for_status()?;
        let body: GeocodeResponse = serde_json::from_str(&response.text().await?)?;

        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(body),
            "OVER_QUERY_LIMIT" => {
                warn!("Google Geocoding quota exceeded");
                Err(GeocodingError::RateLimited)
            }
            _ => Err(GeocodingError::Api {
                message: body.error_message.unwrap_or_default(),
                status: body.status,
            }),
        }
    }

    /// Resolve an address or place name to coordinates
    ///
    /// Returns `Ok(None)` when Google has no match for the address.
    #[instrument(skip(self))]
    pub async fn geocode(&self, address: &str) -> GeocodingResult<Option<Coordinates>> {
        let address = Self::validate_address(address)?;

        let params = [("address", address)];
        let response = self.with_retry(|| self.lookup(&params)).await?;

        let coords = response
            .results
            .first()
            .map(|r| Coordinates::from(&r.geometry.location))
            .filter(Coordinates::is_valid);

        debug!(found = coords.is_some(), "Geocoded address");
        Ok(coords)
    }

    /// Resolve coordinates to Google's formatted address for the location
    #[instrument(skip(self))]
    pub async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> GeocodingResult<Option<String>> {
        if !Coordinates::new(latitude, longitude).is_valid() {
            return Err(GeocodingError::InvalidInput(format!(
                "coordinates out of range: {}, {}",
                latitude, longitude
            )));
        }

        let latlng = format!("{},{}", latitude, longitude);
        let params = [("latlng", latlng.as_str())];
        let response = self.with_retry(|| self.lookup(&params)).await?;

        Ok(response
            .results
            .into_iter()
            .find_map(|r| r.formatted_address.filter(|a| !a.trim().is_empty())))
    }
}
