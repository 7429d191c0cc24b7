//! Yelp Fusion events client implementation

use std::fmt;
use std::future::Future;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, instrument, warn};

use crate::error::{YelpError, YelpResult};
use crate::models::{ErrorEnvelope, EventsResponse, YelpEvent};

const YELP_API_URL: &str = "https://api.yelp.com";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Events returned per request
const PAGE_LIMIT: u32 = 50;

/// Yelp rejects radii above 40 km
pub const MAX_RADIUS_METERS: u32 = 40_000;

const DEFAULT_MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY_MS: u64 = 100;

/// Yelp Fusion events client
#[derive(Clone)]
pub struct YelpClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
}

impl fmt::Debug for YelpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YelpClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl YelpClient {
    pub fn new(api_key: impl Into<String>) -> YelpResult<Self> {
        Self::with_base_url(api_key, YELP_API_URL)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> YelpResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(YelpError::MissingApiKey);
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

    async fn with_retry<T, F, Fut>(&self, operation: F) -> YelpResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = YelpResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = RETRY_BASE_DELAY_MS * 2u64.pow(attempt);
                    warn!(attempt, delay_ms, error = %e, "Yelp request failed, retrying");
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn make_request(&self, params: &[(&str, String)]) -> YelpResult<String> {
        let response = self
            .http_client
            .get(format!("{}/v3/events", self.base_url))
            .bearer_auth(&self.api_key)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    YelpError::Timeout
                } else {
                    YelpError::Http(e)
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Yelp API rate limited");
            return Err(YelpError::RateLimited);
        }

        let body = response.text().await?;
        if !status.is_success() {
            let (code, description) = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => (envelope.error.code, envelope.error.description),
                Err(_) => ("UNKNOWN".to_string(), body.chars().take(200).collect()),
            };
            return Err(YelpError::Api {
                status: status.as_u16(),
                code,
                description,
            });
        }

        Ok(body)
    }

    /// Search for upcoming events near a coordinate
    ///
    /// `radius_meters` is clamped to [`MAX_RADIUS_METERS`].
    #[instrument(skip(self))]
    pub async fn search_events(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: u32,
    ) -> YelpResult<Vec<YelpEvent>> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(YelpError::InvalidInput(format!(
                "coordinates out of range: {}, {}",
                latitude, longitude
            )));
        }

        let params = [
            ("limit", PAGE_LIMIT.to_string()),
            ("sort_by", "asc".to_string()),
            ("sort_on", "time_start".to_string()),
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("radius", radius_meters.min(MAX_RADIUS_METERS).to_string()),
        ];

        let body = self.with_retry(|| self.make_request(&params)).await?;
        let response: EventsResponse = serde_json::from_str(&body)?;
        let events: Vec<YelpEvent> = response.events.into_iter().map(Into::into).collect();

        debug!(result_count = events.len(), "Fetched Yelp events");
        Ok(events)
    }
}
