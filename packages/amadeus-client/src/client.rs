//! Amadeus activities client implementation

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::error::{AmadeusError, AmadeusResult};
use crate::models::{ActivitiesResponse, AmadeusActivity, ErrorsResponse, TokenResponse};

/// Amadeus self-service test environment
const AMADEUS_API_URL: &str = "https://test.api.amadeus.com";

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Refresh the token this long before Amadeus says it expires
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

/// Activities search radius limit in kilometres
const MAX_RADIUS_KM: u32 = 20;

const DEFAULT_MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY_MS: u64 = 100;

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Amadeus activities client
///
/// Clones share the token cache.
#[derive(Clone)]
pub struct AmadeusClient {
    http_client: Client,
    client_id: String,
    client_secret: String,
    base_url: String,
    max_retries: u32,
    token: Arc<Mutex<Option<CachedToken>>>,
}

impl fmt::Debug for AmadeusClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmadeusClient")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AmadeusClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> AmadeusResult<Self> {
        Self::with_base_url(client_id, client_secret, AMADEUS_API_URL)
    }

    pub fn with_base_url(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> AmadeusResult<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return Err(AmadeusError::MissingCredentials);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .user_agent("Ventaura/1.0")
            .build()?;

        Ok(Self {
            http_client,
            client_id,
            client_secret,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            token: Arc::new(Mutex::new(None)),
        })
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    async fn with_retry<T, F, Fut>(&self, operation: F) -> AmadeusResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AmadeusResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = RETRY_BASE_DELAY_MS * 2u64.pow(attempt);
                    warn!(attempt, delay_ms, error = %e, "Amadeus request failed, retrying");
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn map_send_error(e: reqwest::Error) -> AmadeusError {
        if e.is_timeout() {
            AmadeusError::Timeout
        } else {
            AmadeusError::Http(e)
        }
    }

    /// Return a valid access token, exchanging credentials when needed
    ///
    /// The lock is held across the exchange so concurrent callers wait for a
    /// single token request instead of racing.
    async fn access_token(&self) -> AmadeusResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting new Amadeus access token");
        let response = self
            .http_client
            .post(format!("{}/v1/security/oauth2/token", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AmadeusError::RateLimited);
        }
        if status.is_server_error() {
            return Err(AmadeusError::Api {
                status: status.as_u16(),
                message: "token endpoint unavailable".to_string(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AmadeusError::Authentication(describe_errors(&body)));
        }

        let token: TokenResponse = serde_json::from_str(&response.text().await?)?;
        let lifetime = token.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            refresh_at: Instant::now() + Duration::from_secs(lifetime),
        });

        Ok(token.access_token)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    async fn fetch_activities(&self, params: &[(&str, String)]) -> AmadeusResult<String> {
        let token = self.access_token().await?;
        let response = self
            .http_client
            .get(format!("{}/v1/shopping/activities", self.base_url))
            .bearer_auth(token)
            .query(params)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.invalidate_token().await;
            return Err(AmadeusError::TokenExpired);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Amadeus API rate limited");
            return Err(AmadeusError::RateLimited);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(AmadeusError::Api {
                status: status.as_u16(),
                message: describe_errors(&body),
            });
        }

        Ok(body)
    }

    /// Search for tours and activities near a coordinate
    ///
    /// `radius_km` is clamped to the 20 km the API supports.
    #[instrument(skip(self))]
    pub async fn search_activities(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: u32,
    ) -> AmadeusResult<Vec<AmadeusActivity>> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(AmadeusError::InvalidInput(format!(
                "coordinates out of range: {}, {}",
                latitude, longitude
            )));
        }

        let params = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("radius", radius_km.clamp(1, MAX_RADIUS_KM).to_string()),
        ];

        let body = self.with_retry(|| self.fetch_activities(&params)).await?;
        let response: ActivitiesResponse = serde_json::from_str(&body)?;
        let activities: Vec<AmadeusActivity> =
            response.data.into_iter().map(Into::into).collect();

        debug!(result_count = activities.len(), "Fetched Amadeus activities");
        Ok(activities)
    }
}

/// Flatten an Amadeus `{"errors": [...]}` body into one line
fn describe_errors(body: &str) -> String {
    match serde_json::from_str::<ErrorsResponse>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed
            .errors
            .into_iter()
            .map(|e| match (e.title, e.detail) {
                (Some(t), Some(d)) => format!("{}: {}", t, d),
                (Some(t), None) => t,
                (None, Some(d)) => d,
                (None, None) => "unknown error".to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.chars().take(200).collect(),
    }
}
