//! Client for the external ranking service
//!
//! The ranking service reads the user's Session CSV from the database,
//! reorders it and writes it back. This side only triggers the run.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ApiError, ApiResult};

/// Upper bound for one ranking run
const RANKING_TIMEOUT: Duration = Duration::from_secs(60);

/// Result reported by the ranking service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "events_processed")]
    pub events_processed: u32,
    #[serde(default, alias = "events_removed")]
    pub events_removed: u32,
}

/// HTTP client for `POST {base}/rank-events/{userId}`
#[derive(Debug, Clone)]
pub struct RankingService {
    http_client: reqwest::Client,
    base_url: String,
}

impl RankingService {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(RANKING_TIMEOUT)
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Ask the ranking service to rank the user's stored events
    ///
    /// # Errors
    /// - `ApiError::Ranking` - the service was unreachable, answered with a
    ///   non-success status, or sent a body that is not a ranking response
    #[instrument(skip(self))]
    pub async fn rank_events_for_user(&self, user_id: i32) -> ApiResult<RankingResponse> {
        let url = format!("{}/rank-events/{}", self.base_url, user_id);

        let response = self
            .http_client
            .post(&url)
            .send()
            .await
            .map_err(|e| ApiError::Ranking(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Ranking(format!(
                "status {}: {}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            )));
        }

        let ranking: RankingResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Ranking(format!("invalid response body: {}", e)))?;

        tracing::info!(
            user_id,
            success = ranking.success,
            events_processed = ranking.events_processed,
            events_removed = ranking.events_removed,
            "Ranking service responded"
        );

        Ok(ranking)
    }
}
