//! Mock external ranking service

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct MockRankingServer {
    server: MockServer,
}

impl MockRankingServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub async fn mock_rank_success(&self, user_id: i32, processed: u32, removed: u32) {
        Mock::given(method("POST"))
            .and(path(format!("/rank-events/{}", user_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Events ranked successfully",
                "events_processed": processed,
                "events_removed": removed
            })))
            .mount(&self.server)
            .await;
    }

    /// The service answered but reported it could not rank
    pub async fn mock_rank_declined(&self, user_id: i32, message: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/rank-events/{}", user_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": message,
                "events_processed": 0,
                "events_removed": 0
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_rank_server_error(&self, user_id: i32) {
        Mock::given(method("POST"))
            .and(path(format!("/rank-events/{}", user_id)))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "detail": "Error ranking events: model not loaded"
            })))
            .mount(&self.server)
            .await;
    }
}
