//! Mock Yelp Fusion events API

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EVENTS_PATH: &str = "/v3/events";

pub struct MockYelpServer {
    server: MockServer,
    api_key: String,
}

impl MockYelpServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            api_key: "test-yelp-key".to_string(),
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    pub async fn mock_events_success(&self, events: Vec<YelpEventFixture>) {
        let events: Vec<serde_json::Value> = events.iter().map(YelpEventFixture::to_json).collect();
        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .and(header("Authorization", self.bearer().as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "total": events.len(), "events": events })),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mock_unauthorized(&self) {
        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "code": "TOKEN_INVALID", "description": "Invalid access token or authorization header." }
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_server_error(&self) {
        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "error": { "code": "SERVICE_UNAVAILABLE", "description": "Try again later." }
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }
}

/// Builder for a Yelp event document
#[derive(Debug, Clone)]
pub struct YelpEventFixture {
    pub id: String,
    pub name: String,
    pub category: String,
    pub cost: Option<f64>,
    pub is_free: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub display_address: Vec<String>,
}

impl YelpEventFixture {
    /// A music event near Boston Common
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: "music".to_string(),
            cost: Some(20.0),
            is_free: false,
            latitude: Some(42.355),
            longitude: Some(-71.0656),
            display_address: vec!["139 Tremont St".to_string(), "Boston, MA 02111".to_string()],
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn free(mut self) -> Self {
        self.is_free = true;
        self.cost = None;
        self
    }

    pub fn without_coordinates(mut self) -> Self {
        self.latitude = None;
        self.longitude = None;
        self
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "name": self.name,
            "description": format!("{} description", self.name),
            "category": self.category,
            "cost": self.cost,
            "is_free": self.is_free,
            "time_start": "2025-06-02T18:00:00-04:00",
            "event_site_url": format!("https://www.yelp.com/events/{}", self.id),
            "latitude": self.latitude,
            "longitude": self.longitude,
            "location": { "display_address": self.display_address }
        })
    }
}
