//! Mock Ticketmaster Discovery API

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EVENTS_PATH: &str = "/discovery/v2/events.json";

/// Mock Ticketmaster server
///
/// Every mounted mock requires the `apikey` query parameter to match
/// [`MockTicketmasterServer::api_key`], so a misconfigured client gets a 404
/// from wiremock instead of silently passing.
pub struct MockTicketmasterServer {
    server: MockServer,
    api_key: String,
}

impl MockTicketmasterServer {
    pub async fn start() -> Self {
        Self::start_with_api_key("test-tm-key").await
    }

    pub async fn start_with_api_key(api_key: &str) -> Self {
        Self {
            server: MockServer::start().await,
            api_key: api_key.to_string(),
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Mount a successful search returning the given events
    pub async fn mock_events_success(&self, events: Vec<TicketmasterEventFixture>) {
        let events: Vec<serde_json::Value> = events.into_iter().map(|e| e.to_json()).collect();
        let body = if events.is_empty() {
            json!({ "page": { "size": 100, "totalElements": 0, "totalPages": 0, "number": 0 } })
        } else {
            json!({
                "_embedded": { "events": events },
                "page": { "size": 100, "totalElements": events.len(), "totalPages": 1, "number": 0 }
            })
        };

        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .and(query_param("apikey", self.api_key.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount a search response with no `_embedded` block
    pub async fn mock_events_empty(&self) {
        self.mock_events_success(Vec::new()).await;
    }

    /// Mount a 429 quota response
    pub async fn mock_rate_limited(&self) {
        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "fault": { "faultstring": "Rate limit quota violation", "detail": { "errorcode": "policies.ratelimit.QuotaViolation" } }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a 500 error
    pub async fn mock_server_error(&self) {
        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&self.server)
            .await;
    }

    /// Mount a 401 for a rejected API key
    pub async fn mock_invalid_api_key(&self) {
        Mock::given(method("GET"))
            .and(path(EVENTS_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "fault": { "faultstring": "Invalid ApiKey", "detail": { "errorcode": "oauth.v2.InvalidApiKey" } }
            })))
            .mount(&self.server)
            .await;
    }

    /// Number of requests the server has received
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }
}

/// Builder for a Discovery API event document
#[derive(Debug, Clone)]
pub struct TicketmasterEventFixture {
    pub id: String,
    pub name: String,
    pub local_date: Option<String>,
    pub local_time: Option<String>,
    pub segment: Option<String>,
    pub genre: Option<String>,
    pub min_price: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<(String, String, String)>,
}

impl TicketmasterEventFixture {
    /// A music event at TD Garden in Boston
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            local_date: Some("2025-06-01".to_string()),
            local_time: Some("19:30:00".to_string()),
            segment: Some("Music".to_string()),
            genre: Some("Rock".to_string()),
            min_price: Some(49.5),
            latitude: Some(42.366303),
            longitude: Some(-71.062228),
            address: Some((
                "100 Legends Way".to_string(),
                "Boston".to_string(),
                "MA".to_string(),
            )),
        }
    }

    pub fn with_classification(mut self, segment: &str, genre: &str) -> Self {
        self.segment = Some(segment.to_string());
        self.genre = Some(genre.to_string());
        self
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Drop venue coordinates, keeping the street address
    pub fn without_coordinates(mut self) -> Self {
        self.latitude = None;
        self.longitude = None;
        self
    }

    pub fn without_price(mut self) -> Self {
        self.min_price = None;
        self
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut venue = json!({ "name": "Test Venue" });
        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            venue["location"] = json!({ "latitude": lat.to_string(), "longitude": lon.to_string() });
        }
        if let Some((line1, city, state)) = &self.address {
            venue["address"] = json!({ "line1": line1 });
            venue["city"] = json!({ "name": city });
            venue["state"] = json!({ "stateCode": state });
        }

        let mut event = json!({
            "id": self.id,
            "name": self.name,
            "type": "event",
            "url": format!("https://www.ticketmaster.com/event/{}", self.id),
            "dates": { "start": {
                "localDate": self.local_date,
                "localTime": self.local_time,
                "timeTBA": false
            } },
            "classifications": [{
                "segment": { "name": self.segment },
                "genre": { "name": self.genre }
            }],
            "_embedded": { "venues": [venue] }
        });
        if let Some(min) = self.min_price {
            event["priceRanges"] = json!([{ "type": "standard", "currency": "USD", "min": min, "max": min * 2.0 }]);
        }
        event
    }
}
