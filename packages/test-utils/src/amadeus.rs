//! Mock Amadeus OAuth and activities endpoints

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const ACTIVITIES_PATH: &str = "/v1/shopping/activities";

/// Mock Amadeus server
///
/// Call [`MockAmadeusServer::mock_token_success`] before any activities mock,
/// otherwise the client cannot obtain a token.
pub struct MockAmadeusServer {
    server: MockServer,
    access_token: String,
}

impl MockAmadeusServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            access_token: "mock-amadeus-token".to_string(),
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub fn client_id(&self) -> &str {
        "test-client-id"
    }

    pub fn client_secret(&self) -> &str {
        "test-client-secret"
    }

    pub async fn mock_token_success(&self, expires_in: u64) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=test-client-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "amadeusOAuth2Token",
                "username": "dev@ventaura.test",
                "application_name": "ventaura",
                "client_id": "test-client-id",
                "token_type": "Bearer",
                "access_token": self.access_token,
                "expires_in": expires_in,
                "state": "approved",
                "scope": ""
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_token_rejected(&self) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_client",
                "error_description": "Client credentials are invalid",
                "code": 38187,
                "title": "Invalid parameters"
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_activities_success(&self, activities: Vec<AmadeusActivityFixture>) {
        let data: Vec<serde_json::Value> =
            activities.iter().map(AmadeusActivityFixture::to_json).collect();
        Mock::given(method("GET"))
            .and(path(ACTIVITIES_PATH))
            .and(header(
                "Authorization",
                format!("Bearer {}", self.access_token).as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": data,
                "meta": { "count": data.len().to_string() }
            })))
            .mount(&self.server)
            .await;
    }

    /// Number of token exchanges the client has performed
    pub async fn token_request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| {
                requests
                    .iter()
                    .filter(|r| r.url.path() == TOKEN_PATH)
                    .count()
            })
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct AmadeusActivityFixture {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub amount: Option<String>,
}

impl AmadeusActivityFixture {
    /// A harbour tour in Boston priced in dollars
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            latitude: 42.3601,
            longitude: -71.0512,
            amount: Some("35.00".to_string()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut activity = json!({
            "type": "activity",
            "id": self.id,
            "name": self.name,
            "shortDescription": format!("<p>{}</p>", self.name),
            "geoCode": { "latitude": self.latitude.to_string(), "longitude": self.longitude.to_string() },
            "bookingLink": format!("https://b2c.mla.cloud/c/{}", self.id)
        });
        if let Some(amount) = &self.amount {
            activity["price"] = json!({ "amount": amount, "currencyCode": "USD" });
        }
        activity
    }
}
