//! Mock Google Geocoding API

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEOCODE_PATH: &str = "/maps/api/geocode/json";

pub struct MockGeocodingServer {
    server: MockServer,
    api_key: String,
}

impl MockGeocodingServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            api_key: "test-maps-key".to_string(),
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Resolve `address` to the given coordinates
    pub async fn mock_address(&self, address: &str, latitude: f64, longitude: f64) {
        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .and(query_param("address", address))
            .and(query_param("key", self.api_key.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "results": [{
                    "formatted_address": address,
                    "geometry": { "location": { "lat": latitude, "lng": longitude }, "location_type": "APPROXIMATE" }
                }]
            })))
            .mount(&self.server)
            .await;
    }

    /// Resolve `latitude,longitude` to a formatted address
    pub async fn mock_reverse(&self, latitude: f64, longitude: f64, formatted_address: &str) {
        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .and(query_param("latlng", format!("{},{}", latitude, longitude).as_str()))
            .and(query_param("key", self.api_key.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "results": [{
                    "formatted_address": formatted_address,
                    "geometry": { "location": { "lat": latitude, "lng": longitude } }
                }]
            })))
            .mount(&self.server)
            .await;
    }

    /// Any lookup not otherwise mocked gets ZERO_RESULTS
    ///
    /// Mount this last; wiremock matches mocks in mount order.
    pub async fn mock_zero_results_fallback(&self) {
        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mock_request_denied(&self) {
        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "REQUEST_DENIED",
                "error_message": "The provided API key is invalid.",
                "results": []
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_over_query_limit(&self) {
        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OVER_QUERY_LIMIT",
                "error_message": "You have exceeded your daily request quota for this API.",
                "results": []
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
