//! Integration tests for Yelp event search against a mock server

use ventaura_test_utils::{MockYelpServer, YelpEventFixture};
use ventaura_yelp_client::{YelpClient, YelpError};

fn client_for(server: &MockYelpServer) -> YelpClient {
    YelpClient::with_base_url(server.api_key(), server.url())
        .unwrap()
        .with_max_retries(1)
}

#[tokio::test]
async fn test_search_maps_events() {
    let server = MockYelpServer::start().await;
    server
        .mock_events_success(vec![
            YelpEventFixture::new("jazz", "Jazz on the Common"),
            YelpEventFixture::new("fair", "Harbor Fair")
                .with_category("festivals-fairs")
                .free(),
        ])
        .await;

    let events = client_for(&server)
        .search_events(42.36, -71.06, 40_000)
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].category, "music");
    assert_eq!(events[0].cost, Some(20.0));
    assert_eq!(
        events[0].address.as_deref(),
        Some("139 Tremont St, Boston, MA 02111")
    );
    assert_eq!(events[1].category, "festivals-fairs");
    assert_eq!(events[1].cost, Some(0.0));
    assert!(events.iter().all(|e| e.currency == "USD"));
}

#[tokio::test]
async fn test_unauthorized_surfaces_yelp_error_code() {
    let server = MockYelpServer::start().await;
    server.mock_unauthorized().await;

    let result = client_for(&server).search_events(42.36, -71.06, 10_000).await;

    match result {
        Err(YelpError::Api { status, code, .. }) => {
            assert_eq!(status, 401);
            assert_eq!(code, "TOKEN_INVALID");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    assert_eq!(server.request_count().await, 1);
}

#[tokio::test]
async fn test_unavailable_is_retried() {
    let server = MockYelpServer::start().await;
    server.mock_server_error().await;

    let result = client_for(&server).search_events(42.36, -71.06, 10_000).await;

    assert!(matches!(result, Err(YelpError::Api { status: 503, .. })));
    assert_eq!(server.request_count().await, 2);
}
