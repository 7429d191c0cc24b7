//! Shared test utilities for the Ventaura workspace
//!
//! Mock implementations of every upstream HTTP service, so the client crates
//! and the API test suite can run without network access.
//!
//! # Mock Services
//!
//! - [`MockTicketmasterServer`] - Discovery API event search
//! - [`MockYelpServer`] - Fusion `/v3/events`
//! - [`MockAmadeusServer`] - OAuth token exchange plus activities search
//! - [`MockGeocodingServer`] - Google forward and reverse geocoding
//! - [`MockRankingServer`] - the external ranking service
//!
//! # Example
//!
//! ```rust,ignore
//! use ventaura_test_utils::{MockTicketmasterServer, TicketmasterEventFixture};
//!
//! #[tokio::test]
//! async fn test_with_mocks() {
//!     let server = MockTicketmasterServer::start().await;
//!     server
//!         .mock_events_success(vec![TicketmasterEventFixture::new("1", "Concert")])
//!         .await;
//!
//!     // Point your client at server.url()
//! }
//! ```

mod amadeus;
mod geocoding;
mod ranking;
mod ticketmaster;
mod yelp;

pub use amadeus::{AmadeusActivityFixture, MockAmadeusServer};
pub use geocoding::MockGeocodingServer;
pub use ranking::MockRankingServer;
pub use ticketmaster::{MockTicketmasterServer, TicketmasterEventFixture};
pub use yelp::{MockYelpServer, YelpEventFixture};
