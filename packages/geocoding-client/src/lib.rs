//! Google Geocoding API client for Ventaura
//!
//! Provides forward lookups (address to coordinates) for city searches and
//! events that only carry a street address, and reverse lookups (coordinates
//! to a formatted address) for events that only carry coordinates.
//!
//! # Example
//!
//! ```rust,no_run
//! use ventaura_geocoding_client::GeocodingClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeocodingClient::new("your_api_key")?;
//!
//! if let Some(coords) = client.geocode("Boston, MA").await? {
//!     println!("{}, {}", coords.latitude, coords.longitude);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod models;

pub use client::GeocodingClient;
pub use error::{GeocodingError, GeocodingResult};
pub use models::Coordinates;
