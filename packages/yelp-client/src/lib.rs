//! Yelp Fusion events client for Ventaura
//!
//! Wraps the `/v3/events` search endpoint. Results come back sorted by start
//! time, earliest first.
//!
//! # Environment Variables
//!
//! - `YELP_API_KEY`: Fusion API key, sent as a bearer token

mod client;
mod error;
mod models;

pub use client::YelpClient;
pub use error::{YelpError, YelpResult};
pub use models::YelpEvent;
