//! Amadeus activities API client for Ventaura
//!
//! Tours and activities are an optional event source. The client handles the
//! OAuth2 client-credentials exchange and caches the access token until
//! shortly before it expires.

mod client;
mod error;
mod models;

pub use client::AmadeusClient;
pub use error::{AmadeusError, AmadeusResult};
pub use models::AmadeusActivity;
