//! Ticketmaster Discovery API client for Ventaura
//!
//! Looks up events around a coordinate and flattens Ticketmaster's deeply
//! nested event documents into [`TicketmasterEvent`] values.
//!
//! # Example
//!
//! ```rust,no_run
//! use ventaura_ticketmaster_client::TicketmasterClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TicketmasterClient::new("your_api_key")?;
//!
//! let events = client.search_events(42.3601, -71.0589, 20).await?;
//! for event in events {
//!     println!("{} ({:?})", event.name, event.genre);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod models;

pub use client::TicketmasterClient;
pub use error::{TicketmasterError, TicketmasterResult};
pub use models::TicketmasterEvent;
