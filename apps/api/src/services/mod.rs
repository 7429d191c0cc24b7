//! Business logic services for Ventaura
//!
//! This module contains:
//! - Account registration and login
//! - Event aggregation across upstream providers
//! - Category mapping and distance calculation
//! - Session CSV rendering
//! - The ranking service client
//! - Health checks

pub mod auth;
pub mod categories;
pub mod combined_events;
pub mod distance;
pub mod health;
pub mod ranking;
pub mod session_csv;

pub use auth::{AuthService, Registration};
pub use combined_events::CombinedEventsService;
pub use health::HealthService;
pub use ranking::{RankingResponse, RankingService};
