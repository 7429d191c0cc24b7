//! Database models and API payload types for Ventaura
//!
//! This module contains SQLx models for:
//! - User accounts and their recommendation preferences
//! - Host-created events
//! - Per-user session CSV snapshots
//! - The normalized event shape produced by the aggregation pipeline

pub mod combined_event;
pub mod host_event;
pub mod session_data;
pub mod user;

pub use combined_event::{AggregationResult, CombinedEvent, EventSource};
pub use host_event::{HostEvent, NewHostEvent};
pub use session_data::UserSessionData;
pub use user::{NewUser, User, UserProfile, UserProfileUpdate};
