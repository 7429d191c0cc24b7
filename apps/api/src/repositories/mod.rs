//! Database repository layer for Ventaura
//!
//! Every SQL statement the API issues lives in one of these repositories so
//! handlers and services never build queries themselves.

pub mod host_event;
pub mod session_data;
pub mod user;

pub use host_event::HostEventRepository;
pub use session_data::SessionDataRepository;
pub use user::UserRepository;
