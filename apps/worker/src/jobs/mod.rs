//! Background job definitions and handlers
//!
//! - Session timeout sweep: log out idle users and clear their session data

pub mod session_timeout;
