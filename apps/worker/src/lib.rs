//! Ventaura session worker
//!
//! Periodically logs out users whose session has been idle longer than the
//! configured timeout and drops their stored Session CSV.

pub mod config;
pub mod error;
pub mod jobs;

pub use config::Config;
pub use error::{WorkerError, WorkerResult};
pub use jobs::session_timeout::{sweep_inactive_sessions, SweepReport};
