//! Error handling for the Ventaura worker
//!
//! A single thiserror enum covers everything a sweep can hit, with a
//! severity used to pick the log level.

use thiserror::Error;
use ventaura_shared_config::ConfigError;

/// Main worker error type
#[derive(Error, Debug)]
pub enum WorkerError {
    // ========== Job Processing Errors ==========
    /// A single user's logout could not be applied
    #[error("failed to expire session for user {user_id}: {reason}")]
    SessionExpiry { user_id: i32, reason: String },

    // ========== Database Errors ==========
    /// Database query failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Database connection pool exhausted or closed
    #[error("database connection unavailable")]
    DatabaseUnavailable,

    // ========== Configuration Errors ==========
    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl WorkerError {
    /// Check if the next tick could succeed where this one failed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Database(err) => !matches!(
                err,
                sqlx::Error::ColumnNotFound(_) | sqlx::Error::ColumnDecode { .. }
            ),
            Self::DatabaseUnavailable | Self::SessionExpiry { .. } => true,
            _ => false,
        }
    }

    /// Get a severity level for logging
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Configuration(_) | Self::DatabaseUnavailable => ErrorSeverity::Critical,
            Self::Database(_) => ErrorSeverity::Error,
            Self::SessionExpiry { .. } => ErrorSeverity::Warning,
        }
    }

    /// Log the error with appropriate severity
    pub fn log(&self) {
        match self.severity() {
            ErrorSeverity::Critical => {
                tracing::error!(
                    error = %self,
                    retryable = self.is_retryable(),
                    "Critical worker error"
                );
            }
            ErrorSeverity::Error => {
                tracing::error!(error = %self, retryable = self.is_retryable(), "Worker error");
            }
            ErrorSeverity::Warning => {
                tracing::warn!(error = %self, retryable = self.is_retryable(), "Worker warning");
            }
        }
    }

    /// Create a per-user session expiry error
    pub fn session_expiry(user_id: i32, reason: impl ToString) -> Self {
        Self::SessionExpiry {
            user_id,
            reason: reason.to_string(),
        }
    }
}

/// Error severity levels for logging and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical errors that should trigger alerts
    Critical,
    /// Standard errors
    Error,
    /// Warnings for expected failures
    Warning,
}

/// Result type alias for worker operations
pub type WorkerResult<T> = Result<T, WorkerError>;

// ========== Conversion Implementations ==========

impl From<ConfigError> for WorkerError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
