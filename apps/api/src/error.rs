//! Error handling for the Ventaura API
//!
//! A single error enum maps every failure onto an HTTP status code and a
//! stable machine-readable code via Axum's IntoResponse trait.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use ventaura_amadeus_client::AmadeusError;
use ventaura_geocoding_client::GeocodingError;
use ventaura_ticketmaster_client::TicketmasterError;
use ventaura_yelp_client::YelpError;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for client-side handling
    pub code: &'static str,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Main API error type
#[derive(Error, Debug)]
pub enum ApiError {
    // ========== Authentication ==========
    /// Credentials did not match, or the caller is not a known user
    #[error("{0}")]
    Unauthorized(String),

    // ========== Resource Errors ==========
    /// Requested resource not found
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Resource already exists (conflict)
    #[error("{resource_type} already exists: {id}")]
    Conflict {
        resource_type: &'static str,
        id: String,
    },

    // ========== Validation Errors ==========
    /// Request validation failed
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Missing required field or query parameter
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid query parameter
    #[error("invalid query parameter '{name}': {reason}")]
    InvalidQueryParam { name: &'static str, reason: String },

    // ========== Database Errors ==========
    /// Database query failed
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Database connection pool exhausted
    #[error("database connection unavailable")]
    DatabaseUnavailable,

    // ========== External Service Errors ==========
    /// An event provider or the geocoder failed outright
    #[error("{source_name} error: {message}")]
    Upstream {
        source_name: &'static str,
        message: String,
    },

    /// The ranking service could not be reached or answered garbage
    #[error("ranking service error: {0}")]
    Ranking(String),

    /// HTTP client error (for external API calls)
    #[error("external service error: {0}")]
    HttpClient(#[from] reqwest::Error),

    // ========== Internal Errors ==========
    /// Session CSV could not be written
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Internal server error (catch-all for unexpected errors)
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 401 Unauthorized
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,

            // 404 Not Found
            Self::NotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::Conflict { .. } => StatusCode::CONFLICT,

            // 400 Bad Request
            Self::ValidationError(_) | Self::MissingField(_) | Self::InvalidQueryParam { .. } => {
                StatusCode::BAD_REQUEST
            }

            // 503 Service Unavailable
            Self::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 502 Bad Gateway
            Self::Upstream { .. } | Self::Ranking(_) | Self::HttpClient(_) => {
                StatusCode::BAD_GATEWAY
            }

            // 500 Internal Server Error
            Self::Database(_) | Self::Csv(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the error code string for client-side handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidQueryParam { .. } => "INVALID_QUERY_PARAM",
            Self::Database(_) => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Ranking(_) => "RANKING_SERVICE_ERROR",
            Self::HttpClient(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Csv(_) => "CSV_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Create a conflict error for a specific resource
    pub fn conflict(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::Conflict {
            resource_type,
            id: id.into(),
        }
    }

    /// Map a unique-constraint violation onto a conflict, anything else to a database error
    pub fn from_unique_violation(
        err: sqlx::Error,
        resource_type: &'static str,
        id: impl Into<String>,
    ) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::conflict(resource_type, id)
            }
            _ => Self::from(err),
        }
    }

    /// Log the error with appropriate severity based on status code
    pub fn log(&self) {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Authorization error"
            );
        } else {
            tracing::debug!(
                error = %self,
                code = self.error_code(),
                status = status.as_u16(),
                "Client error"
            );
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status_code();
        let error_response = ErrorResponse {
            code: self.error_code(),
            message: self.to_string(),
            details: None,
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

// ========== Conversion Implementations ==========

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<ApiError>() {
            Ok(api_err) => api_err,
            Err(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => Self::DatabaseUnavailable,
            err => Self::Database(err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::ValidationError(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::ValidationError(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidQueryParam {
            name: "query",
            reason: rejection.body_text(),
        }
    }
}

impl From<TicketmasterError> for ApiError {
    fn from(err: TicketmasterError) -> Self {
        Self::Upstream {
            source_name: "Ticketmaster",
            message: err.to_string(),
        }
    }
}

impl From<YelpError> for ApiError {
    fn from(err: YelpError) -> Self {
        Self::Upstream {
            source_name: "Yelp",
            message: err.to_string(),
        }
    }
}

impl From<AmadeusError> for ApiError {
    fn from(err: AmadeusError) -> Self {
        Self::Upstream {
            source_name: "Amadeus",
            message: err.to_string(),
        }
    }
}

impl From<GeocodingError> for ApiError {
    fn from(err: GeocodingError) -> Self {
        Self::Upstream {
            source_name: "Geocoding",
            message: err.to_string(),
        }
    }
}
