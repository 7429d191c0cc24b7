//! Configuration error types

use thiserror::Error;

/// Errors raised while reading settings from the environment
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A variable that has no sensible default is not set
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// A variable is set but cannot be parsed
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),

    /// A base URL override is not an absolute http(s) URL
    #[error("invalid URL format for {0}: {1}")]
    InvalidUrl(String, String),

    /// Two variables that only make sense together were given separately
    #[error("{0} and {1} must be set together")]
    IncompletePair(&'static str, &'static str),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
