//! Worker configuration loaded from environment variables
//!
//! The worker only needs the database and the session lifetime settings,
//! both of which come from the shared configuration crate.

use std::time::Duration;

use anyhow::{Context, Result};
use ventaura_shared_config::{CommonConfig, DatabaseConfig, Environment, SessionConfig};

/// Worker configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with the API
    pub common: CommonConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let common = CommonConfig::from_env().context("Failed to load worker config")?;
        Ok(Self { common })
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get session lifetime settings
    pub fn session(&self) -> &SessionConfig {
        &self.common.session
    }

    /// Time between sweeps
    pub fn sweep_interval(&self) -> Duration {
        self.common.session.sweep_interval()
    }

    /// Idle time after which a user is logged out
    pub fn session_timeout(&self) -> Duration {
        self.common.session.timeout()
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }
}
