//! Session lifetime settings

use std::time::Duration;

use crate::{parse_env, ConfigError, ConfigResult};

/// How often the sweeper runs and how long a session may sit idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Seconds between sweeps (default: 30 minutes)
    pub sweep_interval_secs: u64,

    /// Seconds of inactivity after which a user is logged out (default: 60 minutes)
    pub timeout_secs: u64,
}

impl SessionConfig {
    pub fn from_env() -> ConfigResult<Self> {
        let config = Self {
            sweep_interval_secs: parse_env("SESSION_SWEEP_INTERVAL_SECS", 1800)?,
            timeout_secs: parse_env("SESSION_TIMEOUT_SECS", 3600)?,
        };

        if config.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_SWEEP_INTERVAL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        if config.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 1800,
            timeout_secs: 3600,
        }
    }
}
