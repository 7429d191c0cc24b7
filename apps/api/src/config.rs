//! API server configuration

use std::env;

use anyhow::{bail, Context, Result};
use ventaura_shared_config::{CommonConfig, DatabaseConfig, Environment, ProvidersConfig};

/// Default port the frontend expects the API on
const DEFAULT_PORT: u16 = 5152;

/// Default location of the ranking service
const DEFAULT_RANKING_SERVICE_URL: &str = "http://localhost:8000";

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with the worker
    pub common: CommonConfig,

    /// Event provider and geocoder settings
    pub providers: ProvidersConfig,

    /// Server port (default: 5152)
    pub port: u16,

    /// Base URL of the ranking service (default: http://localhost:8000)
    pub ranking_service_url: String,

    /// CORS allowed origins (optional)
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// In production mode, this function requires:
    /// - `DATABASE_URL`: Must be explicitly set (no insecure defaults)
    /// - `TICKETMASTER_API_KEY`, `YELP_API_KEY`, `GOOGLE_GEOCODING_API_KEY`
    /// - `CORS_ALLOWED_ORIGINS`, if set, must not contain `*`
    pub fn from_env() -> Result<Self> {
        let common = CommonConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        let providers = ProvidersConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load provider config: {}", e))?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS").ok().map(|s| {
            s.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        });

        if common.environment.is_production() {
            Self::validate_database_url()?;
            Self::validate_providers(&providers)?;
            Self::validate_cors(cors_allowed_origins.as_deref())?;
        }

        let ranking_service_url = env::var("RANKING_SERVICE_URL")
            .ok()
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_RANKING_SERVICE_URL.to_string());

        Ok(Self {
            common,
            providers,
            port: match env::var("PORT") {
                Ok(port) => port.parse().context("Invalid PORT value")?,
                Err(_) => DEFAULT_PORT,
            },
            ranking_service_url,
            cors_allowed_origins,
        })
    }

    /// Validate that DATABASE_URL is explicitly set in production
    fn validate_database_url() -> Result<()> {
        match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Ok(()),
            _ => {
                bail!(
                    "DATABASE_URL environment variable is required in production. \
                     Please set your PostgreSQL connection string."
                );
            }
        }
    }

    /// Every event source except Amadeus is mandatory in production
    fn validate_providers(providers: &ProvidersConfig) -> Result<()> {
        let missing = providers.missing_required();
        if !missing.is_empty() {
            bail!(
                "Missing provider credentials required in production: {}",
                missing.join(", ")
            );
        }
        Ok(())
    }

    fn validate_cors(origins: Option<&[String]>) -> Result<()> {
        if origins.is_some_and(|o| o.iter().any(|origin| origin == "*")) {
            bail!("CORS_ALLOWED_ORIGINS must list explicit origins in production, not '*'");
        }
        Ok(())
    }

    /// Get database configuration
    pub fn database(&self) -> &DatabaseConfig {
        &self.common.database
    }

    /// Get environment mode
    pub fn environment(&self) -> Environment {
        self.common.environment
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.common.environment.is_production()
    }
}
