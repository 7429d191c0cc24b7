//! Health check service for verifying external dependencies
//!
//! The database is the only dependency the API cannot serve without. The
//! ranking service is probed too, but its state never flips the overall
//! status; event providers are reported as configured or skipped.

use serde::Serialize;
use sqlx::PgPool;
use std::time::{Duration, Instant};
use ventaura_shared_config::ProvidersConfig;

use crate::error::{ApiError, ApiResult};

/// Status of an individual service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Service is healthy and responding
    Healthy,
    /// Service is unhealthy or unreachable
    Unhealthy,
    /// Service check was skipped (e.g., optional service not configured)
    Skipped,
}

/// Result of a single service health check
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    /// Name of the service
    pub name: &'static str,
    /// Current status
    pub status: ServiceStatus,
    /// Whether this service decides the overall status
    pub required: bool,
    /// Response time in milliseconds (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional details about the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServiceHealth {
    fn with_status(name: &'static str, status: ServiceStatus) -> Self {
        Self {
            name,
            status,
            required: true,
            response_time_ms: None,
            error: None,
            details: None,
        }
    }

    /// Create a healthy service result
    pub fn healthy(name: &'static str, response_time: Duration) -> Self {
        Self {
            response_time_ms: Some(response_time.as_millis() as u64),
            ..Self::with_status(name, ServiceStatus::Healthy)
        }
    }

    /// Create a healthy service result with details
    pub fn healthy_with_details(
        name: &'static str,
        response_time: Duration,
        details: serde_json::Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::healthy(name, response_time)
        }
    }

    /// Create an unhealthy service result
    pub fn unhealthy(name: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::with_status(name, ServiceStatus::Unhealthy)
        }
    }

    /// Create an unhealthy service result with response time
    pub fn unhealthy_with_time(
        name: &'static str,
        error: impl Into<String>,
        response_time: Duration,
    ) -> Self {
        Self {
            response_time_ms: Some(response_time.as_millis() as u64),
            ..Self::unhealthy(name, error)
        }
    }

    /// Create a skipped service result (for optional services not configured)
    pub fn skipped(name: &'static str, reason: impl Into<String>) -> Self {
        Self {
            details: Some(serde_json::json!({ "reason": reason.into() })),
            ..Self::with_status(name, ServiceStatus::Skipped)
        }
    }

    /// Report this service without letting it decide the overall status
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Aggregated health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResponse {
    /// Overall status (healthy only if all required services are healthy)
    pub status: ServiceStatus,
    /// Individual service health results
    pub services: Vec<ServiceHealth>,
    /// Total time to complete all health checks
    pub total_time_ms: u64,
    /// API version
    pub version: &'static str,
}

impl HealthCheckResponse {
    /// Create a new health check response from individual service results
    pub fn new(services: Vec<ServiceHealth>, total_time: Duration) -> Self {
        let status = if services
            .iter()
            .filter(|s| s.required)
            .all(|s| s.status != ServiceStatus::Unhealthy)
        {
            ServiceStatus::Healthy
        } else {
            ServiceStatus::Unhealthy
        };

        Self {
            status,
            services,
            total_time_ms: total_time.as_millis() as u64,
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Check if overall health is good
    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

/// Health check service for verifying external dependencies
#[derive(Debug, Clone)]
pub struct HealthService {
    http_client: reqwest::Client,
    ranking_service_url: String,
}

impl HealthService {
    /// Create a new health service
    pub fn new(ranking_service_url: impl Into<String>) -> ApiResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(ApiError::HttpClient)?;

        Ok(Self {
            http_client,
            ranking_service_url: ranking_service_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Check PostgreSQL connectivity through the shared pool
    pub async fn check_database(&self, pool: &PgPool) -> ServiceHealth {
        let start = Instant::now();

        match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await {
            Ok(_) => {
                let elapsed = start.elapsed();
                let version = sqlx::query_scalar::<_, String>("SELECT version()")
                    .fetch_optional(pool)
                    .await
                    .ok()
                    .flatten();

                match version {
                    Some(v) => ServiceHealth::healthy_with_details(
                        "database",
                        elapsed,
                        serde_json::json!({ "version": v }),
                    ),
                    None => ServiceHealth::healthy("database", elapsed),
                }
            }
            Err(e) => ServiceHealth::unhealthy_with_time(
                "database",
                format!("Query failed: {}", e),
                start.elapsed(),
            ),
        }
    }

    /// Check that the ranking service answers HTTP at all
    ///
    /// Any response counts as reachable; the service has no health route.
    pub async fn check_ranking_service(&self) -> ServiceHealth {
        let start = Instant::now();

        match self.http_client.get(&self.ranking_service_url).send().await {
            Ok(response) => ServiceHealth::healthy_with_details(
                "ranking",
                start.elapsed(),
                serde_json::json!({ "status": response.status().as_u16() }),
            ),
            Err(e) => ServiceHealth::unhealthy_with_time(
                "ranking",
                format!("Request failed: {}", e),
                start.elapsed(),
            ),
        }
        .optional()
    }

    /// Report which event providers have credentials, without calling them
    pub fn provider_status(providers: &ProvidersConfig) -> Vec<ServiceHealth> {
        let entries: [(&'static str, bool); 4] = [
            ("ticketmaster", providers.ticketmaster_api_key.is_some()),
            ("yelp", providers.yelp_api_key.is_some()),
            ("amadeus", providers.has_amadeus()),
            ("geocoding", providers.google_geocoding_api_key.is_some()),
        ];

        entries
            .into_iter()
            .map(|(name, configured)| {
                if configured {
                    ServiceHealth::healthy_with_details(
                        name,
                        Duration::ZERO,
                        serde_json::json!({ "configured": true }),
                    )
                } else {
                    ServiceHealth::skipped(name, "credentials not configured")
                }
                .optional()
            })
            .collect()
    }

    /// Run all health checks in parallel
    pub async fn check_all(
        &self,
        pool: &PgPool,
        providers: &ProvidersConfig,
    ) -> HealthCheckResponse {
        let start = Instant::now();

        let (db_health, ranking_health) =
            tokio::join!(self.check_database(pool), self.check_ranking_service());

        let mut services = vec![db_health, ranking_health];
        services.extend(Self::provider_status(providers));

        HealthCheckResponse::new(services, start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_health_healthy() {
        let health = ServiceHealth::healthy("test", Duration::from_millis(50));
        assert_eq!(health.status, ServiceStatus::Healthy);
        assert_eq!(health.response_time_ms, Some(50));
        assert!(health.error.is_none());
        assert!(health.required);
    }

    #[test]
    fn test_service_health_unhealthy() {
        let health = ServiceHealth::unhealthy("test", "Connection refused");
        assert_eq!(health.status, ServiceStatus::Unhealthy);
        assert!(health.response_time_ms.is_none());
        assert_eq!(health.error, Some("Connection refused".to_string()));
    }

    #[test]
    fn test_health_check_response_database_down() {
        let services = vec![
            ServiceHealth::unhealthy("database", "Connection refused"),
            ServiceHealth::healthy("ranking", Duration::from_millis(5)).optional(),
        ];
        let response = HealthCheckResponse::new(services, Duration::from_millis(15));
        assert!(!response.is_healthy());
    }

    #[test]
    fn test_optional_service_does_not_decide_status() {
        let services = vec![
            ServiceHealth::healthy("database", Duration::from_millis(10)),
            ServiceHealth::unhealthy("ranking", "Connection refused").optional(),
            ServiceHealth::skipped("amadeus", "credentials not configured").optional(),
        ];
        let response = HealthCheckResponse::new(services, Duration::from_millis(15));
        assert!(response.is_healthy());
        assert_eq!(response.status, ServiceStatus::Healthy);
    }

    #[test]
    fn test_provider_status() {
        let providers = ProvidersConfig {
            ticketmaster_api_key: Some("tm".to_string()),
            yelp_api_key: Some("yelp".to_string()),
            ..Default::default()
        };

        let statuses = HealthService::provider_status(&providers);
        let by_name = |name: &str| {
            statuses
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.status)
                .unwrap()
        };

        assert_eq!(by_name("ticketmaster"), ServiceStatus::Healthy);
        assert_eq!(by_name("yelp"), ServiceStatus::Healthy);
        assert_eq!(by_name("amadeus"), ServiceStatus::Skipped);
        assert_eq!(by_name("geocoding"), ServiceStatus::Skipped);
        assert!(statuses.iter().all(|s| !s.required));
    }

    #[tokio::test]
    async fn test_unreachable_ranking_service_is_optional() {
        let service = HealthService::new("http://127.0.0.1:9").unwrap();
        let health = service.check_ranking_service().await;

        assert_eq!(health.status, ServiceStatus::Unhealthy);
        assert!(!health.required);
    }
}
