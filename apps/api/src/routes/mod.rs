//! HTTP route handlers for the Ventaura API
//!
//! Each controller owns a router and a small state struct; `build_router`
//! nests them under their public prefixes:
//! - `/api/users` - accounts, login and profile
//! - `/api/combined-events` - aggregation, Session CSV and logout
//! - `/api/global-events` - city search with filters
//! - `/api/events` - ranking trigger
//! - `/api/host-events` - user-created events
//! - `/health` - health checks

pub mod combined_events;
pub mod events;
pub mod global_events;
pub mod health;
pub mod host_events;
pub mod users;

pub use combined_events::{combined_events_router, CombinedEventsState};
pub use events::{events_router, EventsState};
pub use global_events::{global_events_router, GlobalEventsState};
pub use health::{health_router, HealthState};
pub use host_events::{host_events_router, HostEventsState};
pub use users::{users_router, UsersState};

use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::PgPool;
use ventaura_shared_config::ProvidersConfig;

use crate::error::{ApiError, ApiResult};
use crate::repositories::{HostEventRepository, SessionDataRepository, UserRepository};
use crate::services::{
    AuthService, CombinedEventsService, HealthService, RankingService,
};

/// Everything the controllers share, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub providers: Arc<ProvidersConfig>,
    pub auth_service: Arc<AuthService>,
    pub combined_events: Arc<CombinedEventsService>,
    pub ranking_service: Arc<RankingService>,
    pub health_service: Arc<HealthService>,
}

impl AppState {
    /// Wire services against the configured upstreams
    pub fn new(
        pool: PgPool,
        providers: ProvidersConfig,
        ranking_service_url: &str,
    ) -> ApiResult<Self> {
        let combined_events = CombinedEventsService::from_config(
            &providers,
            HostEventRepository::new(pool.clone()),
        )?;

        Self::with_services(pool, providers, combined_events, ranking_service_url)
    }

    /// Wire services around a prebuilt aggregator (tests point it at mocks)
    pub fn with_services(
        pool: PgPool,
        providers: ProvidersConfig,
        combined_events: CombinedEventsService,
        ranking_service_url: &str,
    ) -> ApiResult<Self> {
        Ok(Self {
            auth_service: Arc::new(AuthService::new(UserRepository::new(pool.clone()))?),
            combined_events: Arc::new(combined_events),
            ranking_service: Arc::new(RankingService::new(ranking_service_url)?),
            health_service: Arc::new(HealthService::new(ranking_service_url)?),
            providers: Arc::new(providers),
            pool,
        })
    }

    fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    fn sessions(&self) -> SessionDataRepository {
        SessionDataRepository::new(self.pool.clone())
    }

    fn host_events(&self) -> HostEventRepository {
        HostEventRepository::new(self.pool.clone())
    }
}

/// Build the complete application router (without CORS or tracing layers)
pub fn build_router(state: AppState) -> Router {
    let users = UsersState {
        auth_service: state.auth_service.clone(),
        users: state.users(),
    };
    let combined = CombinedEventsState {
        combined_events: state.combined_events.clone(),
        users: state.users(),
        sessions: state.sessions(),
    };
    let global = GlobalEventsState {
        combined_events: state.combined_events.clone(),
        users: state.users(),
    };
    let events = EventsState {
        ranking_service: state.ranking_service.clone(),
        users: state.users(),
    };
    let host_events = HostEventsState {
        host_events: state.host_events(),
        users: state.users(),
    };
    let health = HealthState {
        pool: state.pool.clone(),
        providers: state.providers.clone(),
        health_service: state.health_service.clone(),
    };

    Router::new()
        .route("/", get(welcome))
        .nest("/api/users", users_router(users))
        .nest("/api/combined-events", combined_events_router(combined))
        .nest("/api/global-events", global_events_router(global))
        .nest("/api/events", events_router(events))
        .nest("/api/host-events", host_events_router(host_events))
        .nest("/health", health_router(health))
}

async fn welcome() -> &'static str {
    "Welcome to the Ventaura API!"
}

/// Read the required `userId` query parameter
pub(crate) fn require_user_id(raw: Option<&str>) -> ApiResult<i32> {
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingField("userId"))?;

    raw.parse().map_err(|_| ApiError::InvalidQueryParam {
        name: "userId",
        reason: format!("'{}' is not a valid user id", raw),
    })
}

/// Read an optional numeric query parameter that must not be negative
pub(crate) fn optional_non_negative(
    name: &'static str,
    raw: Option<&str>,
) -> ApiResult<Option<f64>> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let value: f64 = raw.parse().map_err(|_| ApiError::InvalidQueryParam {
        name,
        reason: format!("'{}' is not a number", raw),
    })?;

    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::InvalidQueryParam {
            name,
            reason: "must be a non-negative number".to_string(),
        });
    }

    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_require_user_id() {
        assert_eq!(require_user_id(Some(" 42 ")).unwrap(), 42);
        assert_matches!(require_user_id(None), Err(ApiError::MissingField("userId")));
        assert_matches!(require_user_id(Some("")), Err(ApiError::MissingField("userId")));
        assert_matches!(
            require_user_id(Some("abc")),
            Err(ApiError::InvalidQueryParam { name: "userId", .. })
        );
    }

    #[test]
    fn test_optional_non_negative() {
        assert_eq!(optional_non_negative("maxPrice", None).unwrap(), None);
        assert_eq!(optional_non_negative("maxPrice", Some("  ")).unwrap(), None);
        assert_eq!(
            optional_non_negative("maxPrice", Some("12.5")).unwrap(),
            Some(12.5)
        );
        assert_matches!(
            optional_non_negative("maxPrice", Some("-1")),
            Err(ApiError::InvalidQueryParam { name: "maxPrice", .. })
        );
        assert_matches!(
            optional_non_negative("maxDistance", Some("far")),
            Err(ApiError::InvalidQueryParam { name: "maxDistance", .. })
        );
    }
}
