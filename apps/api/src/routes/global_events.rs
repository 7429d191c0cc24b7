//! City search across every event source
//!
//! - `GET /api/global-events/search?userId=&city=&eventType=&maxDistance=&maxPrice=`

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{optional_non_negative, require_user_id};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiQuery;
use crate::models::CombinedEvent;
use crate::repositories::UserRepository;
use crate::services::CombinedEventsService;

#[derive(Clone)]
pub struct GlobalEventsState {
    pub combined_events: Arc<CombinedEventsService>,
    pub users: UserRepository,
}

pub fn global_events_router(state: GlobalEventsState) -> Router {
    Router::new()
        .route("/search", get(search))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub user_id: Option<String>,
    pub city: Option<String>,
    pub event_type: Option<String>,
    pub max_distance: Option<String>,
    pub max_price: Option<String>,
}

/// Filters applied after aggregation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub event_type: Option<String>,
    pub max_distance: Option<f64>,
    pub max_price: Option<f64>,
}

impl SearchFilters {
    fn from_query(query: &SearchQuery) -> ApiResult<Self> {
        Ok(Self {
            event_type: query
                .event_type
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            max_distance: optional_non_negative("maxDistance", query.max_distance.as_deref())?,
            max_price: optional_non_negative("maxPrice", query.max_price.as_deref())?,
        })
    }

    /// With a price cap set, events with an unknown price are dropped
    pub fn matches(&self, event: &CombinedEvent) -> bool {
        let type_ok = self
            .event_type
            .as_deref()
            .map_or(true, |t| event.event_type.eq_ignore_ascii_case(t));
        let distance_ok = self
            .max_distance
            .map_or(true, |max| event.distance_km <= max);
        let price_ok = match (self.max_price, event.amount) {
            (Some(max), Some(amount)) => amount <= max,
            (Some(_), None) => false,
            (None, _) => true,
        };

        type_ok && distance_ok && price_ok
    }
}

/// A search hit numbered by its position in the filtered list
#[derive(Debug, Serialize)]
pub struct NumberedEvent {
    pub id: usize,
    #[serde(flatten)]
    pub event: CombinedEvent,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub message: &'static str,
    pub events: Vec<NumberedEvent>,
}

/// Search events around a city
///
/// Distances are measured from the user's stored location when there is one,
/// otherwise from the city centre.
///
/// # Response
/// - 200 OK: `{message, events}`
/// - 400 Bad Request: blank city or negative filters
/// - 401 Unauthorized: unknown user
/// - 404 Not Found: the city could not be geocoded
async fn search(
    State(state): State<GlobalEventsState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let user_id = require_user_id(query.user_id.as_deref())?;

    let city = query
        .city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::ValidationError("city is required".to_string()))?;

    let filters = SearchFilters::from_query(&query)?;

    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User is not registered.".to_string()))?;

    let center = state
        .combined_events
        .geocode(city)
        .await?
        .ok_or_else(|| ApiError::not_found("city", city))?;

    let origin = user.coordinates().unwrap_or(center);

    let result = state.combined_events.fetch_around(center, origin).await?;

    let events: Vec<NumberedEvent> = result
        .events
        .into_iter()
        .filter(|e| filters.matches(e))
        .enumerate()
        .map(|(index, event)| NumberedEvent {
            id: index + 1,
            event,
        })
        .collect();

    tracing::info!(user_id, city, event_count = events.len(), "Global search complete");

    Ok(Json(SearchResponse {
        message: "Events fetched successfully.",
        events,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventSource;

    fn event(event_type: &str, distance_km: f64, amount: Option<f64>) -> CombinedEvent {
        CombinedEvent {
            title: "Test".to_string(),
            description: None,
            location: "0, 0".to_string(),
            latitude: 0.0,
            longitude: 0.0,
            address: None,
            start: None,
            source: EventSource::Yelp,
            event_type: event_type.to_string(),
            currency_code: None,
            amount,
            url: None,
            distance_km,
        }
    }

    #[test]
    fn test_empty_filters_match_everything() {
        assert!(SearchFilters::default().matches(&event("Music", 500.0, Some(1000.0))));
    }

    #[test]
    fn test_type_filter_ignores_case() {
        let filters = SearchFilters {
            event_type: Some("food and drink".to_string()),
            ..Default::default()
        };
        assert!(filters.matches(&event("Food and Drink", 1.0, None)));
        assert!(!filters.matches(&event("Music", 1.0, None)));
    }

    #[test]
    fn test_distance_filter_is_inclusive() {
        let filters = SearchFilters {
            max_distance: Some(10.0),
            ..Default::default()
        };
        assert!(filters.matches(&event("Music", 10.0, None)));
        assert!(!filters.matches(&event("Music", 10.01, None)));
    }

    #[test]
    fn test_price_filter_drops_unknown_prices() {
        assert!(SearchFilters::default().matches(&event("Music", 1.0, None)));

        let filters = SearchFilters {
            max_price: Some(20.0),
            ..Default::default()
        };
        assert!(!filters.matches(&event("Music", 1.0, None)));
        assert!(filters.matches(&event("Music", 1.0, Some(20.0))));
        assert!(!filters.matches(&event("Music", 1.0, Some(20.5))));
    }

    #[test]
    fn test_filters_from_query() {
        let query = SearchQuery {
            user_id: Some("1".to_string()),
            city: Some("Boston".to_string()),
            event_type: Some("  ".to_string()),
            max_distance: Some("15".to_string()),
            max_price: None,
        };
        let filters = SearchFilters::from_query(&query).unwrap();
        assert_eq!(filters.event_type, None);
        assert_eq!(filters.max_distance, Some(15.0));

        let negative = SearchQuery {
            max_price: Some("-5".to_string()),
            ..query
        };
        assert!(SearchFilters::from_query(&negative).is_err());
    }

    #[test]
    fn test_numbered_event_flattens() {
        let json = serde_json::to_value(NumberedEvent {
            id: 1,
            event: event("Music", 2.0, Some(10.0)),
        })
        .unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["type"], "Music");
        assert_eq!(json["distance"], 2.0);
    }
}
