//! Host event route handlers
//!
//! - `POST /api/host-events` - Create an event as a host
//! - `GET /api/host-events?hostUserId=` - List events, optionally for one host
//! - `GET /api/host-events/:id` - Fetch a single event

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::{HostEvent, NewHostEvent};
use crate::repositories::{HostEventRepository, UserRepository};
use crate::services::categories::{canonical_type, OTHER};

#[derive(Clone)]
pub struct HostEventsState {
    pub host_events: HostEventRepository,
    pub users: UserRepository,
}

pub fn host_events_router(state: HostEventsState) -> Router {
    Router::new()
        .route("/", get(list_host_events).post(create_host_event))
        .route("/:id", get(get_host_event))
        .with_state(state)
}

/// Host event creation body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHostEventRequest {
    pub title: String,
    pub host_user_id: i32,
    #[serde(default)]
    pub description: Option<String>,
    /// Free-text venue or `"lat, lon"`
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub currency_code: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
}

impl CreateHostEventRequest {
    /// Validate and normalize into an insertable row
    fn into_new_event(self) -> ApiResult<NewHostEvent> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::ValidationError("title is required".to_string()));
        }
        if let Some(amount) = self.amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(ApiError::ValidationError(
                    "amount cannot be negative".to_string(),
                ));
            }
        }

        let event_type = self
            .event_type
            .as_deref()
            .map_or(OTHER, canonical_type)
            .to_string();

        Ok(NewHostEvent {
            title,
            description: self.description,
            location: self
                .location
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            start: self.start,
            event_type,
            currency_code: self
                .currency_code
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty()),
            amount: self.amount,
            url: self.url,
            host_user_id: self.host_user_id,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub host_user_id: Option<i32>,
}

/// Create a host event
///
/// # Response
/// - 201 Created: the stored event
/// - 400 Bad Request: blank title or negative amount
/// - 404 Not Found: the host user does not exist
async fn create_host_event(
    State(state): State<HostEventsState>,
    ApiJson(request): ApiJson<CreateHostEventRequest>,
) -> ApiResult<impl IntoResponse> {
    let new_event = request.into_new_event()?;

    if state.users.find_by_id(new_event.host_user_id).await?.is_none() {
        return Err(ApiError::not_found("user", new_event.host_user_id));
    }

    let event = state.host_events.create(&new_event).await?;

    tracing::info!(
        event_id = event.event_id,
        host_user_id = event.host_user_id,
        "Host event created"
    );

    Ok((StatusCode::CREATED, Json(event)))
}

async fn list_host_events(
    State(state): State<HostEventsState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<Vec<HostEvent>>> {
    let events = match query.host_user_id {
        Some(host_user_id) => state.host_events.list_by_host(host_user_id).await?,
        None => state.host_events.list_all().await?,
    };

    Ok(Json(events))
}

async fn get_host_event(
    State(state): State<HostEventsState>,
    ApiPath(event_id): ApiPath<i32>,
) -> ApiResult<Json<HostEvent>> {
    let event = state
        .host_events
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::not_found("host event", event_id))?;

    Ok(Json(event))
}
