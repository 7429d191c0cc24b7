//! Combined events route handlers
//!
//! - `GET /api/combined-events/fetch?userId=` - Aggregate events and store the Session CSV
//! - `GET /api/combined-events/get-csv?userId=` - Return the stored Session CSV
//! - `POST /api/combined-events/logout?userId=` - Drop the session and log out

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use super::{require_user_id, users::UserIdQuery};
use crate::error::{ApiError, ApiResult};
use crate::extract::ApiQuery;
use crate::models::{EventSource, User};
use crate::repositories::{SessionDataRepository, UserRepository};
use crate::services::{session_csv, CombinedEventsService};

/// Shared state for combined event handlers
#[derive(Clone)]
pub struct CombinedEventsState {
    pub combined_events: Arc<CombinedEventsService>,
    pub users: UserRepository,
    pub sessions: SessionDataRepository,
}

pub fn combined_events_router(state: CombinedEventsState) -> Router {
    Router::new()
        .route("/fetch", get(fetch_events))
        .route("/get-csv", get(get_csv))
        .route("/logout", post(logout))
        .with_state(state)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse {
    pub message: &'static str,
    pub event_count: usize,
    pub skipped_count: usize,
    pub failed_sources: Vec<EventSource>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Look a user up for an endpoint where an unknown id is a bad request
async fn known_user(users: &UserRepository, user_id: i32) -> ApiResult<User> {
    users.find_by_id(user_id).await?.ok_or_else(|| {
        ApiError::ValidationError(format!("user {} does not exist", user_id))
    })
}

/// Aggregate events around the user and replace their Session CSV
///
/// # Response
/// - 200 OK: `{message, eventCount, skippedCount, failedSources}`
/// - 400 Bad Request: unknown user, or user without a stored location
async fn fetch_events(
    State(state): State<CombinedEventsState>,
    ApiQuery(query): ApiQuery<UserIdQuery>,
) -> ApiResult<Json<FetchResponse>> {
    let user_id = require_user_id(query.user_id.as_deref())?;
    let user = known_user(&state.users, user_id).await?;

    let (latitude, longitude) = user.coordinates().ok_or_else(|| {
        ApiError::ValidationError("user location is not set".to_string())
    })?;

    let result = state
        .combined_events
        .fetch_for_user(latitude, longitude)
        .await?;

    let csv = session_csv::to_csv(&result.events)?;
    state.sessions.replace(user_id, &csv).await?;
    state.users.touch_activity(user_id).await?;

    tracing::info!(
        user_id,
        event_count = result.events.len(),
        skipped = result.skipped,
        "Stored session events"
    );

    Ok(Json(FetchResponse {
        message: "Events fetched and stored successfully.",
        event_count: result.events.len(),
        skipped_count: result.skipped,
        failed_sources: result.failed_sources,
    }))
}

/// Return the stored Session CSV as `text/csv`
///
/// # Response
/// - 200 OK: the CSV body
/// - 404 Not Found: nothing stored for the user
async fn get_csv(
    State(state): State<CombinedEventsState>,
    ApiQuery(query): ApiQuery<UserIdQuery>,
) -> ApiResult<impl IntoResponse> {
    let user_id = require_user_id(query.user_id.as_deref())?;

    let session = state
        .sessions
        .find_by_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("session data", user_id))?;

    state.users.touch_activity(user_id).await?;

    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        session.ranked_csv,
    ))
}

/// Delete the user's session data and mark them logged out
async fn logout(
    State(state): State<CombinedEventsState>,
    ApiQuery(query): ApiQuery<UserIdQuery>,
) -> ApiResult<Json<MessageResponse>> {
    let user_id = require_user_id(query.user_id.as_deref())?;
    known_user(&state.users, user_id).await?;

    let had_session = state.sessions.end_session(user_id).await?;

    tracing::info!(user_id, had_session, "User logged out");

    Ok(Json(MessageResponse {
        message: "User logged out successfully.",
    }))
}
