//! Ranking trigger
//!
//! - `POST /api/events/rank/:user_id` - Ask the ranking service to reorder the user's Session CSV

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiPath;
use crate::repositories::UserRepository;
use crate::services::RankingService;

#[derive(Clone)]
pub struct EventsState {
    pub ranking_service: Arc<RankingService>,
    pub users: UserRepository,
}

pub fn events_router(state: EventsState) -> Router {
    Router::new()
        .route("/rank/:user_id", post(rank_events))
        .with_state(state)
}

/// Trigger ranking for a user
///
/// # Response
/// - 200 OK: the ranking payload
/// - 400 Bad Request: the ranking service declined (`success: false`)
/// - 404 Not Found: unknown user
/// - 502 Bad Gateway: the ranking service failed or was unreachable
async fn rank_events(
    State(state): State<EventsState>,
    ApiPath(user_id): ApiPath<i32>,
) -> ApiResult<impl IntoResponse> {
    if state.users.find_by_id(user_id).await?.is_none() {
        return Err(ApiError::not_found("user", user_id));
    }

    let ranking = state.ranking_service.rank_events_for_user(user_id).await?;

    let status = if ranking.success {
        StatusCode::OK
    } else {
        tracing::warn!(user_id, message = %ranking.message, "Ranking service declined");
        StatusCode::BAD_REQUEST
    };

    Ok((status, Json(ranking)))
}
