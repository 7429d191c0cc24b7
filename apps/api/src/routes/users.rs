//! Account REST route handlers
//!
//! - `POST /api/users/create-account` - Register a new account
//! - `POST /api/users/login` - Check credentials and mark the user logged in
//! - `GET /api/users/:id` - Fetch a profile by path id
//! - `GET /api/users/get-user-data?userId=` - Fetch a profile by query id
//! - `PUT /api/users/update-user-data?userId=` - Partial profile update
//! - `PUT /api/users/updatePreferences` - Partial update with `userId` in the body

use axum::{
    extract::State,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::require_user_id;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::models::{UserProfile, UserProfileUpdate};
use crate::repositories::UserRepository;
use crate::services::{AuthService, Registration};

/// Shared state for account handlers
#[derive(Clone)]
pub struct UsersState {
    pub auth_service: Arc<AuthService>,
    pub users: UserRepository,
}

/// Create the accounts router
pub fn users_router(state: UsersState) -> Router {
    Router::new()
        .route("/create-account", post(create_account))
        .route("/login", post(login))
        .route("/get-user-data", get(get_user_data))
        .route("/update-user-data", put(update_user_data))
        .route("/updatePreferences", put(update_preferences))
        .route("/:id", get(get_user_by_id))
        .with_state(state)
}

// ========== Request/Response Types ==========

/// Account creation request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub preferences: Option<String>,
    #[serde(default)]
    pub dislikes: Option<String>,
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub max_distance: Option<f64>,
    #[serde(default)]
    pub crowd_size: Option<String>,
}

impl From<CreateAccountRequest> for Registration {
    fn from(request: CreateAccountRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
            first_name: request.first_name,
            last_name: request.last_name,
            latitude: request.latitude,
            longitude: request.longitude,
            preferences: request.preferences,
            dislikes: request.dislikes,
            price_range: request.price_range,
            max_distance: request.max_distance,
            crowd_size: request.crowd_size,
        }
    }
}

/// Login request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Preferences update body; the user id travels with the fields
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    pub user_id: i32,
    #[serde(flatten)]
    pub update: UserProfileUpdate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Option<String>,
}

/// `{message, userId}` reply for account creation and login
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub message: &'static str,
    pub user_id: i32,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdatedResponse {
    pub message: &'static str,
    pub user: UserProfile,
}

// ========== Route Handlers ==========

/// Register a new account
///
/// # Response
/// - 200 OK: `{message, userId}`
/// - 400 Bad Request: invalid email, short password, blank names, bad coordinates
/// - 409 Conflict: email already registered
async fn create_account(
    State(state): State<UsersState>,
    ApiJson(request): ApiJson<CreateAccountRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let user = state.auth_service.register(request.into()).await?;

    Ok(Json(AccountResponse {
        message: "Account created successfully.",
        user_id: user.user_id,
    }))
}

/// Log in with email and password
///
/// # Response
/// - 200 OK: `{message, userId}`
/// - 401 Unauthorized: unknown email or wrong password (same message for both)
async fn login(
    State(state): State<UsersState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let coordinates = match (request.latitude, request.longitude) {
        (Some(lat), Some(lon)) => Some((lat, lon)),
        (None, None) => None,
        _ => {
            return Err(ApiError::ValidationError(
                "latitude and longitude must be provided together".to_string(),
            ))
        }
    };

    let user = state
        .auth_service
        .login(&request.email, &request.password, coordinates)
        .await?;

    Ok(Json(AccountResponse {
        message: "Login successful!",
        user_id: user.user_id,
    }))
}

async fn get_user_by_id(
    State(state): State<UsersState>,
    ApiPath(user_id): ApiPath<i32>,
) -> ApiResult<Json<UserProfile>> {
    load_profile(&state.users, user_id).await
}

async fn get_user_data(
    State(state): State<UsersState>,
    ApiQuery(query): ApiQuery<UserIdQuery>,
) -> ApiResult<Json<UserProfile>> {
    let user_id = require_user_id(query.user_id.as_deref())?;
    load_profile(&state.users, user_id).await
}

async fn load_profile(users: &UserRepository, user_id: i32) -> ApiResult<Json<UserProfile>> {
    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user", user_id))?;

    Ok(Json(user.into()))
}

/// Partially update a profile; absent fields keep their stored value
///
/// # Response
/// - 200 OK: `{message, user}`
/// - 404 Not Found: unknown user
/// - 409 Conflict: new email belongs to another account
async fn update_user_data(
    State(state): State<UsersState>,
    ApiQuery(query): ApiQuery<UserIdQuery>,
    ApiJson(update): ApiJson<UserProfileUpdate>,
) -> ApiResult<Json<ProfileUpdatedResponse>> {
    let user_id = require_user_id(query.user_id.as_deref())?;
    let user = state.auth_service.update_profile(user_id, &update).await?;

    Ok(Json(ProfileUpdatedResponse {
        message: "User data updated successfully.",
        user: user.into(),
    }))
}

async fn update_preferences(
    State(state): State<UsersState>,
    ApiJson(request): ApiJson<UpdatePreferencesRequest>,
) -> ApiResult<Json<ProfileUpdatedResponse>> {
    let user = state
        .auth_service
        .update_profile(request.user_id, &request.update)
        .await?;

    Ok(Json(ProfileUpdatedResponse {
        message: "Preferences updated successfully.",
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_account_request_uses_camel_case() {
        let request: CreateAccountRequest = serde_json::from_str(
            r#"{"email":"ada@example.com","password":"correct horse","firstName":"Ada","lastName":"Lovelace","priceRange":"$$","maxDistance":25}"#,
        )
        .unwrap();

        let registration: Registration = request.into();
        assert_eq!(registration.first_name, "Ada");
        assert_eq!(registration.price_range.as_deref(), Some("$$"));
        assert_eq!(registration.max_distance, Some(25.0));
        assert_eq!(registration.latitude, None);
    }

    #[test]
    fn test_update_preferences_request_flattens_fields() {
        let request: UpdatePreferencesRequest = serde_json::from_str(
            r#"{"userId":7,"preferences":"Music,Comedy","crowdSize":"Small"}"#,
        )
        .unwrap();

        assert_eq!(request.user_id, 7);
        assert_eq!(request.update.preferences.as_deref(), Some("Music,Comedy"));
        assert_eq!(request.update.crowd_size.as_deref(), Some("Small"));
        assert!(request.update.email.is_none());
    }

    #[test]
    fn test_account_response_shape() {
        let json = serde_json::to_value(AccountResponse {
            message: "Login successful!",
            user_id: 3,
        })
        .unwrap();
        assert_eq!(json["userId"], 3);
        assert_eq!(json["message"], "Login successful!");
    }
}
