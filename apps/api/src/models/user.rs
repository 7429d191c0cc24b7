//! User account models
//!
//! This module contains:
//! - The `users` row as stored in PostgreSQL
//! - Insert and partial-update inputs used by the repository
//! - The public profile payload returned to the frontend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User model from database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Comma-separated event types the user likes
    pub preferences: Option<String>,
    /// Comma-separated event types the user wants hidden
    pub dislikes: Option<String>,
    pub price_range: Option<String>,
    /// Preferred search radius in kilometres
    pub max_distance: Option<f64>,
    pub crowd_size: Option<String>,
    pub is_logged_in: bool,
    /// Last request that touched the user's session; drives the inactivity sweep
    pub last_activity: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The user's stored location, if both halves are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Fields required to insert a new user row
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub preferences: Option<String>,
    pub dislikes: Option<String>,
    pub price_range: Option<String>,
    pub max_distance: Option<f64>,
    pub crowd_size: Option<String>,
}

/// Partial profile update; `None` leaves the stored value unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub preferences: Option<String>,
    pub dislikes: Option<String>,
    pub price_range: Option<String>,
    pub max_distance: Option<f64>,
    pub crowd_size: Option<String>,
}

impl UserProfileUpdate {
    /// True when the request carries no field to change
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.preferences.is_none()
            && self.dislikes.is_none()
            && self.price_range.is_none()
            && self.max_distance.is_none()
            && self.crowd_size.is_none()
    }
}

/// User profile (safe to return to client)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub preferences: Option<String>,
    pub dislikes: Option<String>,
    pub price_range: Option<String>,
    pub max_distance: Option<f64>,
    pub crowd_size: Option<String>,
    pub is_logged_in: bool,
    pub last_activity: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            latitude: user.latitude,
            longitude: user.longitude,
            preferences: user.preferences,
            dislikes: user.dislikes,
            price_range: user.price_range,
            max_distance: user.max_distance,
            crowd_size: user.crowd_size,
            is_logged_in: user.is_logged_in,
            last_activity: user.last_activity,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            user_id: 3,
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            latitude: Some(42.36),
            longitude: None,
            preferences: Some("Music,Comedy".to_string()),
            dislikes: None,
            price_range: None,
            max_distance: Some(25.0),
            crowd_size: None,
            is_logged_in: false,
            last_activity: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_coordinates_need_both_halves() {
        let mut user = sample_user();
        assert_eq!(user.coordinates(), None);

        user.longitude = Some(-71.06);
        assert_eq!(user.coordinates(), Some((42.36, -71.06)));
    }

    #[test]
    fn test_profile_never_serializes_password_hash() {
        let profile = UserProfile::from(sample_user());
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["userId"], 3);
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["maxDistance"], 25.0);
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn test_profile_update_accepts_camel_case_subset() {
        let update: UserProfileUpdate =
            serde_json::from_str(r#"{"priceRange":"$$","crowdSize":"small"}"#).unwrap();

        assert_eq!(update.price_range.as_deref(), Some("$$"));
        assert_eq!(update.crowd_size.as_deref(), Some("small"));
        assert!(update.email.is_none());
        assert!(!update.is_empty());
        assert!(UserProfileUpdate::default().is_empty());
    }
}
