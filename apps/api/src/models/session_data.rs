use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// The most recent Session CSV written for a user
#[derive(Debug, Clone, FromRow)]
pub struct UserSessionData {
    pub id: i32,
    pub user_id: i32,
    pub ranked_csv: String,
    pub created_at: DateTime<Utc>,
}
