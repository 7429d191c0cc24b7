//! Session CSV storage
//!
//! Each user has at most one `user_session_data` row, enforced by a unique
//! key on `user_id`. Writes overwrite the previous snapshot in place.

use sqlx::PgPool;

use crate::models::session_data::UserSessionData;

/// Repository for per-user Session CSV snapshots
#[derive(Clone)]
pub struct SessionDataRepository {
    pool: PgPool,
}

impl SessionDataRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace the user's stored CSV with `csv`
    ///
    /// A single upsert on the `user_id` unique key, so overlapping fetches for
    /// one user both succeed and the last writer wins.
    pub async fn replace(&self, user_id: i32, csv: &str) -> Result<UserSessionData, sqlx::Error> {
        sqlx::query_as::<_, UserSessionData>(
            r#"
            INSERT INTO user_session_data (user_id, ranked_csv)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE
            SET ranked_csv = EXCLUDED.ranked_csv, created_at = NOW()
            RETURNING id, user_id, ranked_csv, created_at
            "#,
        )
        .bind(user_id)
        .bind(csv)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_by_user(&self, user_id: i32) -> Result<Option<UserSessionData>, sqlx::Error> {
        sqlx::query_as::<_, UserSessionData>(
            r#"
            SELECT id, user_id, ranked_csv, created_at
            FROM user_session_data
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Log the user out and drop their snapshot in one transaction
    ///
    /// Returns whether a snapshot existed.
    pub async fn end_session(&self, user_id: i32) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM user_session_data WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE users SET is_logged_in = FALSE WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(deleted.rows_affected() > 0)
    }
}
