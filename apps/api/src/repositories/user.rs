//! User repository for centralized database operations
//!
//! Login state (`is_logged_in`, `last_activity`) lives on the user row so the
//! worker's inactivity sweep and the API agree on a single source of truth.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::user::{NewUser, User, UserProfileUpdate};

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find a user by their numeric ID
    ///
    /// # Returns
    /// * `Ok(Some(User))` - If the user exists
    /// * `Ok(None)` - If no user with the given ID exists
    /// * `Err(sqlx::Error)` - If a database error occurs
    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                user_id, email, first_name, last_name, password_hash,
                latitude, longitude, preferences, dislikes, price_range,
                max_distance, crowd_size, is_logged_in, last_activity, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a user by their email address (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                user_id, email, first_name, last_name, password_hash,
                latitude, longitude, preferences, dislikes, price_range,
                max_distance, crowd_size, is_logged_in, last_activity, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await
    }

    /// Check if an email address is already registered
    pub async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)"#)
            .bind(email.trim().to_lowercase())
            .fetch_one(&self.pool)
            .await
    }

    /// Insert a new user and return the stored row
    ///
    /// The email is stored lower-cased. A duplicate email surfaces as a
    /// unique-violation `sqlx::Error::Database`.
    pub async fn create(&self, new_user: &NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                email, first_name, last_name, password_hash, latitude, longitude,
                preferences, dislikes, price_range, max_distance, crowd_size
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING
                user_id, email, first_name, last_name, password_hash,
                latitude, longitude, preferences, dislikes, price_range,
                max_distance, crowd_size, is_logged_in, last_activity, created_at
            "#,
        )
        .bind(new_user.email.trim().to_lowercase())
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.password_hash)
        .bind(new_user.latitude)
        .bind(new_user.longitude)
        .bind(&new_user.preferences)
        .bind(&new_user.dislikes)
        .bind(&new_user.price_range)
        .bind(new_user.max_distance)
        .bind(&new_user.crowd_size)
        .fetch_one(&self.pool)
        .await
    }

    /// Apply a partial profile update
    ///
    /// # Returns
    /// * `Ok(Some(User))` - The updated row
    /// * `Ok(None)` - If the user does not exist
    pub async fn update_profile(
        &self,
        user_id: i32,
        update: &UserProfileUpdate,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                email        = COALESCE($2, email),
                first_name   = COALESCE($3, first_name),
                last_name    = COALESCE($4, last_name),
                latitude     = COALESCE($5, latitude),
                longitude    = COALESCE($6, longitude),
                preferences  = COALESCE($7, preferences),
                dislikes     = COALESCE($8, dislikes),
                price_range  = COALESCE($9, price_range),
                max_distance = COALESCE($10, max_distance),
                crowd_size   = COALESCE($11, crowd_size)
            WHERE user_id = $1
            RETURNING
                user_id, email, first_name, last_name, password_hash,
                latitude, longitude, preferences, dislikes, price_range,
                max_distance, crowd_size, is_logged_in, last_activity, created_at
            "#,
        )
        .bind(user_id)
        .bind(update.email.as_ref().map(|e| e.trim().to_lowercase()))
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(update.latitude)
        .bind(update.longitude)
        .bind(&update.preferences)
        .bind(&update.dislikes)
        .bind(&update.price_range)
        .bind(update.max_distance)
        .bind(&update.crowd_size)
        .fetch_optional(&self.pool)
        .await
    }

    /// Mark a user as logged in, stamping activity and optionally moving them
    pub async fn mark_logged_in(
        &self,
        user_id: i32,
        coordinates: Option<(f64, f64)>,
    ) -> Result<(), sqlx::Error> {
        let (latitude, longitude) = coordinates.unzip();
        sqlx::query(
            r#"
            UPDATE users SET
                is_logged_in = TRUE,
                last_activity = NOW(),
                latitude = COALESCE($2, latitude),
                longitude = COALESCE($3, longitude)
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(latitude)
        .bind(longitude)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Record activity for the inactivity sweep
    pub async fn touch_activity(&self, user_id: i32) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_activity = NOW() WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Logged-in users whose last recorded activity is older than `cutoff`
    ///
    /// Users that never recorded activity are not returned.
    pub async fn find_inactive(&self, cutoff: DateTime<Utc>) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                user_id, email, first_name, last_name, password_hash,
                latitude, longitude, preferences, dislikes, price_range,
                max_distance, crowd_size, is_logged_in, last_activity, created_at
            FROM users
            WHERE is_logged_in AND last_activity < $1
            ORDER BY last_activity
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
    }
}
