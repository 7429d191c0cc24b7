//! Host event repository

use sqlx::PgPool;

use crate::models::host_event::{HostEvent, NewHostEvent};

/// Repository for host event database operations
#[derive(Clone)]
pub struct HostEventRepository {
    pool: PgPool,
}

impl HostEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a host event and return the stored row
    pub async fn create(&self, event: &NewHostEvent) -> Result<HostEvent, sqlx::Error> {
        sqlx::query_as::<_, HostEvent>(
            r#"
            INSERT INTO host_events (
                title, description, location, start, type,
                currency_code, amount, url, host_user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                event_id, title, description, location, start, source, type,
                currency_code, amount, url, created_at, host_user_id
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.start)
        .bind(&event.event_type)
        .bind(&event.currency_code)
        .bind(event.amount)
        .bind(&event.url)
        .bind(event.host_user_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, event_id: i32) -> Result<Option<HostEvent>, sqlx::Error> {
        sqlx::query_as::<_, HostEvent>(
            r#"
            SELECT
                event_id, title, description, location, start, source, type,
                currency_code, amount, url, created_at, host_user_id
            FROM host_events
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// All host events, oldest first
    pub async fn list_all(&self) -> Result<Vec<HostEvent>, sqlx::Error> {
        sqlx::query_as::<_, HostEvent>(
            r#"
            SELECT
                event_id, title, description, location, start, source, type,
                currency_code, amount, url, created_at, host_user_id
            FROM host_events
            ORDER BY event_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn list_by_host(&self, host_user_id: i32) -> Result<Vec<HostEvent>, sqlx::Error> {
        sqlx::query_as::<_, HostEvent>(
            r#"
            SELECT
                event_id, title, description, location, start, source, type,
                currency_code, amount, url, created_at, host_user_id
            FROM host_events
            WHERE host_user_id = $1
            ORDER BY event_id
            "#,
        )
        .bind(host_user_id)
        .fetch_all(&self.pool)
        .await
    }
}
