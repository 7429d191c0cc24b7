//! Session timeout sweep
//!
//! Users who stay logged in without touching their session for longer than
//! the configured timeout are logged out and their Session CSV is dropped.
//! Each user is expired in its own transaction, so one failure never rolls
//! back the others.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use crate::error::{WorkerError, WorkerResult};

/// Outcome of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Idle sessions found at the start of the sweep
    pub examined: usize,
    /// Users actually logged out
    pub logged_out: usize,
    /// Users whose logout failed and will be retried next tick
    pub failures: usize,
}

impl SweepReport {
    /// Users that became active again between listing and expiry
    pub fn reactivated(&self) -> usize {
        self.examined - self.logged_out - self.failures
    }
}

/// Sweep sessions idle for longer than `timeout`, measured from now
pub async fn run(pool: &PgPool, timeout: Duration) -> WorkerResult<SweepReport> {
    let timeout = chrono::Duration::from_std(timeout)
        .map_err(|e| WorkerError::Configuration(format!("session timeout out of range: {}", e)))?;

    sweep_inactive_sessions(pool, Utc::now() - timeout).await
}

/// Log out every user whose last activity is older than `cutoff`
///
/// Users who are logged in but never recorded any activity are left alone.
#[instrument(skip(pool))]
pub async fn sweep_inactive_sessions(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
) -> WorkerResult<SweepReport> {
    let idle_users = find_idle_users(pool, cutoff).await?;

    let mut report = SweepReport {
        examined: idle_users.len(),
        ..Default::default()
    };

    for user_id in idle_users {
        match expire_session(pool, user_id, cutoff).await {
            Ok(true) => {
                report.logged_out += 1;
                tracing::info!(user_id, "Logged out inactive user");
            }
            Ok(false) => {
                tracing::debug!(user_id, "User became active before expiry");
            }
            Err(e) => {
                report.failures += 1;
                WorkerError::session_expiry(user_id, e).log();
            }
        }
    }

    if report.examined > 0 {
        tracing::info!(
            examined = report.examined,
            logged_out = report.logged_out,
            failures = report.failures,
            "Session sweep complete"
        );
    }

    Ok(report)
}

async fn find_idle_users(pool: &PgPool, cutoff: DateTime<Utc>) -> WorkerResult<Vec<i32>> {
    sqlx::query_scalar::<_, i32>(
        r#"
        SELECT user_id
        FROM users
        WHERE is_logged_in AND last_activity < $1
        ORDER BY last_activity
        "#,
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => WorkerError::DatabaseUnavailable,
        other => WorkerError::Database(other),
    })
}

/// Log one user out and drop their session data
///
/// Returns `false` without changing anything when the user was active again
/// or already logged out by the time the transaction ran.
async fn expire_session(
    pool: &PgPool,
    user_id: i32,
    cutoff: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE users
        SET is_logged_in = FALSE, last_activity = NOW()
        WHERE user_id = $1 AND is_logged_in AND last_activity < $2
        "#,
    )
    .bind(user_id)
    .bind(cutoff)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query("DELETE FROM user_session_data WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(true)
}
