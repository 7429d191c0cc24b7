//! Events created by Ventaura users acting as hosts

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Host event row from database
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostEvent {
    pub event_id: i32,
    pub title: String,
    pub description: Option<String>,
    /// Free-text venue, or `"lat, lon"` when the host supplied coordinates
    pub location: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub source: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub event_type: String,
    pub currency_code: Option<String>,
    pub amount: Option<f64>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub host_user_id: i32,
}

/// Validated input for inserting a host event
#[derive(Debug, Clone)]
pub struct NewHostEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<DateTime<Utc>>,
    /// Already normalized to a canonical type
    pub event_type: String,
    pub currency_code: Option<String>,
    pub amount: Option<f64>,
    pub url: Option<String>,
    pub host_user_id: i32,
}
