//! Yelp Fusion response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Yelp reports all event prices in US dollars
pub const YELP_CURRENCY: &str = "USD";

/// A Yelp event mapped into the fields Ventaura aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YelpEvent {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Yelp category slug, e.g. `music` or `kids-family`
    pub category: String,
    pub start: Option<DateTime<Utc>>,
    /// Ticket cost; free events report zero
    pub cost: Option<f64>,
    pub currency: String,
    pub url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// `location.display_address` lines joined with ", "
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventsResponse {
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEvent {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub time_start: Option<String>,
    pub cost: Option<f64>,
    #[serde(default)]
    pub is_free: bool,
    pub event_site_url: Option<String>,
    pub tickets_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location: Option<RawLocation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLocation {
    #[serde(default)]
    pub display_address: Vec<String>,
}

impl From<RawEvent> for YelpEvent {
    fn from(raw: RawEvent) -> Self {
        let start = raw.time_start.as_deref().and_then(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    tracing::debug!(
                        event_id = %raw.id,
                        raw = s,
                        error = %e,
                        "Unparseable Yelp time_start"
                    );
                })
                .ok()
        });

        let cost = if raw.is_free {
            Some(0.0)
        } else {
            raw.cost.filter(|c| c.is_finite() && *c >= 0.0)
        };

        let address = raw.location.and_then(|loc| {
            let lines: Vec<&str> = loc
                .display_address
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect();
            (!lines.is_empty()).then(|| lines.join(", "))
        });

        // Yelp sometimes reports 0,0 for events without a venue
        let has_coords = matches!(
            (raw.latitude, raw.longitude),
            (Some(lat), Some(lon)) if lat != 0.0 || lon != 0.0
        );

        Self {
            id: raw.id,
            name: raw
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Untitled Event".to_string()),
            description: raw.description.filter(|d| !d.trim().is_empty()),
            category: raw
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| "other".to_string()),
            start,
            cost,
            currency: YELP_CURRENCY.to_string(),
            url: raw.event_site_url.or(raw.tickets_url),
            latitude: if has_coords { raw.latitude } else { None },
            longitude: if has_coords { raw.longitude } else { None },
            address,
        }
    }
}
