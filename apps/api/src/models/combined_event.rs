//! The normalized event shape every upstream source is mapped onto

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Where a combined event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    Ticketmaster,
    Yelp,
    Amadeus,
    Host,
}

impl EventSource {
    /// Label written to the `source` column of the Session CSV
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ticketmaster => "Ticketmaster",
            Self::Yelp => "Yelp",
            Self::Amadeus => "Amadeus",
            Self::Host => "Host",
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for EventSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One event after normalization, geocoding and distance calculation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedEvent {
    pub title: String,
    pub description: Option<String>,
    /// `"lat, lon"`
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub source: EventSource,
    #[serde(rename = "type")]
    pub event_type: String,
    pub currency_code: Option<String>,
    pub amount: Option<f64>,
    pub url: Option<String>,
    #[serde(rename = "distance")]
    pub distance_km: f64,
}

/// Output of one aggregation run
#[derive(Debug, Clone, Default)]
pub struct AggregationResult {
    /// Events in source order: Ticketmaster, Yelp, Amadeus, Host
    pub events: Vec<CombinedEvent>,
    /// Records dropped because no coordinates could be resolved
    pub skipped: usize,
    /// Upstreams that failed and contributed no events
    pub failed_sources: Vec<EventSource>,
}
