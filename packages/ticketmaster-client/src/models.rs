//! Ticketmaster API response models

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// An event returned by the Discovery API, flattened for aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketmasterEvent {
    /// Ticketmaster event id
    pub id: String,
    /// Event name
    pub name: String,
    /// Free-text info, falling back to `pleaseNote`
    pub description: Option<String>,
    /// Ticket purchase page
    pub url: Option<String>,
    /// Start time in UTC (midnight when the time is to be announced)
    pub start: Option<DateTime<Utc>>,
    /// Venue latitude
    pub latitude: Option<f64>,
    /// Venue longitude
    pub longitude: Option<f64>,
    /// Venue name
    pub venue_name: Option<String>,
    /// "line1, city, state" of the first venue
    pub address: Option<String>,
    /// Top-level classification (e.g. "Music", "Sports")
    pub segment: Option<String>,
    /// Finer classification (e.g. "Rock", "Basketball")
    pub genre: Option<String>,
    /// Cheapest advertised price
    pub min_price: Option<f64>,
    /// Currency of `min_price`
    pub currency: Option<String>,
}

// Internal response types for deserialization

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(rename = "_embedded")]
    pub embedded: Option<EmbeddedEvents>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddedEvents {
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawEvent {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub please_note: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub dates: Option<RawDates>,
    #[serde(default)]
    pub classifications: Vec<RawClassification>,
    #[serde(default)]
    pub price_ranges: Vec<RawPriceRange>,
    #[serde(rename = "_embedded", default)]
    pub embedded: Option<RawEventEmbedded>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDates {
    pub start: Option<RawStart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawStart {
    pub local_date: Option<String>,
    pub local_time: Option<String>,
    pub date_time: Option<String>,
    #[serde(rename = "timeTBA", default)]
    pub time_tba: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawClassification {
    pub segment: Option<RawNamed>,
    pub genre: Option<RawNamed>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNamed {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPriceRange {
    pub min: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawEventEmbedded {
    #[serde(default)]
    pub venues: Vec<RawVenue>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawVenue {
    pub name: Option<String>,
    pub address: Option<RawAddress>,
    pub city: Option<RawNamed>,
    pub state: Option<RawState>,
    pub location: Option<RawLocation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAddress {
    pub line1: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawState {
    pub state_code: Option<String>,
}

/// Ticketmaster sends coordinates as strings
#[derive(Debug, Deserialize)]
pub(crate) struct RawLocation {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl RawStart {
    fn resolve(&self) -> Option<DateTime<Utc>> {
        if let Some(parsed) = self
            .date_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        {
            return Some(parsed.with_timezone(&Utc));
        }

        let date = NaiveDate::parse_from_str(self.local_date.as_deref()?, "%Y-%m-%d").ok()?;
        let time = if self.time_tba {
            NaiveTime::MIN
        } else {
            self.local_time
                .as_deref()
                .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M:%S").ok())
                .unwrap_or(NaiveTime::MIN)
        };

        Some(date.and_time(time).and_utc())
    }
}

/// Ticketmaster uses "Undefined" as a placeholder classification name
fn meaningful_name(named: Option<&RawNamed>) -> Option<String> {
    named
        .and_then(|n| n.name.as_deref())
        .map(str::trim)
        .filter(|n| !n.is_empty() && !n.eq_ignore_ascii_case("undefined"))
        .map(str::to_string)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<RawEvent> for TicketmasterEvent {
    fn from(raw: RawEvent) -> Self {
        let start = raw
            .dates
            .as_ref()
            .and_then(|d| d.start.as_ref())
            .and_then(RawStart::resolve);

        let classification = raw.classifications.first();
        let segment = meaningful_name(classification.and_then(|c| c.segment.as_ref()));
        let genre = meaningful_name(classification.and_then(|c| c.genre.as_ref()));

        let price = raw.price_ranges.first();
        let min_price = price.and_then(|p| p.min).filter(|p| p.is_finite());
        let currency = price.and_then(|p| p.currency.clone());

        let venue = raw.embedded.as_ref().and_then(|e| e.venues.first());
        let (latitude, longitude) = venue
            .and_then(|v| v.location.as_ref())
            .map(|loc| {
                (
                    loc.latitude.as_deref().and_then(|s| s.trim().parse().ok()),
                    loc.longitude.as_deref().and_then(|s| s.trim().parse().ok()),
                )
            })
            .unwrap_or((None, None));

        let address = venue.and_then(|v| {
            let parts: Vec<&str> = [
                v.address.as_ref().and_then(|a| a.line1.as_deref()),
                v.city.as_ref().and_then(|c| c.name.as_deref()),
                v.state.as_ref().and_then(|s| s.state_code.as_deref()),
            ]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

            (!parts.is_empty()).then(|| parts.join(", "))
        });

        Self {
            id: raw.id,
            name: non_blank(raw.name).unwrap_or_else(|| "Untitled Event".to_string()),
            description: non_blank(raw.info).or_else(|| non_blank(raw.please_note)),
            url: non_blank(raw.url),
            start,
            latitude,
            longitude,
            venue_name: venue.and_then(|v| v.name.clone()),
            address,
            segment,
            genre,
            min_price,
            currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw_event(json: serde_json::Value) -> RawEvent {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_full_event_flattening() {
        let raw = raw_event(serde_json::json!({
            "id": "G5v0Z9JkcKAfP",
            "name": "Boston Celtics vs. Miami Heat",
            "info": "Doors open one hour early",
            "url": "https://www.ticketmaster.com/event/G5v0Z9JkcKAfP",
            "dates": { "start": { "localDate": "2024-12-01", "localTime": "19:30:00" } },
            "classifications": [{ "segment": { "name": "Sports" }, "genre": { "name": "Basketball" } }],
            "priceRanges": [{ "min": 45.5, "max": 300.0, "currency": "USD" }],
            "_embedded": { "venues": [{
                "name": "TD Garden",
                "address": { "line1": "100 Legends Way" },
                "city": { "name": "Boston" },
                "state": { "stateCode": "MA" },
                "location": { "latitude": "42.366303", "longitude": "-71.062228" }
            }] }
        }));

        let event: TicketmasterEvent = raw.into();
        assert_eq!(event.name, "Boston Celtics vs. Miami Heat");
        assert_eq!(event.description.as_deref(), Some("Doors open one hour early"));
        assert_eq!(
            event.start,
            Some(Utc.with_ymd_and_hms(2024, 12, 1, 19, 30, 0).unwrap())
        );
        assert_eq!(event.latitude, Some(42.366303));
        assert_eq!(event.longitude, Some(-71.062228));
        assert_eq!(
            event.address.as_deref(),
            Some("100 Legends Way, Boston, MA")
        );
        assert_eq!(event.segment.as_deref(), Some("Sports"));
        assert_eq!(event.genre.as_deref(), Some("Basketball"));
        assert_eq!(event.min_price, Some(45.5));
        assert_eq!(event.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_utc_date_time_wins_over_local_fields() {
        let raw = raw_event(serde_json::json!({
            "id": "1",
            "name": "Late Show",
            "dates": { "start": {
                "localDate": "2024-12-01",
                "localTime": "22:00:00",
                "dateTime": "2024-12-02T03:00:00Z"
            } }
        }));

        let event: TicketmasterEvent = raw.into();
        assert_eq!(
            event.start,
            Some(Utc.with_ymd_and_hms(2024, 12, 2, 3, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_time_tba_falls_back_to_midnight() {
        let raw = raw_event(serde_json::json!({
            "id": "2",
            "name": "Mystery Gig",
            "dates": { "start": { "localDate": "2025-03-14", "localTime": "20:00:00", "timeTBA": true } }
        }));

        let event: TicketmasterEvent = raw.into();
        assert_eq!(
            event.start,
            Some(Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_sparse_event_uses_defaults() {
        let raw = raw_event(serde_json::json!({
            "id": "3",
            "classifications": [{ "segment": { "name": "Undefined" }, "genre": { "name": "Undefined" } }],
            "_embedded": { "venues": [{ "location": { "latitude": "not-a-number", "longitude": "-71.0" } }] }
        }));

        let event: TicketmasterEvent = raw.into();
        assert_eq!(event.name, "Untitled Event");
        assert!(event.start.is_none());
        assert!(event.segment.is_none());
        assert!(event.genre.is_none());
        assert!(event.latitude.is_none());
        assert_eq!(event.longitude, Some(-71.0));
        assert!(event.address.is_none());
        assert!(event.min_price.is_none());
    }

    #[test]
    fn test_missing_embedded_means_no_events() {
        let response: SearchResponse =
            serde_json::from_value(serde_json::json!({ "page": { "totalElements": 0 } })).unwrap();
        assert!(response.embedded.is_none());
    }
}
