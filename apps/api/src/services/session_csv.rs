//! Session CSV rendering
//!
//! The frontend and the ranking service both read this snapshot, so the
//! column names and order are part of the contract.

use chrono::SecondsFormat;

use crate::error::{ApiError, ApiResult};
use crate::models::CombinedEvent;

/// Header row, in column order
pub const CSV_HEADERS: [&str; 12] = [
    "contentId",
    "title",
    "description",
    "location",
    "start",
    "source",
    "type",
    "currencyCode",
    "amount",
    "url",
    "distance",
    "address",
];

/// Render events as a Session CSV with 1-based content ids
pub fn to_csv(events: &[CombinedEvent]) -> ApiResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;

    for (index, event) in events.iter().enumerate() {
        writer.write_record([
            (index + 1).to_string(),
            event.title.clone(),
            event.description.clone().unwrap_or_default(),
            event.location.clone(),
            event
                .start
                .map(|s| s.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
            event.source.label().to_string(),
            event.event_type.clone(),
            event.currency_code.clone().unwrap_or_default(),
            event.amount.map(|a| a.to_string()).unwrap_or_default(),
            event.url.clone().unwrap_or_default(),
            format!("{:.2}", event.distance_km),
            event.address.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ApiError::Internal(format!("csv flush failed: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| ApiError::Internal(format!("csv was not utf-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventSource;
    use chrono::{TimeZone, Utc};

    fn event(title: &str) -> CombinedEvent {
        CombinedEvent {
            title: title.to_string(),
            description: Some("Doors at 7".to_string()),
            location: "42.366303, -71.062228".to_string(),
            latitude: 42.366303,
            longitude: -71.062228,
            address: Some("100 Legends Way, Boston, MA".to_string()),
            start: Some(Utc.with_ymd_and_hms(2025, 6, 1, 19, 30, 0).unwrap()),
            source: EventSource::Ticketmaster,
            event_type: "Music".to_string(),
            currency_code: Some("USD".to_string()),
            amount: Some(49.5),
            url: Some("https://www.ticketmaster.com/event/1".to_string()),
            distance_km: 1.23456,
        }
    }

    #[test]
    fn test_empty_list_is_header_only() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(
            csv,
            "contentId,title,description,location,start,source,type,currencyCode,amount,url,distance,address\n"
        );
    }

    #[test]
    fn test_row_layout() {
        let csv = to_csv(&[event("Arena Rock Night")]).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let row = reader.records().next().unwrap().unwrap();

        assert_eq!(&row[0], "1");
        assert_eq!(&row[1], "Arena Rock Night");
        assert_eq!(&row[3], "42.366303, -71.062228");
        assert_eq!(&row[4], "2025-06-01T19:30:00Z");
        assert_eq!(&row[5], "Ticketmaster");
        assert_eq!(&row[6], "Music");
        assert_eq!(&row[8], "49.5");
        assert_eq!(&row[10], "1.23");
        assert_eq!(&row[11], "100 Legends Way, Boston, MA");
    }

    #[test]
    fn test_unknown_values_are_empty() {
        let mut e = event("Mystery Show");
        e.start = None;
        e.amount = None;
        e.description = None;
        e.address = None;

        let csv = to_csv(&[e]).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let row = reader.records().next().unwrap().unwrap();

        assert_eq!(&row[2], "");
        assert_eq!(&row[4], "");
        assert_eq!(&row[8], "");
        assert_eq!(&row[11], "");
    }

    #[test]
    fn test_content_ids_follow_position() {
        let csv = to_csv(&[event("a"), event("b"), event("c")]).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let ids: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();

        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_awkward_text_is_quoted() {
        let mut e = event("Rock, \"Roll\" & More");
        e.description = Some("line one\nline two".to_string());

        let csv = to_csv(&[e]).unwrap();
        assert!(csv.contains("\"Rock, \"\"Roll\"\" & More\""));

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "Rock, \"Roll\" & More");
        assert_eq!(&row[2], "line one\nline two");
    }
}
