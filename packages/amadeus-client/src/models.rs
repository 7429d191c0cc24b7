//! Amadeus response models

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_NAME: &str = "Unnamed Tour";
pub const DEFAULT_DESCRIPTION: &str = "No description available.";
pub const DEFAULT_CURRENCY: &str = "N/A";

/// A bookable tour or activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmadeusActivity {
    pub id: String,
    pub name: String,
    /// Plain-text description (Amadeus sends HTML)
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub amount: Option<f64>,
    pub currency: String,
    pub booking_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActivitiesResponse {
    #[serde(default)]
    pub data: Vec<RawActivity>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorsResponse {
    #[serde(default)]
    pub errors: Vec<RawApiError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawApiError {
    pub title: Option<String>,
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawActivity {
    pub id: String,
    pub name: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub geo_code: Option<RawGeoCode>,
    pub price: Option<RawPrice>,
    pub booking_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGeoCode {
    #[serde(default, deserialize_with = "number_or_string")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPrice {
    #[serde(default, deserialize_with = "number_or_string")]
    pub amount: Option<f64>,
    pub currency_code: Option<String>,
}

/// Amadeus is inconsistent about quoting numbers
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    Ok(
        match Option::<NumberOrString>::deserialize(deserializer)? {
            Some(NumberOrString::Number(n)) => Some(n),
            Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
            None => None,
        }
        .filter(|n: &f64| n.is_finite()),
    )
}

/// Drop markup tags, decode character entities and collapse whitespace
pub(crate) fn strip_html(input: &str) -> String {
    let mut text = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode the common named entities and numeric `&#NN;` / `&#xNN;` references
///
/// Unrecognized sequences are kept verbatim. Decoding is a single pass, so
/// `&amp;lt;` yields `&lt;` rather than `<`.
fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        let decoded = rest
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| entity_char(&rest[1..end]).map(|ch| (ch, end)));

        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn entity_char(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

impl From<RawActivity> for AmadeusActivity {
    fn from(raw: RawActivity) -> Self {
        let description = raw
            .description
            .or(raw.short_description)
            .map(|d| strip_html(&d))
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        let (amount, currency) = match raw.price {
            Some(price) => (
                price.amount,
                price
                    .currency_code
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            ),
            None => (None, DEFAULT_CURRENCY.to_string()),
        };

        Self {
            id: raw.id,
            name: raw
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            description,
            latitude: raw.geo_code.as_ref().and_then(|g| g.latitude),
            longitude: raw.geo_code.as_ref().and_then(|g| g.longitude),
            amount,
            currency,
            booking_link: raw.booking_link,
        }
    }
}
