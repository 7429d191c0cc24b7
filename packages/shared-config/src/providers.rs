//! Upstream event-provider credentials and endpoints

use std::fmt;

use url::Url;

use crate::{get_optional_env, parse_env, ConfigError, ConfigResult};

/// OAuth client credentials for the Amadeus activities API
#[derive(Clone)]
pub struct AmadeusCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for AmadeusCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmadeusCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Settings for every third-party API the aggregation pipeline talks to
///
/// Keys are optional at load time so development setups can run with a
/// subset of providers. Production validation lives in the API config,
/// which calls [`ProvidersConfig::missing_required`].
#[derive(Clone, Default)]
pub struct ProvidersConfig {
    pub ticketmaster_api_key: Option<String>,
    pub ticketmaster_base_url: Option<String>,

    pub yelp_api_key: Option<String>,
    pub yelp_base_url: Option<String>,

    /// Amadeus is only queried when both halves of the credential pair exist
    pub amadeus: Option<AmadeusCredentials>,
    pub amadeus_base_url: Option<String>,

    pub google_geocoding_api_key: Option<String>,
    pub geocoding_base_url: Option<String>,

    /// Resolve street addresses for events that only carry coordinates
    pub reverse_geocode: bool,
}

impl fmt::Debug for ProvidersConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(key: &Option<String>) -> &'static str {
            if key.is_some() {
                "[REDACTED]"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("ProvidersConfig")
            .field("ticketmaster_api_key", &redact(&self.ticketmaster_api_key))
            .field("ticketmaster_base_url", &self.ticketmaster_base_url)
            .field("yelp_api_key", &redact(&self.yelp_api_key))
            .field("yelp_base_url", &self.yelp_base_url)
            .field("amadeus", &self.amadeus)
            .field("amadeus_base_url", &self.amadeus_base_url)
            .field(
                "google_geocoding_api_key",
                &redact(&self.google_geocoding_api_key),
            )
            .field("geocoding_base_url", &self.geocoding_base_url)
            .field("reverse_geocode", &self.reverse_geocode)
            .finish()
    }
}

impl ProvidersConfig {
    /// Load provider settings from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        let amadeus = match (
            get_optional_env("AMADEUS_CLIENT_ID"),
            get_optional_env("AMADEUS_CLIENT_SECRET"),
        ) {
            (Some(client_id), Some(client_secret)) => Some(AmadeusCredentials {
                client_id,
                client_secret,
            }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::IncompletePair(
                    "AMADEUS_CLIENT_ID",
                    "AMADEUS_CLIENT_SECRET",
                ))
            }
        };

        Ok(Self {
            ticketmaster_api_key: get_optional_env("TICKETMASTER_API_KEY"),
            ticketmaster_base_url: base_url_override("TICKETMASTER_BASE_URL")?,
            yelp_api_key: get_optional_env("YELP_API_KEY"),
            yelp_base_url: base_url_override("YELP_BASE_URL")?,
            amadeus,
            amadeus_base_url: base_url_override("AMADEUS_BASE_URL")?,
            google_geocoding_api_key: get_optional_env("GOOGLE_GEOCODING_API_KEY"),
            geocoding_base_url: base_url_override("GEOCODING_BASE_URL")?,
            reverse_geocode: parse_env("GEOCODE_REVERSE_LOOKUP", true)?,
        })
    }

    /// Names of the variables a production deployment cannot run without
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.ticketmaster_api_key.is_none() {
            missing.push("TICKETMASTER_API_KEY");
        }
        if self.yelp_api_key.is_none() {
            missing.push("YELP_API_KEY");
        }
        if self.google_geocoding_api_key.is_none() {
            missing.push("GOOGLE_GEOCODING_API_KEY");
        }
        missing
    }

    /// Check whether the Amadeus source is enabled
    pub fn has_amadeus(&self) -> bool {
        self.amadeus.is_some()
    }
}

/// Read an optional base URL override, rejecting anything that is not http(s)
fn base_url_override(name: &str) -> ConfigResult<Option<String>> {
    let Some(raw) = get_optional_env(name) else {
        return Ok(None);
    };

    let parsed =
        Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(name.to_string(), e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(
            name.to_string(),
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }

    Ok(Some(raw.trim_end_matches('/').to_string()))
}
