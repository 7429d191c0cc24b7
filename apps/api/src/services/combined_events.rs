//! Event aggregation across Ticketmaster, Yelp, Amadeus and host events
//!
//! One run fans out to every configured upstream concurrently, normalizes
//! the records into [`CombinedEvent`]s, fills in missing coordinates or
//! addresses through the geocoder and measures each event's distance from
//! the caller's origin.

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};
use ventaura_amadeus_client::{AmadeusActivity, AmadeusClient};
use ventaura_geocoding_client::GeocodingClient;
use ventaura_shared_config::ProvidersConfig;
use ventaura_ticketmaster_client::{TicketmasterClient, TicketmasterEvent};
use ventaura_yelp_client::{YelpClient, YelpEvent};

use crate::error::ApiResult;
use crate::models::{AggregationResult, CombinedEvent, EventSource, HostEvent};
use crate::repositories::HostEventRepository;
use crate::services::categories::{canonical_type, ticketmaster_type};
use crate::services::distance::{
    format_coordinates, haversine_km, parse_coordinates, validate_coordinates,
};

pub const TICKETMASTER_RADIUS_MILES: u32 = 20;
pub const YELP_RADIUS_METERS: u32 = 40_000;
pub const AMADEUS_RADIUS_KM: u32 = 20;

/// A normalized record whose location may still need geocoding
#[derive(Debug, Clone, PartialEq)]
struct PendingEvent {
    title: String,
    description: Option<String>,
    coordinates: Option<(f64, f64)>,
    address: Option<String>,
    start: Option<chrono::DateTime<chrono::Utc>>,
    source: EventSource,
    event_type: String,
    currency_code: Option<String>,
    amount: Option<f64>,
    url: Option<String>,
}

impl PendingEvent {
    fn finish(self, (latitude, longitude): (f64, f64), origin: (f64, f64)) -> CombinedEvent {
        CombinedEvent {
            title: self.title,
            description: self.description,
            location: format_coordinates(latitude, longitude),
            latitude,
            longitude,
            address: self.address,
            start: self.start,
            source: self.source,
            event_type: self.event_type,
            currency_code: self.currency_code,
            amount: self.amount,
            url: self.url,
            distance_km: haversine_km(origin.0, origin.1, latitude, longitude),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn zip_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Option<(f64, f64)> {
    latitude
        .zip(longitude)
        .filter(|(lat, lon)| validate_coordinates(*lat, *lon).is_ok())
}

fn from_ticketmaster(event: TicketmasterEvent) -> PendingEvent {
    PendingEvent {
        coordinates: zip_coordinates(event.latitude, event.longitude),
        event_type: ticketmaster_type(event.genre.as_deref(), event.segment.as_deref())
            .to_string(),
        title: event.name,
        description: non_blank(event.description),
        address: non_blank(event.address),
        start: event.start,
        source: EventSource::Ticketmaster,
        currency_code: event.currency,
        amount: event.min_price,
        url: event.url,
    }
}

fn from_yelp(event: YelpEvent) -> PendingEvent {
    PendingEvent {
        coordinates: zip_coordinates(event.latitude, event.longitude),
        event_type: canonical_type(&event.category).to_string(),
        title: event.name,
        description: non_blank(event.description),
        address: non_blank(event.address),
        start: event.start,
        source: EventSource::Yelp,
        currency_code: Some(event.currency),
        amount: event.cost,
        url: event.url,
    }
}

fn from_amadeus(activity: AmadeusActivity) -> PendingEvent {
    PendingEvent {
        coordinates: zip_coordinates(activity.latitude, activity.longitude),
        title: activity.name,
        description: non_blank(Some(activity.description)),
        address: None,
        start: None,
        source: EventSource::Amadeus,
        event_type: "Tours".to_string(),
        currency_code: Some(activity.currency),
        amount: activity.amount,
        url: activity.booking_link,
    }
}

/// A host's `location` is either `"lat, lon"` or a free-text address
fn from_host(event: HostEvent) -> PendingEvent {
    let location = non_blank(event.location);
    let coordinates = location.as_deref().and_then(parse_coordinates);
    let address = if coordinates.is_some() { None } else { location };

    PendingEvent {
        coordinates,
        address,
        event_type: canonical_type(&event.event_type).to_string(),
        title: event.title,
        description: non_blank(event.description),
        start: event.start,
        source: EventSource::Host,
        currency_code: event.currency_code,
        amount: event.amount,
        url: event.url,
    }
}

/// Per-run lookup caches so repeated venues cost one geocoder call
#[derive(Default)]
struct GeocodeCache {
    forward: HashMap<String, Option<(f64, f64)>>,
    reverse: HashMap<String, Option<String>>,
}

/// Aggregates events from every configured source
#[derive(Clone)]
pub struct CombinedEventsService {
    ticketmaster: Option<TicketmasterClient>,
    yelp: Option<YelpClient>,
    amadeus: Option<AmadeusClient>,
    geocoder: Option<GeocodingClient>,
    host_events: HostEventRepository,
    reverse_geocode: bool,
}

impl CombinedEventsService {
    pub fn new(host_events: HostEventRepository) -> Self {
        Self {
            ticketmaster: None,
            yelp: None,
            amadeus: None,
            geocoder: None,
            host_events,
            reverse_geocode: false,
        }
    }

    /// Build clients for every provider that has credentials
    pub fn from_config(
        providers: &ProvidersConfig,
        host_events: HostEventRepository,
    ) -> ApiResult<Self> {
        let ticketmaster = providers
            .ticketmaster_api_key
            .as_deref()
            .map(|key| match &providers.ticketmaster_base_url {
                Some(url) => TicketmasterClient::with_base_url(key, url.as_str()),
                None => TicketmasterClient::new(key),
            })
            .transpose()?;

        let yelp = providers
            .yelp_api_key
            .as_deref()
            .map(|key| match &providers.yelp_base_url {
                Some(url) => YelpClient::with_base_url(key, url.as_str()),
                None => YelpClient::new(key),
            })
            .transpose()?;

        let amadeus = providers
            .amadeus
            .as_ref()
            .map(|creds| match &providers.amadeus_base_url {
                Some(url) => AmadeusClient::with_base_url(
                    creds.client_id.as_str(),
                    creds.client_secret.as_str(),
                    url.as_str(),
                ),
                None => AmadeusClient::new(creds.client_id.as_str(), creds.client_secret.as_str()),
            })
            .transpose()?;

        let geocoder = providers
            .google_geocoding_api_key
            .as_deref()
            .map(|key| match &providers.geocoding_base_url {
                Some(url) => GeocodingClient::with_base_url(key, url.as_str()),
                None => GeocodingClient::new(key),
            })
            .transpose()?;

        info!(
            ticketmaster = ticketmaster.is_some(),
            yelp = yelp.is_some(),
            amadeus = amadeus.is_some(),
            geocoding = geocoder.is_some(),
            "Configured event sources"
        );

        Ok(Self {
            ticketmaster,
            yelp,
            amadeus,
            geocoder,
            host_events,
            reverse_geocode: providers.reverse_geocode,
        })
    }

    pub fn with_ticketmaster(mut self, client: TicketmasterClient) -> Self {
        self.ticketmaster = Some(client);
        self
    }

    pub fn with_yelp(mut self, client: YelpClient) -> Self {
        self.yelp = Some(client);
        self
    }

    pub fn with_amadeus(mut self, client: AmadeusClient) -> Self {
        self.amadeus = Some(client);
        self
    }

    pub fn with_geocoder(mut self, client: GeocodingClient, reverse_geocode: bool) -> Self {
        self.geocoder = Some(client);
        self.reverse_geocode = reverse_geocode;
        self
    }

    /// Geocode a free-text place name, such as a city
    ///
    /// Returns `Ok(None)` when no geocoder is configured or nothing matched.
    pub async fn geocode(&self, address: &str) -> ApiResult<Option<(f64, f64)>> {
        let Some(geocoder) = &self.geocoder else {
            return Ok(None);
        };

        Ok(geocoder
            .geocode(address)
            .await?
            .map(|c| (c.latitude, c.longitude)))
    }

    /// Aggregate events around the user's own location
    pub async fn fetch_for_user(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> ApiResult<AggregationResult> {
        self.fetch_around((latitude, longitude), (latitude, longitude))
            .await
    }

    /// Aggregate events around `center`, measuring distances from `origin`
    #[instrument(skip(self))]
    pub async fn fetch_around(
        &self,
        center: (f64, f64),
        origin: (f64, f64),
    ) -> ApiResult<AggregationResult> {
        validate_coordinates(center.0, center.1)?;
        validate_coordinates(origin.0, origin.1)?;

        let (ticketmaster, yelp, amadeus, host) = tokio::join!(
            self.fetch_ticketmaster(center),
            self.fetch_yelp(center),
            self.fetch_amadeus(center),
            self.fetch_host_events(),
        );

        let mut result = AggregationResult::default();
        let mut pending = Vec::new();

        for (source, outcome) in [
            (EventSource::Ticketmaster, ticketmaster),
            (EventSource::Yelp, yelp),
            (EventSource::Amadeus, amadeus),
            (EventSource::Host, host),
        ] {
            match outcome {
                Ok(events) => {
                    debug!(%source, event_count = events.len(), "Fetched events");
                    pending.extend(events);
                }
                Err(e) => {
                    warn!(%source, error = %e, "Event source failed, continuing without it");
                    result.failed_sources.push(source);
                }
            }
        }

        let mut cache = GeocodeCache::default();
        for event in pending {
            let event = self.resolve_location(event, &mut cache).await;
            match event.coordinates {
                Some(coords) => result.events.push(event.finish(coords, origin)),
                None => {
                    debug!(
                        title = %event.title,
                        source = %event.source,
                        "Skipping event without coordinates"
                    );
                    result.skipped += 1;
                }
            }
        }

        info!(
            event_count = result.events.len(),
            skipped = result.skipped,
            failed_sources = result.failed_sources.len(),
            "Aggregated events"
        );

        Ok(result)
    }

    async fn fetch_ticketmaster(&self, (lat, lon): (f64, f64)) -> ApiResult<Vec<PendingEvent>> {
        let Some(client) = &self.ticketmaster else {
            return Ok(Vec::new());
        };
        let events = client
            .search_events(lat, lon, TICKETMASTER_RADIUS_MILES)
            .await?;
        Ok(events.into_iter().map(from_ticketmaster).collect())
    }

    async fn fetch_yelp(&self, (lat, lon): (f64, f64)) -> ApiResult<Vec<PendingEvent>> {
        let Some(client) = &self.yelp else {
            return Ok(Vec::new());
        };
        let events = client.search_events(lat, lon, YELP_RADIUS_METERS).await?;
        Ok(events.into_iter().map(from_yelp).collect())
    }

    async fn fetch_amadeus(&self, (lat, lon): (f64, f64)) -> ApiResult<Vec<PendingEvent>> {
        let Some(client) = &self.amadeus else {
            return Ok(Vec::new());
        };
        let activities = client
            .search_activities(lat, lon, AMADEUS_RADIUS_KM)
            .await?;
        Ok(activities.into_iter().map(from_amadeus).collect())
    }

    async fn fetch_host_events(&self) -> ApiResult<Vec<PendingEvent>> {
        let events = self.host_events.list_all().await?;
        Ok(events.into_iter().map(from_host).collect())
    }

    /// Fill in whichever of coordinates or address is missing
    ///
    /// Lookup failures leave the field empty; they never fail the run.
    async fn resolve_location(
        &self,
        mut event: PendingEvent,
        cache: &mut GeocodeCache,
    ) -> PendingEvent {
        let Some(geocoder) = &self.geocoder else {
            return event;
        };

        match (event.coordinates, event.address.clone()) {
            (None, Some(address)) => {
                let key = address.to_lowercase();
                if let Some(cached) = cache.forward.get(&key) {
                    event.coordinates = *cached;
                    return event;
                }

                let coords = match geocoder.geocode(&address).await {
                    Ok(found) => found.map(|c| (c.latitude, c.longitude)),
                    Err(e) => {
                        warn!(source = %event.source, error = %e, "Geocoding failed");
                        None
                    }
                };
                cache.forward.insert(key, coords);
                event.coordinates = coords;
            }
            (Some((lat, lon)), None) if self.reverse_geocode => {
                let key = format_coordinates(lat, lon);
                if let Some(cached) = cache.reverse.get(&key) {
                    event.address = cached.clone();
                    return event;
                }

                let address = match geocoder.reverse_geocode(lat, lon).await {
                    Ok(found) => found,
                    Err(e) => {
                        warn!(source = %event.source, error = %e, "Reverse geocoding failed");
                        None
                    }
                };
                cache.reverse.insert(key, address.clone());
                event.address = address;
            }
            _ => {}
        }

        event
    }
}
