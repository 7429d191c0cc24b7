//! Great-circle distance and `"lat, lon"` coordinate text

use crate::error::{ApiError, ApiResult};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points in kilometres
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Reject coordinates outside the valid latitude/longitude range
pub fn validate_coordinates(latitude: f64, longitude: f64) -> ApiResult<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ApiError::ValidationError(format!(
            "latitude out of range: {}",
            latitude
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ApiError::ValidationError(format!(
            "longitude out of range: {}",
            longitude
        )));
    }
    Ok(())
}

/// Parse `"lat,lon"` or `"lat, lon"` into a coordinate pair
///
/// Returns `None` unless the text holds exactly two numeric parts within
/// latitude and longitude range.
pub fn parse_coordinates(text: &str) -> Option<(f64, f64)> {
    let mut parts = text.split(',');
    let lat: f64 = parts.next()?.trim().parse().ok()?;
    let lon: f64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let in_range = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon);
    in_range.then_some((lat, lon))
}

/// Render a coordinate pair the way `parse_coordinates` reads it
pub fn format_coordinates(lat: f64, lon: f64) -> String {
    format!("{}, {}", lat, lon)
}
