//! Google Geocoding response models

use serde::{Deserialize, Serialize};

/// A point on the globe in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check both components are finite and inside their valid ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<RawResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawResult {
    pub formatted_address: Option<String>,
    pub geometry: RawGeometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGeometry {
    pub location: RawLatLng,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<&RawLatLng> for Coordinates {
    fn from(raw: &RawLatLng) -> Self {
        Self::new(raw.lat, raw.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinates::new(42.36, -71.06).is_valid());
        assert!(Coordinates::new(-90.0, 180.0).is_valid());
        assert!(!Coordinates::new(90.5, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_response_parsing() {
        let response: GeocodeResponse = serde_json::from_value(serde_json::json!({
            "status": "OK",
            "results": [{
                "formatted_address": "Boston, MA, USA",
                "geometry": { "location": { "lat": 42.3600825, "lng": -71.0588801 } }
            }]
        }))
        .unwrap();

        assert_eq!(response.status, "OK");
        let coords: Coordinates = (&response.results[0].geometry.location).into();
        assert_eq!(coords, Coordinates::new(42.3600825, -71.0588801));
    }
}
