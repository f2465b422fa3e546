//! Raw provider response shapes
//!
//! Only the fields the pipeline consumes are modelled; everything else is
//! ignored during deserialization.

use serde::Deserialize;

/// One Nominatim search hit
#[derive(Debug, Deserialize)]
pub(crate) struct NominatimResult {
    pub lat: String,
    pub lon: String,
}

/// Google geocoding response
#[derive(Debug, Deserialize)]
pub(crate) struct GoogleGeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GoogleGeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleGeocodeResult {
    pub geometry: GoogleGeometry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleGeometry {
    pub location: GoogleLatLng,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GoogleLatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Google directions response
#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsRoute {
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
    #[serde(default)]
    pub overview_polyline: Option<OverviewPolyline>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsLeg {
    pub distance: TextValue,
    pub duration: TextValue,
}

/// `{ "text": "15 km", "value": 15000 }`
#[derive(Debug, Deserialize)]
pub(crate) struct TextValue {
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverviewPolyline {
    #[serde(default)]
    pub points: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions_parsing_ignores_extra_fields() {
        let json = r#"{
            "status": "OK",
            "geocoded_waypoints": [],
            "routes": [{
                "summary": "M-9",
                "legs": [{
                    "distance": {"text": "15.0 km", "value": 15000},
                    "duration": {"text": "20 mins", "value": 1200},
                    "steps": []
                }],
                "overview_polyline": {"points": "_p~iF~ps|U"}
            }]
        }"#;
        let response: DirectionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "OK");
        let leg = &response.routes[0].legs[0];
        assert!((leg.distance.value - 15000.0).abs() < f64::EPSILON);
        assert!((leg.duration.value - 1200.0).abs() < f64::EPSILON);
        assert_eq!(
            response.routes[0].overview_polyline.as_ref().unwrap().points,
            "_p~iF~ps|U"
        );
    }

    #[test]
    fn test_google_geocode_zero_results() {
        let json = r#"{"status": "ZERO_RESULTS", "results": []}"#;
        let response: GoogleGeocodeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "ZERO_RESULTS");
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_nominatim_result_parsing() {
        let json = r#"[{"lat": "24.8607", "lon": "67.0011", "display_name": "Karachi"}]"#;
        let results: Vec<NominatimResult> = serde_json::from_str(json).unwrap();
        assert_eq!(results[0].lat, "24.8607");
    }
}
