//! Computed driving route between two coordinates

use serde::{Deserialize, Serialize};

use crate::polyline;
use crate::value_objects::Coordinate;

/// Result of a route computation for one pickup/dropoff pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Driving distance in kilometres, rounded to 2 decimals
    pub distance_km: f64,
    /// Driving duration in whole minutes
    pub duration_min: u32,
    /// Overview path in encoded polyline form (may be empty)
    pub encoded_path: String,
    /// Decoded overview path; empty means "no visual path"
    pub decoded_path: Vec<Coordinate>,
}

impl RouteResult {
    /// Build a route from raw provider metrics
    ///
    /// Distance is `meters / 1000` rounded to 2 decimals, duration is
    /// `round(seconds / 60)`. Negative inputs clamp to zero.
    #[must_use]
    pub fn from_metrics(meters: f64, seconds: f64, encoded_path: impl Into<String>) -> Self {
        let encoded_path = encoded_path.into();
        let decoded_path = polyline::decode(&encoded_path);

        let distance_km = ((meters.max(0.0) / 1000.0) * 100.0).round() / 100.0;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let duration_min = (seconds.max(0.0) / 60.0).round() as u32;

        Self {
            distance_km,
            duration_min,
            encoded_path,
            decoded_path,
        }
    }

    /// Whether a drawable path is available
    #[must_use]
    pub fn has_path(&self) -> bool {
        !self.decoded_path.is_empty()
    }

    /// Compact summary, e.g. `15.00 km · 20 min`
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{:.2} km · {} min", self.distance_km, self.duration_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_meters_and_seconds() {
        let route = RouteResult::from_metrics(15_234.0, 1_230.0, "");
        assert!((route.distance_km - 15.23).abs() < f64::EPSILON);
        assert_eq!(route.duration_min, 21);
    }

    #[test]
    fn rounds_half_minute_up() {
        let route = RouteResult::from_metrics(0.0, 90.0, "");
        assert_eq!(route.duration_min, 2);
    }

    #[test]
    fn empty_polyline_keeps_metrics() {
        let route = RouteResult::from_metrics(5_000.0, 600.0, "not a polyline");
        assert!(!route.has_path());
        assert!((route.distance_km - 5.0).abs() < f64::EPSILON);
        assert_eq!(route.duration_min, 10);
    }

    #[test]
    fn decodes_overview_path() {
        let route = RouteResult::from_metrics(1.0, 1.0, "_p~iF~ps|U_ulLnnqC");
        assert_eq!(route.decoded_path.len(), 2);
        assert!(route.has_path());
    }

    #[test]
    fn negative_metrics_clamp_to_zero() {
        let route = RouteResult::from_metrics(-10.0, -60.0, "");
        assert!(route.distance_km.abs() < f64::EPSILON);
        assert_eq!(route.duration_min, 0);
    }

    #[test]
    fn summary_format() {
        let route = RouteResult::from_metrics(15_000.0, 1_200.0, "");
        assert_eq!(route.summary(), "15.00 km · 20 min");
    }
}
