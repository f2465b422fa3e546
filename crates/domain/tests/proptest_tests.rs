//! Property-based tests for the polyline codec and fare composition

use domain::polyline;
use domain::{
    Coordinate, FarePolicy, RouteResult, TollQuote, VehicleId, VehicleRateCard, round2,
};
use proptest::prelude::*;

// ============================================================================
// Polyline Property Tests
// ============================================================================

mod polyline_tests {
    use super::*;

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0f64, -180.0f64..=180.0f64)
            .prop_map(|(lat, lon)| Coordinate::new_unchecked(lat, lon))
    }

    proptest! {
        #[test]
        fn round_trip_within_precision(path in prop::collection::vec(coordinate(), 0..40)) {
            let decoded = polyline::decode(&polyline::encode(&path));
            prop_assert_eq!(decoded.len(), path.len());
            for (a, b) in path.iter().zip(decoded.iter()) {
                prop_assert!((a.latitude() - b.latitude()).abs() <= 1e-5 + 1e-9);
                prop_assert!((a.longitude() - b.longitude()).abs() <= 1e-5 + 1e-9);
            }
        }

        #[test]
        fn decode_never_panics(input in "\\PC*") {
            let _ = polyline::decode(&input);
        }
    }
}

// ============================================================================
// Fare Property Tests
// ============================================================================

mod fare_tests {
    use super::*;

    fn route(distance_km: f64, duration_min: u32) -> RouteResult {
        RouteResult {
            distance_km,
            duration_min,
            encoded_path: String::new(),
            decoded_path: Vec::new(),
        }
    }

    proptest! {
        #[test]
        fn total_is_rounded_sum_and_non_negative(
            per_hour in 0.0f64..500.0,
            per_km in prop::option::of(0.0f64..20.0),
            base_fee in 0.0f64..300.0,
            distance in 0.0f64..2_000.0,
            duration in 0u32..3_000,
            toll in -50.0f64..200.0,
            hours in -5.0f64..48.0,
            per_minute in prop::option::of(0.0f64..5.0),
        ) {
            let card = VehicleRateCard {
                id: VehicleId::new("v"),
                per_hour_rate: per_hour,
                per_km_rate: per_km,
                base_fee,
            };
            let policy = FarePolicy { default_per_km_rate: 1.0, per_minute_rate: per_minute };
            let toll = TollQuote::priced(toll, "");
            let fare = policy.compose(&card, &route(distance, duration), &toll, hours);

            let hour_fare = hours.max(0.0) * per_hour;
            let distance_fare = distance * per_km.unwrap_or(1.0);
            let time_fare = per_minute.map_or(0.0, |r| f64::from(duration) * r);
            let expected = round2(base_fee + hour_fare + distance_fare + time_fare + toll.amount());

            prop_assert!((fare.total - expected).abs() < 1e-9);
            prop_assert!(fare.total >= 0.0);
            prop_assert!(fare.toll_fare >= 0.0);
        }
    }
}
