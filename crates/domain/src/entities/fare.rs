//! Fare composition
//!
//! Combines a vehicle rate card, route metrics, and a toll estimate into an
//! itemized fare. Components are rounded for display; the total is rounded
//! once from the unrounded sum so rounding error does not compound.

use serde::{Deserialize, Serialize};

use super::{RouteResult, TollQuote, VehicleRateCard};

/// Per-kilometre rate used when a vehicle has none
pub const DEFAULT_PER_KM_RATE: f64 = 1.0;

/// Round half-up to 2 decimals
///
/// The epsilon nudge keeps values like `1.005` from rounding down because of
/// their binary representation.
#[must_use]
pub fn round2(value: f64) -> f64 {
    ((value + f64::EPSILON) * 100.0).round() / 100.0
}

/// Itemized fare for one vehicle on one route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FareBreakdown {
    /// Flat vehicle fee
    pub base_fee: f64,
    /// `hours * per_hour_rate`
    pub hour_fare: f64,
    /// `distance_km * per_km_rate`
    pub distance_fare: f64,
    /// `duration_min * per_minute_rate` (zero unless time is charged)
    pub time_fare: f64,
    /// Route toll, identical for every vehicle in a pricing pass
    pub toll_fare: f64,
    /// Sum of all components, rounded once
    pub total: f64,
}

impl FareBreakdown {
    /// The portion of the fare that is not toll or base fee
    #[must_use]
    pub fn trip_fare(&self) -> f64 {
        round2(self.hour_fare + self.distance_fare)
    }
}

/// Pricing parameters that apply to every vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FarePolicy {
    /// Per-kilometre rate for vehicles without their own
    pub default_per_km_rate: f64,
    /// Per-minute rate; `None` disables the time fare
    pub per_minute_rate: Option<f64>,
}

impl Default for FarePolicy {
    fn default() -> Self {
        Self {
            default_per_km_rate: DEFAULT_PER_KM_RATE,
            per_minute_rate: None,
        }
    }
}

impl FarePolicy {
    /// Enable charging by route duration
    #[must_use]
    pub const fn with_per_minute_rate(mut self, rate: f64) -> Self {
        self.per_minute_rate = Some(rate);
        self
    }

    /// Compose the fare for one vehicle
    ///
    /// Pure; call once per candidate vehicle with the same toll quote.
    #[must_use]
    pub fn compose(
        &self,
        vehicle: &VehicleRateCard,
        route: &RouteResult,
        toll: &TollQuote,
        hours: f64,
    ) -> FareBreakdown {
        let base_fee = vehicle.base_fee.max(0.0);
        let hour_fare = hours.max(0.0) * vehicle.per_hour_rate;
        let per_km = vehicle.per_km_rate.unwrap_or(self.default_per_km_rate);
        let distance_fare = route.distance_km.max(0.0) * per_km;
        let time_fare = self
            .per_minute_rate
            .map_or(0.0, |rate| f64::from(route.duration_min) * rate);
        let toll_fare = toll.amount();

        let total = round2((base_fee + hour_fare + distance_fare + time_fare + toll_fare).max(0.0));

        FareBreakdown {
            base_fee: round2(base_fee),
            hour_fare: round2(hour_fare),
            distance_fare: round2(distance_fare),
            time_fare: round2(time_fare),
            toll_fare: round2(toll_fare),
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TollClassification, VehicleId};

    fn card(per_hour: f64, per_km: Option<f64>, base_fee: f64) -> VehicleRateCard {
        VehicleRateCard {
            id: VehicleId::new("v1"),
            per_hour_rate: per_hour,
            per_km_rate: per_km,
            base_fee,
        }
    }

    fn route(distance_km: f64, duration_min: u32) -> RouteResult {
        RouteResult {
            distance_km,
            duration_min,
            encoded_path: String::new(),
            decoded_path: Vec::new(),
        }
    }

    #[test]
    fn reference_trip_totals_140() {
        let fare = FarePolicy::default().compose(
            &card(10.0, Some(1.0), 100.0),
            &route(15.0, 20),
            &TollQuote::priced(5.0, ""),
            2.0,
        );

        assert!((fare.hour_fare - 20.0).abs() < f64::EPSILON);
        assert!((fare.distance_fare - 15.0).abs() < f64::EPSILON);
        assert!((fare.toll_fare - 5.0).abs() < f64::EPSILON);
        assert!(fare.time_fare.abs() < f64::EPSILON);
        assert!((fare.total - 140.0).abs() < f64::EPSILON);
    }

    #[test]
    fn time_fare_variant_adds_duration_charge() {
        let policy = FarePolicy::default().with_per_minute_rate(0.5);
        let fare = policy.compose(
            &card(10.0, Some(1.0), 100.0),
            &route(15.0, 20),
            &TollQuote::priced(5.0, ""),
            2.0,
        );
        assert!((fare.time_fare - 10.0).abs() < f64::EPSILON);
        assert!((fare.total - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_per_km_rate_uses_default() {
        let fare = FarePolicy::default().compose(
            &card(0.0, None, 0.0),
            &route(12.5, 0),
            &TollQuote::zero(TollClassification::Disabled, ""),
            0.0,
        );
        assert!((fare.distance_fare - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn negative_hours_clamp_to_zero() {
        let fare = FarePolicy::default().compose(
            &card(50.0, Some(0.0), 0.0),
            &route(0.0, 0),
            &TollQuote::zero(TollClassification::Ok, ""),
            -3.0,
        );
        assert!(fare.hour_fare.abs() < f64::EPSILON);
        assert!(fare.total.abs() < f64::EPSILON);
    }

    #[test]
    fn total_uses_unrounded_sum() {
        // 3 x 0.333 per component rounds to 0.33 each (0.99 summed), but the
        // unrounded sum 0.999 rounds to 1.00
        let fare = FarePolicy::default().compose(
            &card(0.333, Some(0.333), 0.0),
            &route(1.0, 0),
            &TollQuote::priced(0.333, ""),
            1.0,
        );
        assert!((fare.hour_fare - 0.33).abs() < 1e-9);
        assert!((fare.distance_fare - 0.33).abs() < 1e-9);
        assert!((fare.toll_fare - 0.33).abs() < 1e-9);
        assert!((fare.total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn round2_is_half_up() {
        assert!((round2(1.005) - 1.01).abs() < 1e-9);
        assert!((round2(0.125) - 0.13).abs() < 1e-9);
        assert!((round2(140.0) - 140.0).abs() < 1e-9);
    }

    #[test]
    fn trip_fare_excludes_toll_and_base() {
        let fare = FarePolicy::default().compose(
            &card(10.0, Some(1.0), 100.0),
            &route(15.0, 20),
            &TollQuote::priced(5.0, ""),
            2.0,
        );
        assert!((fare.trip_fare() - 35.0).abs() < f64::EPSILON);
    }
}
