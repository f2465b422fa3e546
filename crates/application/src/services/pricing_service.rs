//! Pricing Service - One pricing pass for a trip
//!
//! Geocodes pickup and dropoff concurrently, computes the route, estimates the
//! toll once, then composes a fare for every vehicle in the catalog.

use std::sync::Arc;

use domain::{FarePolicy, TripDetails, TripQuote, VehicleFare};
use tracing::{debug, info, instrument};

use crate::{
    error::ApplicationError,
    ports::{GeocodingPort, RoutePort, TollPort, VehicleCatalogPort},
};

/// Service that prices a trip for every catalog vehicle
pub struct PricingService {
    geocoder: Arc<dyn GeocodingPort>,
    router: Arc<dyn RoutePort>,
    tolls: Arc<dyn TollPort>,
    catalog: Arc<dyn VehicleCatalogPort>,
    policy: FarePolicy,
}

impl std::fmt::Debug for PricingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricingService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PricingService {
    /// Create a pricing service with the default fare policy
    pub fn new(
        geocoder: Arc<dyn GeocodingPort>,
        router: Arc<dyn RoutePort>,
        tolls: Arc<dyn TollPort>,
        catalog: Arc<dyn VehicleCatalogPort>,
    ) -> Self {
        Self {
            geocoder,
            router,
            tolls,
            catalog,
            policy: FarePolicy::default(),
        }
    }

    /// Replace the fare policy
    #[must_use]
    pub const fn with_policy(mut self, policy: FarePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fare policy in use
    pub const fn policy(&self) -> &FarePolicy {
        &self.policy
    }

    /// Run one pricing pass
    ///
    /// Geocode and route failures abort the pass. Toll failures never do;
    /// they show up as a zero toll on every fare.
    #[instrument(skip(self, trip), fields(pickup = %trip.pickup, dropoff = %trip.dropoff))]
    pub async fn quote(&self, trip: &TripDetails) -> Result<TripQuote, ApplicationError> {
        let (pickup, dropoff) = futures::try_join!(
            self.geocoder.geocode(&trip.pickup),
            self.geocoder.geocode(&trip.dropoff),
        )?;
        debug!(%pickup, %dropoff, "Resolved trip endpoints");

        let route = self.router.route(&pickup, &dropoff).await?;
        if !route.has_path() {
            debug!("Route has no drawable path");
        }

        let toll = self.tolls.estimate(&pickup, &dropoff, &route).await;
        if toll.classification.is_degraded() {
            debug!(classification = %toll.classification, "Toll estimate degraded to zero");
        }

        let vehicles = self.catalog.list_vehicles().await?;
        let hours = trip.billable_hours();
        let route_summary = route.summary();

        let fares: Vec<VehicleFare> = vehicles
            .into_iter()
            .map(|vehicle| {
                let fare = self
                    .policy
                    .compose(&vehicle.rate_card(), &route, &toll, hours);
                VehicleFare {
                    vehicle,
                    fare,
                    route_summary: route_summary.clone(),
                }
            })
            .collect();

        info!(
            distance_km = route.distance_km,
            duration_min = route.duration_min,
            toll = toll.amount(),
            vehicles = fares.len(),
            "Priced trip"
        );

        Ok(TripQuote {
            pickup,
            dropoff,
            route,
            toll,
            fares,
        })
    }
}

#[cfg(test)]
mod tests {
    use domain::{Coordinate, RouteResult, TollClassification, TollQuote, Vehicle};

    use super::*;
    use crate::ports::{
        MockGeocodingPort, MockRoutePort, MockTollPort, MockVehicleCatalogPort,
    };

    fn trip() -> TripDetails {
        TripDetails::new(
            "24.86,67.00",
            "24.90,67.10",
            chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            "10:30",
        )
        .with_hours(2.0)
    }

    fn geocoder() -> MockGeocodingPort {
        let mut geo = MockGeocodingPort::new();
        geo.expect_geocode()
            .times(2)
            .returning(|input| Ok(Coordinate::parse_pair(input).unwrap()));
        geo
    }

    fn router() -> MockRoutePort {
        let mut router = MockRoutePort::new();
        router.expect_route().times(1).returning(|_, _| {
            Ok(RouteResult {
                distance_km: 15.0,
                duration_min: 20,
                encoded_path: String::new(),
                decoded_path: Vec::new(),
            })
        });
        router
    }

    fn catalog(vehicles: Vec<Vehicle>) -> MockVehicleCatalogPort {
        let mut catalog = MockVehicleCatalogPort::new();
        catalog
            .expect_list_vehicles()
            .returning(move || Ok(vehicles.clone()));
        catalog
    }

    fn fleet() -> Vec<Vehicle> {
        vec![
            Vehicle::new("sedan", "Sedan", 10.0)
                .with_per_km_rate(1.0)
                .with_base_fee(100.0),
            Vehicle::new("van", "Van", 20.0).with_base_fee(50.0),
        ]
    }

    #[tokio::test]
    async fn reference_trip_prices_every_vehicle() {
        let mut tolls = MockTollPort::new();
        tolls
            .expect_estimate()
            .times(1)
            .returning(|_, _, _| TollQuote::priced(5.0, "{\"total_cost\":5}"));

        let service = PricingService::new(
            Arc::new(geocoder()),
            Arc::new(router()),
            Arc::new(tolls),
            Arc::new(catalog(fleet())),
        );

        let quote = service.quote(&trip()).await.unwrap();

        assert_eq!(quote.fares.len(), 2);
        let sedan = &quote.fares[0];
        assert!((sedan.fare.hour_fare - 20.0).abs() < f64::EPSILON);
        assert!((sedan.fare.distance_fare - 15.0).abs() < f64::EPSILON);
        assert!((sedan.fare.toll_fare - 5.0).abs() < f64::EPSILON);
        assert!((sedan.fare.total - 140.0).abs() < f64::EPSILON);
        assert_eq!(sedan.route_summary, "15.00 km · 20 min");

        // default per-km rate applies to the van
        let van = &quote.fares[1];
        assert!((van.fare.total - (50.0 + 40.0 + 15.0 + 5.0)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn geocode_failure_blocks_pass() {
        let mut geo = MockGeocodingPort::new();
        geo.expect_geocode()
            .returning(|input| Err(ApplicationError::Geocode(input.to_string())));
        let mut router = MockRoutePort::new();
        router.expect_route().never();
        let mut tolls = MockTollPort::new();
        tolls.expect_estimate().never();

        let service = PricingService::new(
            Arc::new(geo),
            Arc::new(router),
            Arc::new(tolls),
            Arc::new(catalog(fleet())),
        );

        let err = service.quote(&trip()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Geocode(_)));
    }

    #[tokio::test]
    async fn route_failure_blocks_pass() {
        let mut router = MockRoutePort::new();
        router
            .expect_route()
            .returning(|_, _| Err(ApplicationError::Route("ZERO_RESULTS".into())));
        let mut tolls = MockTollPort::new();
        tolls.expect_estimate().never();

        let service = PricingService::new(
            Arc::new(geocoder()),
            Arc::new(router),
            Arc::new(tolls),
            Arc::new(catalog(fleet())),
        );

        let err = service.quote(&trip()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Route(_)));
    }

    #[tokio::test]
    async fn degraded_toll_prices_with_zero() {
        let mut tolls = MockTollPort::new();
        tolls
            .expect_estimate()
            .times(1)
            .returning(|_, _, _| TollQuote::zero(TollClassification::QuotaExceeded, "403"));

        let service = PricingService::new(
            Arc::new(geocoder()),
            Arc::new(router()),
            Arc::new(tolls),
            Arc::new(catalog(fleet())),
        );

        let quote = service.quote(&trip()).await.unwrap();
        assert_eq!(quote.toll.classification, TollClassification::QuotaExceeded);
        assert!(quote.fares.iter().all(|f| f.fare.toll_fare.abs() < f64::EPSILON));
        assert!((quote.fares[0].fare.total - 135.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn time_fare_policy_is_applied() {
        let mut tolls = MockTollPort::new();
        tolls
            .expect_estimate()
            .returning(|_, _, _| TollQuote::priced(5.0, ""));

        let service = PricingService::new(
            Arc::new(geocoder()),
            Arc::new(router()),
            Arc::new(tolls),
            Arc::new(catalog(fleet())),
        )
        .with_policy(FarePolicy::default().with_per_minute_rate(0.5));

        let quote = service.quote(&trip()).await.unwrap();
        assert!((quote.fares[0].fare.total - 150.0).abs() < f64::EPSILON);
    }
}
