//! Toll adapter - Implements TollPort using integration_tolls

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::TollPort;
use async_trait::async_trait;
use domain::{Coordinate, RouteResult, TollQuote};
use integration_tolls::{TollConfig, TollEstimator, TollGuruClient, TollRequest, TollSessionState};
use tracing::{debug, instrument};

/// Adapter estimating route tolls through TollGuru
pub struct TollAdapter {
    estimator: Arc<dyn TollEstimator>,
}

impl std::fmt::Debug for TollAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TollAdapter").finish_non_exhaustive()
    }
}

impl TollAdapter {
    /// Create a new adapter sharing the given session state
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// fails to initialize.
    pub fn new(config: TollConfig, session: Arc<TollSessionState>) -> Result<Self, ApplicationError> {
        let client = TollGuruClient::new(config, session)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::from_estimator(Arc::new(client)))
    }

    /// Create an adapter around any estimator
    #[must_use]
    pub fn from_estimator(estimator: Arc<dyn TollEstimator>) -> Self {
        Self { estimator }
    }
}

#[async_trait]
impl TollPort for TollAdapter {
    #[instrument(skip(self, route), fields(distance_km = route.distance_km))]
    async fn estimate(&self, from: &Coordinate, to: &Coordinate, route: &RouteResult) -> TollQuote {
        let request = TollRequest::new(*from, *to, route.encoded_path.clone());
        let quote = self.estimator.estimate(&request).await;
        debug!(
            amount = quote.amount(),
            classification = %quote.classification,
            "Toll estimated"
        );
        quote
    }
}

#[cfg(test)]
mod tests {
    use domain::TollClassification;

    use super::*;

    struct FixedEstimator(f64);

    #[async_trait]
    impl TollEstimator for FixedEstimator {
        async fn estimate(&self, request: &TollRequest) -> TollQuote {
            assert_eq!(request.encoded_polyline.as_deref(), Some("_p~iF~ps|U"));
            TollQuote::priced(self.0, "{}")
        }
    }

    #[tokio::test]
    async fn passes_route_polyline() {
        let adapter = TollAdapter::from_estimator(Arc::new(FixedEstimator(5.0)));
        let route = RouteResult::from_metrics(15_000.0, 1_200.0, "_p~iF~ps|U");
        let quote = adapter
            .estimate(
                &Coordinate::new_unchecked(24.86, 67.0),
                &Coordinate::new_unchecked(24.9, 67.1),
                &route,
            )
            .await;
        assert!((quote.amount() - 5.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn disabled_config_yields_disabled_quote() {
        let config = TollConfig {
            enabled: false,
            ..TollConfig::for_testing()
        };
        let adapter = TollAdapter::new(config, Arc::new(TollSessionState::new())).unwrap();
        let route = RouteResult::from_metrics(15_000.0, 1_200.0, "");
        let quote = adapter
            .estimate(
                &Coordinate::new_unchecked(24.86, 67.0),
                &Coordinate::new_unchecked(24.9, 67.1),
                &route,
            )
            .await;
        assert_eq!(quote.classification, TollClassification::Disabled);
    }
}
