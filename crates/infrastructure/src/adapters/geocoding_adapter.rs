//! Geocoding adapter - Implements GeocodingPort using integration_maps

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::Coordinate;
use integration_maps::{GeocodeResolver, MapsConfig, MapsError};
use tracing::instrument;

/// Adapter resolving addresses through Nominatim with Google fallback
#[derive(Debug, Clone)]
pub struct GeocodingAdapter {
    resolver: Arc<GeocodeResolver>,
}

impl GeocodingAdapter {
    /// Create a new adapter with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients fail to initialize.
    pub fn new(config: &MapsConfig) -> Result<Self, ApplicationError> {
        let resolver = GeocodeResolver::new(config).map_err(Self::map_error)?;
        Ok(Self::from_resolver(Arc::new(resolver)))
    }

    /// Create an adapter around an existing resolver
    #[must_use]
    pub const fn from_resolver(resolver: Arc<GeocodeResolver>) -> Self {
        Self { resolver }
    }

    /// Map a maps error to an application error
    fn map_error(err: MapsError) -> ApplicationError {
        match err {
            MapsError::ConfigurationError(e) => ApplicationError::Configuration(e),
            MapsError::AddressNotFound(address) => ApplicationError::Geocode(address),
            other => ApplicationError::Geocode(other.to_string()),
        }
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn geocode(&self, input: &str) -> Result<Coordinate, ApplicationError> {
        self.resolver.resolve(input).await.map_err(Self::map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_not_found_maps_to_geocode() {
        let err = GeocodingAdapter::map_error(MapsError::AddressNotFound("Atlantis".into()));
        assert!(matches!(err, ApplicationError::Geocode(ref a) if a == "Atlantis"));
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "Could not find location: Atlantis");
    }

    #[test]
    fn transport_errors_map_to_geocode() {
        let err = GeocodingAdapter::map_error(MapsError::Timeout { timeout_secs: 5 });
        assert!(matches!(err, ApplicationError::Geocode(_)));
    }

    #[tokio::test]
    async fn coordinate_pair_resolves_locally() {
        let adapter = GeocodingAdapter::new(&MapsConfig::for_testing()).unwrap();
        let coordinate = adapter.geocode("24.86,67.00").await.unwrap();
        assert!((coordinate.latitude() - 24.86).abs() < f64::EPSILON);
    }
}
