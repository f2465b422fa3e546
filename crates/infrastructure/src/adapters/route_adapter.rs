//! Route adapter - Implements RoutePort using integration_maps

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::RoutePort;
use async_trait::async_trait;
use domain::{Coordinate, RouteResult};
use integration_maps::{DirectionsClient, GoogleDirectionsClient, MapsConfig, MapsError};
use tracing::instrument;

/// Adapter computing driving routes through the Google Directions API
pub struct RouteAdapter {
    client: Arc<dyn DirectionsClient>,
}

impl std::fmt::Debug for RouteAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteAdapter").finish_non_exhaustive()
    }
}

impl RouteAdapter {
    /// Create a new adapter with the given configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no Google API key is set.
    pub fn new(config: &MapsConfig) -> Result<Self, ApplicationError> {
        let client = GoogleDirectionsClient::new(config).map_err(Self::map_error)?;
        Ok(Self::from_client(Arc::new(client)))
    }

    /// Create an adapter around any directions client
    #[must_use]
    pub fn from_client(client: Arc<dyn DirectionsClient>) -> Self {
        Self { client }
    }

    fn map_error(err: MapsError) -> ApplicationError {
        match err {
            MapsError::ConfigurationError(e) => ApplicationError::Configuration(e),
            other => ApplicationError::Route(other.to_string()),
        }
    }
}

#[async_trait]
impl RoutePort for RouteAdapter {
    #[instrument(skip(self))]
    async fn route(
        &self,
        from: &Coordinate,
        to: &Coordinate,
    ) -> Result<RouteResult, ApplicationError> {
        self.client.route(from, to).await.map_err(Self::map_error)
    }
}
