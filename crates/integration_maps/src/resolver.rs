//! Address resolution with provider fallback
//!
//! Resolution order: a literal `"lat,lon"` pair, then the primary provider,
//! then the secondary provider. No retries beyond that and no caching.

use std::sync::Arc;

use domain::Coordinate;
use tracing::{debug, info, instrument, warn};

use crate::config::MapsConfig;
use crate::error::MapsError;
use crate::geocoding::{GeocodingClient, GoogleGeocodingClient, NominatimGeocodingClient};

/// Geocode resolver with a local coordinate parser and two providers
pub struct GeocodeResolver {
    primary: Arc<dyn GeocodingClient>,
    secondary: Option<Arc<dyn GeocodingClient>>,
}

impl std::fmt::Debug for GeocodeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeResolver")
            .field("primary", &self.primary.provider_name())
            .field(
                "secondary",
                &self.secondary.as_ref().map(|s| s.provider_name()),
            )
            .finish()
    }
}

impl GeocodeResolver {
    /// Create a resolver using Nominatim first and Google second
    ///
    /// Google is left out when no API key is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients cannot be initialized.
    pub fn new(config: &MapsConfig) -> Result<Self, MapsError> {
        let primary: Arc<dyn GeocodingClient> = Arc::new(NominatimGeocodingClient::new(config)?);
        let secondary: Option<Arc<dyn GeocodingClient>> = if config.has_google_key() {
            Some(Arc::new(GoogleGeocodingClient::new(config)?))
        } else {
            warn!("No Google API key configured, geocoding uses Nominatim only");
            None
        };

        Ok(Self { primary, secondary })
    }

    /// Create a resolver from explicit providers
    #[must_use]
    pub fn from_providers(
        primary: Arc<dyn GeocodingClient>,
        secondary: Option<Arc<dyn GeocodingClient>>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Check if a secondary provider is configured
    #[must_use]
    pub const fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    /// Resolve free text or a `"lat,lon"` pair to a coordinate
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::AddressNotFound`] when the input is blank or no
    /// provider finds it.
    #[instrument(skip(self))]
    pub async fn resolve(&self, input: &str) -> Result<Coordinate, MapsError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(MapsError::AddressNotFound(
                "Address must not be empty".to_string(),
            ));
        }

        if let Some(coordinate) = Coordinate::parse_pair(input) {
            debug!(%coordinate, "Input is a coordinate pair");
            return Ok(coordinate);
        }

        match self.primary.geocode(input).await {
            Ok(coordinate) => return Ok(coordinate),
            Err(e) => {
                info!(
                    provider = self.primary.provider_name(),
                    error = %e,
                    "Primary geocoder found nothing, trying fallback"
                );
            },
        }

        if let Some(ref secondary) = self.secondary {
            match secondary.geocode(input).await {
                Ok(coordinate) => return Ok(coordinate),
                Err(e) => {
                    warn!(
                        provider = secondary.provider_name(),
                        error = %e,
                        "Fallback geocoder failed"
                    );
                },
            }
        }

        Err(MapsError::AddressNotFound(input.to_string()))
    }
}
