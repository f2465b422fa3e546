//! Geocoding clients
//!
//! [`NominatimGeocodingClient`] queries OpenStreetMap's Nominatim and spaces
//! its requests per the Nominatim usage policy. [`GoogleGeocodingClient`]
//! queries the Google geocoding API and needs an API key. Neither caches:
//! every call goes to the network.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::Coordinate;
use reqwest::Client;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::config::MapsConfig;
use crate::error::MapsError;
use crate::models::{GoogleGeocodeResponse, NominatimResult};

/// Trait for geocoding providers
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Convert a free-form address to coordinates
    async fn geocode(&self, address: &str) -> Result<Coordinate, MapsError>;

    /// Provider name for diagnostics
    fn provider_name(&self) -> &'static str;
}

fn to_coordinate(lat: f64, lon: f64) -> Result<Coordinate, MapsError> {
    Coordinate::new(lat, lon).map_err(|e| MapsError::ParseError(e.to_string()))
}

/// Nominatim-based geocoding client with request spacing
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    base_url: String,
    country_filter: String,
    timeout_secs: u64,
    min_interval: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &MapsConfig) -> Result<Self, MapsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.geocoding_timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| MapsError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.nominatim_base_url.trim_end_matches('/').to_string(),
            country_filter: config.country_filter.clone(),
            timeout_secs: config.geocoding_timeout_secs,
            min_interval: Duration::from_millis(config.nominatim_min_interval_ms),
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Keep at least `min_interval` between consecutive requests
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval.saturating_sub(elapsed);
                debug!(?wait, "Rate limiting geocoding request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Coordinate, MapsError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(MapsError::AddressNotFound(
                "Address must not be empty".to_string(),
            ));
        }

        self.rate_limit().await;

        let url = format!("{}/search", self.base_url);
        let mut params = vec![
            ("q", address.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", "1".to_string()),
        ];
        if !self.country_filter.is_empty() {
            params.push(("countrycodes", self.country_filter.clone()));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| MapsError::from_transport(&e, self.timeout_secs))?;

        if !response.status().is_success() {
            return Err(MapsError::RequestFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .map_err(|e| MapsError::ParseError(e.to_string()))?;

        let result = results
            .first()
            .ok_or_else(|| MapsError::AddressNotFound(address.to_string()))?;

        let lat: f64 = result
            .lat
            .parse()
            .map_err(|_| MapsError::ParseError("Invalid latitude".to_string()))?;
        let lon: f64 = result
            .lon
            .parse()
            .map_err(|_| MapsError::ParseError("Invalid longitude".to_string()))?;

        debug!(%address, %lat, %lon, "Geocoded address via Nominatim");
        to_coordinate(lat, lon)
    }

    fn provider_name(&self) -> &'static str {
        "nominatim"
    }
}

/// Google geocoding client
///
/// Built even without an API key; calls then fail with
/// [`MapsError::ProviderUnavailable`] without touching the network.
#[derive(Debug)]
pub struct GoogleGeocodingClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl GoogleGeocodingClient {
    /// Create a new Google geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &MapsConfig) -> Result<Self, MapsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.geocoding_timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| MapsError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.google_base_url.trim_end_matches('/').to_string(),
            api_key: config
                .has_google_key()
                .then(|| config.google_api_key.clone())
                .flatten(),
            timeout_secs: config.geocoding_timeout_secs,
        })
    }

    /// Check if an API key is configured
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl GeocodingClient for GoogleGeocodingClient {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Coordinate, MapsError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(MapsError::ProviderUnavailable(
                "Google geocoding API key not configured".to_string(),
            ));
        };

        let address = address.trim();
        if address.is_empty() {
            return Err(MapsError::AddressNotFound(
                "Address must not be empty".to_string(),
            ));
        }

        let url = format!("{}/maps/api/geocode/json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("address", address), ("key", api_key)])
            .send()
            .await
            .map_err(|e| MapsError::from_transport(&e, self.timeout_secs))?;

        if !response.status().is_success() {
            return Err(MapsError::RequestFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: GoogleGeocodeResponse = response
            .json()
            .await
            .map_err(|e| MapsError::ParseError(e.to_string()))?;

        match body.status.as_str() {
            "OK" => {},
            "ZERO_RESULTS" => return Err(MapsError::AddressNotFound(address.to_string())),
            _ => {
                return Err(MapsError::ApiError {
                    status: body.status,
                    message: body.error_message.unwrap_or_default(),
                });
            },
        }

        let location = &body
            .results
            .first()
            .ok_or_else(|| MapsError::AddressNotFound(address.to_string()))?
            .geometry
            .location;

        debug!(%address, lat = location.lat, lng = location.lng, "Geocoded address via Google");
        to_coordinate(location.lat, location.lng)
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}
