//! Google Directions client
//!
//! Only the first route and its first leg are used; alternative routes and
//! further legs are ignored.

use std::time::Duration;

use async_trait::async_trait;
use domain::{Coordinate, RouteResult};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::MapsConfig;
use crate::error::MapsError;
use crate::models::DirectionsResponse;

/// Trait for driving directions providers
#[async_trait]
pub trait DirectionsClient: Send + Sync {
    /// Compute the driving route between two coordinates
    async fn route(&self, from: &Coordinate, to: &Coordinate) -> Result<RouteResult, MapsError>;
}

/// Directions client for the Google Directions API
#[derive(Debug)]
pub struct GoogleDirectionsClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout_secs: u64,
}

impl GoogleDirectionsClient {
    /// Create a new directions client
    ///
    /// # Errors
    ///
    /// Returns an error if no API key is configured or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &MapsConfig) -> Result<Self, MapsError> {
        let api_key = config
            .google_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                MapsError::ConfigurationError("Google API key is required for directions".into())
            })?
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(config.directions_timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| MapsError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.google_base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout_secs: config.directions_timeout_secs,
        })
    }

    /// Turn a directions body into a route
    fn parse_route(body: &str, from: &Coordinate, to: &Coordinate) -> Result<RouteResult, MapsError> {
        let response: DirectionsResponse =
            serde_json::from_str(body).map_err(|e| MapsError::ParseError(e.to_string()))?;

        let no_route = || MapsError::NoRouteFound {
            from: from.to_query_value(),
            to: to.to_query_value(),
        };

        match response.status.as_str() {
            "OK" => {},
            "ZERO_RESULTS" | "NOT_FOUND" => return Err(no_route()),
            _ => {
                return Err(MapsError::ApiError {
                    status: response.status,
                    message: response.error_message.unwrap_or_default(),
                });
            },
        }

        let route = response.routes.into_iter().next().ok_or_else(no_route)?;
        let leg = route.legs.first().ok_or_else(no_route)?;
        let encoded = route
            .overview_polyline
            .as_ref()
            .map(|p| p.points.as_str())
            .unwrap_or_default();

        Ok(RouteResult::from_metrics(
            leg.distance.value,
            leg.duration.value,
            encoded,
        ))
    }
}

#[async_trait]
impl DirectionsClient for GoogleDirectionsClient {
    #[instrument(skip(self), fields(from = %from, to = %to))]
    async fn route(&self, from: &Coordinate, to: &Coordinate) -> Result<RouteResult, MapsError> {
        let url = format!("{}/maps/api/directions/json", self.base_url);
        let origin = from.to_query_value();
        let destination = to.to_query_value();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("origin", origin.as_str()),
                ("destination", destination.as_str()),
                ("mode", "driving"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MapsError::from_transport(&e, self.timeout_secs))?;

        if !response.status().is_success() {
            return Err(MapsError::RequestFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MapsError::ParseError(e.to_string()))?;

        let route = Self::parse_route(&body, from, to)?;
        debug!(
            distance_km = route.distance_km,
            duration_min = route.duration_min,
            points = route.decoded_path.len(),
            "Route computed"
        );
        Ok(route)
    }
}
