//! Maps integration for Chauffeur
//!
//! Address resolution and driving routes for the trip pricing pipeline.
//!
//! # Architecture
//!
//! [`GeocodeResolver`] accepts free text or a literal `"lat,lon"` pair. Text
//! goes to [`NominatimGeocodingClient`] first and, when that finds nothing,
//! to [`GoogleGeocodingClient`] (only with a configured API key).
//! [`GoogleDirectionsClient`] computes the driving route and decodes its
//! overview polyline.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_maps::{DirectionsClient, GeocodeResolver, GoogleDirectionsClient, MapsConfig};
//!
//! let config = MapsConfig::default();
//! let resolver = GeocodeResolver::new(&config)?;
//! let directions = GoogleDirectionsClient::new(&config)?;
//!
//! let from = resolver.resolve("24.86,67.00").await?;
//! let to = resolver.resolve("Clifton Beach, Karachi").await?;
//! let route = directions.route(&from, &to).await?;
//! ```

mod config;
mod directions;
mod error;
mod geocoding;
mod models;
mod resolver;

pub use config::MapsConfig;
pub use directions::{DirectionsClient, GoogleDirectionsClient};
pub use error::MapsError;
pub use geocoding::{GeocodingClient, GoogleGeocodingClient, NominatimGeocodingClient};
pub use resolver::GeocodeResolver;
