//! Geocoding port
//!
//! Turns free text or a `"lat,lon"` pair into a coordinate.

use async_trait::async_trait;
use domain::Coordinate;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for address resolution
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve an address or coordinate pair
    ///
    /// Fails with [`ApplicationError::Geocode`] when no provider finds it.
    async fn geocode(&self, input: &str) -> Result<Coordinate, ApplicationError>;
}
