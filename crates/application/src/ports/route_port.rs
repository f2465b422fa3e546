//! Driving route port

use async_trait::async_trait;
use domain::{Coordinate, RouteResult};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for driving route computation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutePort: Send + Sync {
    /// Compute the driving route between two coordinates
    ///
    /// Fails with [`ApplicationError::Route`] when no route is found.
    async fn route(
        &self,
        from: &Coordinate,
        to: &Coordinate,
    ) -> Result<RouteResult, ApplicationError>;
}
