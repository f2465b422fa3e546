//! Toll estimation port

use async_trait::async_trait;
use domain::{Coordinate, RouteResult, TollQuote};
#[cfg(test)]
use mockall::automock;

/// Port for toll estimation
///
/// Infallible by contract: every failure is reported through the quote's
/// classification with a zero amount.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TollPort: Send + Sync {
    /// Estimate the toll for a computed route
    async fn estimate(
        &self,
        from: &Coordinate,
        to: &Coordinate,
        route: &RouteResult,
    ) -> TollQuote;
}
