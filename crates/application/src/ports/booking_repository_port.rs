//! Booking persistence port

use async_trait::async_trait;
use domain::{Booking, BookingId, BookingPatch};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// CRUD access to stored bookings
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BookingRepositoryPort: Send + Sync {
    /// Store a new booking
    async fn create_booking(&self, booking: &Booking) -> Result<Booking, ApplicationError>;

    /// Fetch a booking by id
    async fn get_booking(&self, id: &BookingId) -> Result<Option<Booking>, ApplicationError>;

    /// Apply a partial update and return the updated booking
    ///
    /// Fails with [`ApplicationError::NotFound`] for an unknown id.
    async fn update_booking(
        &self,
        id: &BookingId,
        patch: BookingPatch,
    ) -> Result<Booking, ApplicationError>;

    /// Remove a booking
    ///
    /// Fails with [`ApplicationError::NotFound`] for an unknown id.
    async fn delete_booking(&self, id: &BookingId) -> Result<(), ApplicationError>;

    /// All bookings, newest first
    async fn list_bookings(&self) -> Result<Vec<Booking>, ApplicationError>;
}
