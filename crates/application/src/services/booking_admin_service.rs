//! Booking Admin Service - Status management for stored bookings
//!
//! Lists, inspects, cancels, completes and deletes bookings after the
//! workflow has confirmed them. Only the status changes; the booking record
//! itself stays as confirmed.

use std::sync::Arc;

use domain::{Booking, BookingId, BookingPatch, BookingStatus};
use tracing::{info, instrument};

use crate::{error::ApplicationError, ports::BookingRepositoryPort};

/// Service for managing confirmed bookings
pub struct BookingAdminService {
    bookings: Arc<dyn BookingRepositoryPort>,
}

impl std::fmt::Debug for BookingAdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingAdminService").finish_non_exhaustive()
    }
}

impl BookingAdminService {
    /// Create a new booking admin service
    pub fn new(bookings: Arc<dyn BookingRepositoryPort>) -> Self {
        Self { bookings }
    }

    /// All bookings, newest first
    pub async fn list(&self) -> Result<Vec<Booking>, ApplicationError> {
        self.bookings.list_bookings().await
    }

    /// Fetch one booking
    ///
    /// Fails with [`ApplicationError::NotFound`] for an unknown id.
    pub async fn get(&self, id: &BookingId) -> Result<Booking, ApplicationError> {
        self.bookings
            .get_booking(id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("Booking {id}")))
    }

    /// Cancel a pending or confirmed booking
    #[instrument(skip(self), fields(booking_id = %id))]
    pub async fn cancel(&self, id: &BookingId) -> Result<Booking, ApplicationError> {
        let booking = self.get(id).await?;
        if !booking.status.is_cancellable() {
            return Err(ApplicationError::InvalidOperation(format!(
                "Booking {id} is {} and cannot be cancelled",
                booking.status
            )));
        }

        let updated = self
            .bookings
            .update_booking(id, BookingPatch::status(BookingStatus::Cancelled))
            .await?;
        info!("Booking cancelled");
        Ok(updated)
    }

    /// Mark a confirmed booking as completed
    #[instrument(skip(self), fields(booking_id = %id))]
    pub async fn complete(&self, id: &BookingId) -> Result<Booking, ApplicationError> {
        let booking = self.get(id).await?;
        if booking.status != BookingStatus::Confirmed {
            return Err(ApplicationError::InvalidOperation(format!(
                "Only confirmed bookings can be completed, {id} is {}",
                booking.status
            )));
        }

        let updated = self
            .bookings
            .update_booking(id, BookingPatch::status(BookingStatus::Completed))
            .await?;
        info!("Booking completed");
        Ok(updated)
    }

    /// Remove a booking for good
    #[instrument(skip(self), fields(booking_id = %id))]
    pub async fn delete(&self, id: &BookingId) -> Result<(), ApplicationError> {
        self.bookings.delete_booking(id).await?;
        info!("Booking deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use domain::{CustomerInfo, FareBreakdown, TripDetails, VehicleId};
    use mockall::predicate::eq;

    use super::*;
    use crate::ports::MockBookingRepositoryPort;

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: BookingId::new(),
            trip: TripDetails::new(
                "24.86,67.00",
                "24.90,67.10",
                NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                "10:30",
            ),
            vehicle_id: VehicleId::new("sedan"),
            vehicle_name: "Toyota Camry".to_string(),
            vehicle_rate: 10.0,
            customer: CustomerInfo::new("Ada", "ada@example.com", "+1 555", "Main St"),
            distance_km: 15.0,
            duration_min: 20,
            base_fare: 35.0,
            fare: FareBreakdown {
                base_fee: 0.0,
                hour_fare: 20.0,
                distance_fare: 15.0,
                time_fare: 0.0,
                toll_fare: 5.0,
                total: 40.0,
            },
            total_fare: 40.0,
            status,
            invoice_sent: false,
            created_at: Utc::now(),
        }
    }

    fn repo_with(stored: Booking) -> MockBookingRepositoryPort {
        let mut repo = MockBookingRepositoryPort::new();
        repo.expect_get_booking()
            .with(eq(stored.id))
            .returning(move |_| Ok(Some(stored.clone())));
        repo
    }

    #[tokio::test]
    async fn cancel_confirmed_booking() {
        let stored = booking(BookingStatus::Confirmed);
        let id = stored.id;
        let mut repo = repo_with(stored.clone());
        repo.expect_update_booking()
            .withf(move |got, patch| *got == id && patch.status == Some(BookingStatus::Cancelled))
            .times(1)
            .returning(move |_, patch| {
                let mut updated = stored.clone();
                updated.apply(&patch);
                Ok(updated)
            });

        let service = BookingAdminService::new(Arc::new(repo));
        let updated = service.cancel(&id).await.unwrap();
        assert_eq!(updated.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn completed_booking_cannot_be_cancelled() {
        let stored = booking(BookingStatus::Completed);
        let id = stored.id;
        let mut repo = repo_with(stored);
        repo.expect_update_booking().never();

        let service = BookingAdminService::new(Arc::new(repo));
        let err = service.cancel(&id).await.unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidOperation(_)));
    }

    #[tokio::test]
    async fn cancelled_booking_cannot_be_completed() {
        let stored = booking(BookingStatus::Cancelled);
        let id = stored.id;
        let mut repo = repo_with(stored);
        repo.expect_update_booking().never();

        let service = BookingAdminService::new(Arc::new(repo));
        assert!(matches!(
            service.complete(&id).await,
            Err(ApplicationError::InvalidOperation(_))
        ));
    }

    #[tokio::test]
    async fn unknown_booking_is_not_found() {
        let mut repo = MockBookingRepositoryPort::new();
        repo.expect_get_booking().returning(|_| Ok(None));

        let service = BookingAdminService::new(Arc::new(repo));
        let err = service.get(&BookingId::new()).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(msg) if msg.starts_with("Booking BK-")));
    }
}
