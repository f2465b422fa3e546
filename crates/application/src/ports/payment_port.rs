//! Payment initiation port

use async_trait::async_trait;
use domain::Booking;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Metadata attached to a payment intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMetadata {
    /// Customer name
    pub name: String,
    /// Customer phone
    pub phone: String,
    /// Booked vehicle model
    pub car_model: String,
    /// Route distance in kilometres
    pub distance: f64,
    /// Route duration in minutes
    pub duration: u32,
    /// Pickup as entered
    pub pickup_location: String,
    /// Dropoff as entered
    pub dropoff_location: String,
}

impl PaymentMetadata {
    /// Build metadata from a booking
    #[must_use]
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            name: booking.customer.name.clone(),
            phone: booking.customer.phone.clone(),
            car_model: booking.vehicle_name.clone(),
            distance: booking.distance_km,
            duration: booking.duration_min,
            pickup_location: booking.trip.pickup.clone(),
            dropoff_location: booking.trip.dropoff.clone(),
        }
    }
}

/// A created payment intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Secret the payment UI uses to complete the charge
    pub client_secret: String,
}

/// Port for starting a payment
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PaymentPort: Send + Sync {
    /// Create a payment intent for an amount in cents
    async fn create_payment_intent(
        &self,
        amount_cents: u64,
        metadata: &PaymentMetadata,
    ) -> Result<PaymentIntent, ApplicationError>;
}
