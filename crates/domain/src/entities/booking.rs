//! Confirmed booking record

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CustomerInfo, FareBreakdown, TripDetails};
use crate::errors::DomainError;
use crate::value_objects::{BookingId, VehicleId};

/// Lifecycle status of a stored booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created but not yet confirmed
    #[default]
    Pending,
    /// Confirmed by the booking workflow
    Confirmed,
    /// Cancelled after confirmation
    Cancelled,
    /// Trip completed
    Completed,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(DomainError::validation(
                "status",
                format!("unknown booking status '{other}'"),
            )),
        }
    }
}

impl BookingStatus {
    /// Whether the booking can still be cancelled
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

/// A booking, immutable once produced by the workflow
///
/// Only the status and invoice flag change afterwards, through
/// [`BookingPatch`] in the booking repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking id
    pub id: BookingId,
    /// Trip as entered
    pub trip: TripDetails,
    /// Booked vehicle
    pub vehicle_id: VehicleId,
    /// Vehicle display name at booking time
    pub vehicle_name: String,
    /// Vehicle hourly rate at booking time
    pub vehicle_rate: f64,
    /// Customer details
    pub customer: CustomerInfo,
    /// Route distance in kilometres
    pub distance_km: f64,
    /// Route duration in minutes
    pub duration_min: u32,
    /// Hour fare plus distance fare
    pub base_fare: f64,
    /// Itemized fare
    pub fare: FareBreakdown,
    /// Amount charged
    pub total_fare: f64,
    /// Current status
    pub status: BookingStatus,
    /// Whether the invoice email went out
    pub invoice_sent: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Total fare in cents, rounded half-up
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn total_cents(&self) -> u64 {
        (self.total_fare.max(0.0) * 100.0).round() as u64
    }

    /// Apply a partial update
    pub fn apply(&mut self, patch: &BookingPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(invoice_sent) = patch.invoice_sent {
            self.invoice_sent = invoice_sent;
        }
    }
}

/// Partial update of a stored booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingPatch {
    /// New status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    /// New invoice flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_sent: Option<bool>,
}

impl BookingPatch {
    /// Patch that marks the invoice as sent
    #[must_use]
    pub const fn invoice_sent() -> Self {
        Self {
            status: None,
            invoice_sent: Some(true),
        }
    }

    /// Patch that changes the status
    #[must_use]
    pub const fn status(status: BookingStatus) -> Self {
        Self {
            status: Some(status),
            invoice_sent: None,
        }
    }
}
