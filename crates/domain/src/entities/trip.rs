//! Trip and customer details entered during a booking

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// One-way or return transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferType {
    /// Pickup to dropoff only
    #[default]
    OneWay,
    /// Pickup to dropoff and back
    TwoWay,
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneWay => write!(f, "one-way"),
            Self::TwoWay => write!(f, "two-way"),
        }
    }
}

impl std::str::FromStr for TransferType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "one-way" | "oneway" | "one_way" => Ok(Self::OneWay),
            "two-way" | "twoway" | "two_way" | "return" => Ok(Self::TwoWay),
            other => Err(DomainError::validation(
                "transfer_type",
                format!("unknown transfer type '{other}'"),
            )),
        }
    }
}

/// Trip details entered in the first booking step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDetails {
    /// Pickup address or `"lat,lon"`
    pub pickup: String,
    /// Dropoff address or `"lat,lon"`
    pub dropoff: String,
    /// Pickup date
    pub date: NaiveDate,
    /// Pickup time as entered
    pub time: String,
    /// Booked hours
    pub hours: f64,
    /// Passenger count
    pub passengers: u32,
    /// One-way or return
    pub transfer_type: TransferType,
}

impl TripDetails {
    /// Create trip details with the default hours, passengers and transfer type
    pub fn new(
        pickup: impl Into<String>,
        dropoff: impl Into<String>,
        date: NaiveDate,
        time: impl Into<String>,
    ) -> Self {
        Self {
            pickup: pickup.into(),
            dropoff: dropoff.into(),
            date,
            time: time.into(),
            hours: 1.0,
            passengers: 1,
            transfer_type: TransferType::OneWay,
        }
    }

    /// Set booked hours
    #[must_use]
    pub const fn with_hours(mut self, hours: f64) -> Self {
        self.hours = hours;
        self
    }

    /// Set passenger count
    #[must_use]
    pub const fn with_passengers(mut self, passengers: u32) -> Self {
        self.passengers = passengers;
        self
    }

    /// Set transfer type
    #[must_use]
    pub const fn with_transfer_type(mut self, transfer_type: TransferType) -> Self {
        self.transfer_type = transfer_type;
        self
    }

    /// Hours used for pricing, never negative
    #[must_use]
    pub fn billable_hours(&self) -> f64 {
        if self.hours.is_finite() { self.hours.max(0.0) } else { 0.0 }
    }

    /// Check the fields required to leave the trip details step
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.pickup.trim().is_empty() {
            return Err(DomainError::validation("pickup", "Please enter a pickup location"));
        }
        if self.dropoff.trim().is_empty() {
            return Err(DomainError::validation("dropoff", "Please enter a dropoff location"));
        }
        if self.time.trim().is_empty() {
            return Err(DomainError::validation("time", "Please enter a pickup time"));
        }
        if self.passengers < 1 {
            return Err(DomainError::validation(
                "passengers",
                "Passengers must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Customer details entered in the third booking step
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// Full name
    pub name: String,
    /// Email address (invoice recipient)
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Postal address
    pub address: String,
}

impl CustomerInfo {
    /// Create customer info; values are trimmed
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            email: email.into().trim().to_string(),
            phone: phone.into().trim().to_string(),
            address: address.into().trim().to_string(),
        }
    }

    /// Check that every field is filled in
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first empty field.
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(DomainError::validation(
                    field,
                    "Please fill in all customer details",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip() -> TripDetails {
        TripDetails::new(
            "24.86,67.00",
            "24.90,67.10",
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            "10:30",
        )
    }

    fn field_of(err: DomainError) -> String {
        match err {
            DomainError::ValidationFailed { field, .. } => field,
            other => unreachable!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn new_trip_has_defaults() {
        let t = trip();
        assert!((t.hours - 1.0).abs() < f64::EPSILON);
        assert_eq!(t.passengers, 1);
        assert_eq!(t.transfer_type, TransferType::OneWay);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn zero_passengers_rejected() {
        let err = trip().with_passengers(0).validate().unwrap_err();
        assert_eq!(field_of(err), "passengers");
    }

    #[test]
    fn blank_locations_rejected() {
        let mut t = trip();
        t.pickup = "   ".to_string();
        assert_eq!(field_of(t.validate().unwrap_err()), "pickup");

        let mut t = trip();
        t.dropoff = String::new();
        assert_eq!(field_of(t.validate().unwrap_err()), "dropoff");
    }

    #[test]
    fn blank_time_rejected() {
        let mut t = trip();
        t.time = String::new();
        assert_eq!(field_of(t.validate().unwrap_err()), "time");
    }

    #[test]
    fn billable_hours_never_negative() {
        assert!(trip().with_hours(-2.0).billable_hours().abs() < f64::EPSILON);
        assert!(trip().with_hours(f64::NAN).billable_hours().abs() < f64::EPSILON);
        assert!((trip().with_hours(3.5).billable_hours() - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn transfer_type_parsing() {
        assert_eq!("one-way".parse::<TransferType>().unwrap(), TransferType::OneWay);
        assert_eq!("Two-Way".parse::<TransferType>().unwrap(), TransferType::TwoWay);
        assert!("sideways".parse::<TransferType>().is_err());
    }

    #[test]
    fn transfer_type_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TransferType::TwoWay).unwrap(),
            "\"two-way\""
        );
    }

    #[test]
    fn customer_fields_are_trimmed() {
        let c = CustomerInfo::new(" Ada ", " ada@example.com", "+1 555 ", " Main St ");
        assert_eq!(c.name, "Ada");
        assert_eq!(c.email, "ada@example.com");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn customer_missing_phone_rejected() {
        let c = CustomerInfo::new("Ada", "ada@example.com", "", "Main St");
        assert_eq!(field_of(c.validate().unwrap_err()), "phone");
    }
}
