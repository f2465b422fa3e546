//! Vehicle catalog entry and its rate card

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::VehicleId;

/// Pricing parameters of a vehicle
///
/// Owned by the vehicle catalog; read-only to the pricing engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRateCard {
    /// Vehicle this rate card belongs to
    pub id: VehicleId,
    /// Price per booked hour
    pub per_hour_rate: f64,
    /// Price per kilometre; the fare policy default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_km_rate: Option<f64>,
    /// Flat fee added to every trip
    #[serde(default)]
    pub base_fee: f64,
}

/// A vehicle offered for booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Catalog identifier
    pub id: VehicleId,
    /// Display name, e.g. "Mercedes S-Class"
    pub model_name: String,
    /// Seats available to passengers
    #[serde(default)]
    pub capacity: u32,
    /// Luggage pieces the vehicle holds
    #[serde(default)]
    pub luggage_space: u32,
    /// Model year
    #[serde(default)]
    pub model_year: u16,
    /// Price per booked hour
    pub per_hour_rate: f64,
    /// Optional price per kilometre
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_km_rate: Option<f64>,
    /// Flat fee added to every trip
    #[serde(default)]
    pub base_fee: f64,
}

impl Vehicle {
    /// Create a vehicle with only a name and an hourly rate
    pub fn new(id: impl Into<VehicleId>, model_name: impl Into<String>, per_hour_rate: f64) -> Self {
        Self {
            id: id.into(),
            model_name: model_name.into(),
            capacity: 0,
            luggage_space: 0,
            model_year: 0,
            per_hour_rate,
            per_km_rate: None,
            base_fee: 0.0,
        }
    }

    /// Set the per-kilometre rate
    #[must_use]
    pub const fn with_per_km_rate(mut self, rate: f64) -> Self {
        self.per_km_rate = Some(rate);
        self
    }

    /// Set the flat base fee
    #[must_use]
    pub const fn with_base_fee(mut self, fee: f64) -> Self {
        self.base_fee = fee;
        self
    }

    /// Set seating and luggage capacity
    #[must_use]
    pub const fn with_capacity(mut self, capacity: u32, luggage_space: u32) -> Self {
        self.capacity = capacity;
        self.luggage_space = luggage_space;
        self
    }

    /// Check that the vehicle can be offered
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank id or name, or a negative or
    /// non-finite rate.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.id.as_str().trim().is_empty() {
            return Err(DomainError::validation("id", "Every vehicle needs an id"));
        }
        if self.model_name.trim().is_empty() {
            return Err(DomainError::validation("model_name", "Please enter a model name"));
        }
        let rates = [
            ("per_hour_rate", Some(self.per_hour_rate)),
            ("per_km_rate", self.per_km_rate),
            ("base_fee", Some(self.base_fee)),
        ];
        for (field, rate) in rates {
            if rate.is_some_and(|r| !r.is_finite() || r < 0.0) {
                return Err(DomainError::validation(field, "Rates must be non-negative numbers"));
            }
        }
        Ok(())
    }

    /// Extract the rate card used for pricing
    #[must_use]
    pub fn rate_card(&self) -> VehicleRateCard {
        VehicleRateCard {
            id: self.id.clone(),
            per_hour_rate: self.per_hour_rate,
            per_km_rate: self.per_km_rate,
            base_fee: self.base_fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_card_mirrors_vehicle_rates() {
        let vehicle = Vehicle::new("sedan", "Toyota Camry", 10.0)
            .with_per_km_rate(1.5)
            .with_base_fee(100.0);
        let card = vehicle.rate_card();

        assert_eq!(card.id, VehicleId::new("sedan"));
        assert!((card.per_hour_rate - 10.0).abs() < f64::EPSILON);
        assert_eq!(card.per_km_rate, Some(1.5));
        assert!((card.base_fee - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_rejects_bad_rates_and_names() {
        assert!(Vehicle::new("sedan", "Toyota Camry", 10.0).validate().is_ok());

        let err = Vehicle::new("sedan", "Toyota Camry", -1.0).validate().unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed { ref field, .. } if field == "per_hour_rate"));

        let err = Vehicle::new("sedan", "Toyota Camry", 10.0)
            .with_per_km_rate(f64::NAN)
            .validate()
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed { ref field, .. } if field == "per_km_rate"));

        assert!(Vehicle::new(" ", "Toyota Camry", 10.0).validate().is_err());
        assert!(Vehicle::new("sedan", "", 10.0).validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{"id": "van", "model_name": "Hiace", "per_hour_rate": 25.0}"#;
        let vehicle: Vehicle = serde_json::from_str(json).unwrap();
        assert_eq!(vehicle.per_km_rate, None);
        assert!(vehicle.base_fee.abs() < f64::EPSILON);
        assert_eq!(vehicle.capacity, 0);
    }
}
