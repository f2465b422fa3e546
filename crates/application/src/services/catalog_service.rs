//! Catalog Service - Vehicle administration
//!
//! Validates vehicles before they reach the catalog so that every vehicle
//! the pricing pass sees has a usable rate card.

use std::sync::Arc;

use domain::{Vehicle, VehicleId};
use tracing::{info, instrument};

use crate::{error::ApplicationError, ports::VehicleCatalogPort};

/// Service for adding, changing and removing catalog vehicles
pub struct CatalogService {
    catalog: Arc<dyn VehicleCatalogPort>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService").finish_non_exhaustive()
    }
}

impl CatalogService {
    /// Create a new catalog service
    pub fn new(catalog: Arc<dyn VehicleCatalogPort>) -> Self {
        Self { catalog }
    }

    /// All vehicles in catalog order
    pub async fn list(&self) -> Result<Vec<Vehicle>, ApplicationError> {
        self.catalog.list_vehicles().await
    }

    /// Fetch one vehicle
    ///
    /// Fails with [`ApplicationError::NotFound`] for an unknown id.
    pub async fn get(&self, id: &VehicleId) -> Result<Vehicle, ApplicationError> {
        self.catalog
            .get_vehicle(id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("Vehicle {id}")))
    }

    /// Validate and add a vehicle
    #[instrument(skip(self, vehicle), fields(vehicle_id = %vehicle.id))]
    pub async fn add(&self, vehicle: Vehicle) -> Result<Vehicle, ApplicationError> {
        vehicle.validate()?;
        let added = self.catalog.add_vehicle(&vehicle).await?;
        info!("Vehicle added");
        Ok(added)
    }

    /// Validate and replace a vehicle
    #[instrument(skip(self, vehicle), fields(vehicle_id = %vehicle.id))]
    pub async fn update(&self, vehicle: Vehicle) -> Result<Vehicle, ApplicationError> {
        vehicle.validate()?;
        let updated = self.catalog.update_vehicle(&vehicle).await?;
        info!("Vehicle updated");
        Ok(updated)
    }

    /// Remove a vehicle; existing bookings keep their copy of its name and rate
    #[instrument(skip(self), fields(vehicle_id = %id))]
    pub async fn remove(&self, id: &VehicleId) -> Result<(), ApplicationError> {
        self.catalog.delete_vehicle(id).await?;
        info!("Vehicle removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockVehicleCatalogPort;

    #[tokio::test]
    async fn invalid_vehicle_never_reaches_catalog() {
        let mut catalog = MockVehicleCatalogPort::new();
        catalog.expect_add_vehicle().never();
        catalog.expect_update_vehicle().never();

        let service = CatalogService::new(Arc::new(catalog));
        let err = service
            .add(Vehicle::new("sedan", "Toyota Camry", -5.0))
            .await
            .unwrap_err();
        assert_eq!(err.invalid_field(), Some("per_hour_rate"));

        let err = service.update(Vehicle::new("sedan", "", 5.0)).await.unwrap_err();
        assert_eq!(err.invalid_field(), Some("model_name"));
    }

    #[tokio::test]
    async fn add_passes_valid_vehicle_through() {
        let mut catalog = MockVehicleCatalogPort::new();
        catalog
            .expect_add_vehicle()
            .withf(|v| v.id.as_str() == "van")
            .times(1)
            .returning(|v| Ok(v.clone()));

        let service = CatalogService::new(Arc::new(catalog));
        let added = service
            .add(Vehicle::new("van", "Toyota Hiace", 25.0).with_capacity(12, 8))
            .await
            .unwrap();
        assert_eq!(added.capacity, 12);
    }

    #[tokio::test]
    async fn missing_vehicle_is_not_found() {
        let mut catalog = MockVehicleCatalogPort::new();
        catalog.expect_get_vehicle().returning(|_| Ok(None));

        let service = CatalogService::new(Arc::new(catalog));
        assert!(matches!(
            service.get(&VehicleId::new("limo")).await,
            Err(ApplicationError::NotFound(_))
        ));
    }
}
