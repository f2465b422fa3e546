//! Vehicle catalog port

use async_trait::async_trait;
use domain::{Vehicle, VehicleId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// CRUD access to the vehicles that can be priced and booked
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VehicleCatalogPort: Send + Sync {
    /// All vehicles in catalog order
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, ApplicationError>;

    /// Look up one vehicle
    async fn get_vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>, ApplicationError>;

    /// Add a vehicle at the end of the catalog
    ///
    /// Fails with [`ApplicationError::InvalidOperation`] when the id is taken.
    async fn add_vehicle(&self, vehicle: &Vehicle) -> Result<Vehicle, ApplicationError>;

    /// Replace a vehicle, keeping its catalog position
    ///
    /// Fails with [`ApplicationError::NotFound`] for an unknown id.
    async fn update_vehicle(&self, vehicle: &Vehicle) -> Result<Vehicle, ApplicationError>;

    /// Remove a vehicle
    ///
    /// Fails with [`ApplicationError::NotFound`] for an unknown id.
    async fn delete_vehicle(&self, id: &VehicleId) -> Result<(), ApplicationError>;
}
