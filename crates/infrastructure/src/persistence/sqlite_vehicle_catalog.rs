//! SQLite vehicle catalog implementation
//!
//! Implements the `VehicleCatalogPort`. Vehicles keep the order they were
//! added in; an empty catalog can be seeded from configuration.

use std::sync::Arc;

use application::{ApplicationError, ports::VehicleCatalogPort};
use async_trait::async_trait;
use domain::{Vehicle, VehicleId};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, named_params};
use tracing::{debug, info, instrument};

use super::connection::{ConnectionPool, persistence_error, with_connection};

const SELECT_VEHICLE: &str = "SELECT id, model_name, capacity, luggage_space, model_year,
        per_hour_rate, per_km_rate, base_fee
    FROM vehicles";

/// SQLite-based vehicle catalog
#[derive(Debug, Clone)]
pub struct SqliteVehicleCatalog {
    pool: Arc<ConnectionPool>,
}

impl SqliteVehicleCatalog {
    /// Create a new SQLite vehicle catalog
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Insert `vehicles` in order when the catalog is empty
    ///
    /// Returns how many vehicles were inserted; a non-empty catalog is left
    /// untouched so edits made through the catalog survive restarts.
    #[instrument(skip(self, vehicles), fields(configured = vehicles.len()))]
    pub async fn seed(&self, vehicles: &[Vehicle]) -> Result<usize, ApplicationError> {
        let vehicles = vehicles.to_vec();

        with_connection(&self.pool, move |conn| {
            let tx = conn.unchecked_transaction().map_err(persistence_error)?;
            let existing: i64 = tx
                .query_row("SELECT COUNT(*) FROM vehicles", [], |row| row.get(0))
                .map_err(persistence_error)?;
            if existing > 0 || vehicles.is_empty() {
                debug!(existing, "Vehicle catalog not seeded");
                return Ok(0);
            }

            for vehicle in &vehicles {
                insert(&tx, vehicle)?;
            }
            tx.commit().map_err(persistence_error)?;

            info!(count = vehicles.len(), "Vehicle catalog seeded from configuration");
            Ok(vehicles.len())
        })
        .await
    }
}

fn not_found(id: &VehicleId) -> ApplicationError {
    ApplicationError::NotFound(format!("Vehicle {id}"))
}

fn insert(conn: &Connection, vehicle: &Vehicle) -> Result<(), ApplicationError> {
    let inserted = conn.execute(
        "INSERT INTO vehicles (id, position, model_name, capacity, luggage_space, model_year,
            per_hour_rate, per_km_rate, base_fee)
         VALUES (:id, (SELECT COALESCE(MAX(position), 0) + 1 FROM vehicles), :model_name,
            :capacity, :luggage_space, :model_year, :per_hour_rate, :per_km_rate, :base_fee)",
        named_params! {
            ":id": vehicle.id.as_str(),
            ":model_name": vehicle.model_name,
            ":capacity": vehicle.capacity,
            ":luggage_space": vehicle.luggage_space,
            ":model_year": vehicle.model_year,
            ":per_hour_rate": vehicle.per_hour_rate,
            ":per_km_rate": vehicle.per_km_rate,
            ":base_fee": vehicle.base_fee,
        },
    );

    match inserted {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => Err(
            ApplicationError::InvalidOperation(format!("Vehicle {} already exists", vehicle.id)),
        ),
        Err(e) => Err(persistence_error(e)),
    }
}

fn fetch(conn: &Connection, id: &str) -> Result<Option<Vehicle>, ApplicationError> {
    conn.query_row(&format!("{SELECT_VEHICLE} WHERE id = ?1"), [id], row_to_vehicle)
        .optional()
        .map_err(persistence_error)
}

#[async_trait]
impl VehicleCatalogPort for SqliteVehicleCatalog {
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, ApplicationError> {
        with_connection(&self.pool, |conn| {
            let mut stmt = conn
                .prepare(&format!("{SELECT_VEHICLE} ORDER BY position"))
                .map_err(persistence_error)?;
            stmt.query_map([], row_to_vehicle)
                .map_err(persistence_error)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(persistence_error)
        })
        .await
    }

    async fn get_vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>, ApplicationError> {
        let id = id.as_str().to_string();
        with_connection(&self.pool, move |conn| fetch(conn, &id)).await
    }

    #[instrument(skip(self, vehicle), fields(vehicle_id = %vehicle.id))]
    async fn add_vehicle(&self, vehicle: &Vehicle) -> Result<Vehicle, ApplicationError> {
        let vehicle = vehicle.clone();
        with_connection(&self.pool, move |conn| {
            insert(conn, &vehicle)?;
            debug!("Vehicle stored");
            Ok(vehicle)
        })
        .await
    }

    #[instrument(skip(self, vehicle), fields(vehicle_id = %vehicle.id))]
    async fn update_vehicle(&self, vehicle: &Vehicle) -> Result<Vehicle, ApplicationError> {
        let vehicle = vehicle.clone();
        with_connection(&self.pool, move |conn| {
            let changed = conn
                .execute(
                    "UPDATE vehicles
                     SET model_name = :model_name, capacity = :capacity,
                         luggage_space = :luggage_space, model_year = :model_year,
                         per_hour_rate = :per_hour_rate, per_km_rate = :per_km_rate,
                         base_fee = :base_fee
                     WHERE id = :id",
                    named_params! {
                        ":id": vehicle.id.as_str(),
                        ":model_name": vehicle.model_name,
                        ":capacity": vehicle.capacity,
                        ":luggage_space": vehicle.luggage_space,
                        ":model_year": vehicle.model_year,
                        ":per_hour_rate": vehicle.per_hour_rate,
                        ":per_km_rate": vehicle.per_km_rate,
                        ":base_fee": vehicle.base_fee,
                    },
                )
                .map_err(persistence_error)?;
            if changed == 0 {
                return Err(not_found(&vehicle.id));
            }
            Ok(vehicle)
        })
        .await
    }

    #[instrument(skip(self), fields(vehicle_id = %id))]
    async fn delete_vehicle(&self, id: &VehicleId) -> Result<(), ApplicationError> {
        let id = id.clone();
        with_connection(&self.pool, move |conn| {
            let deleted = conn
                .execute("DELETE FROM vehicles WHERE id = ?1", [id.as_str()])
                .map_err(persistence_error)?;
            if deleted == 0 {
                return Err(not_found(&id));
            }
            Ok(())
        })
        .await
    }
}

/// Convert a database row to a `Vehicle`
fn row_to_vehicle(row: &Row<'_>) -> rusqlite::Result<Vehicle> {
    Ok(Vehicle {
        id: VehicleId::new(row.get::<_, String>("id")?),
        model_name: row.get("model_name")?,
        capacity: row.get("capacity")?,
        luggage_space: row.get("luggage_space")?,
        model_year: row.get("model_year")?,
        per_hour_rate: row.get("per_hour_rate")?,
        per_km_rate: row.get("per_km_rate")?,
        base_fee: row.get("base_fee")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DatabaseConfig, persistence::connection::create_pool};

    fn create_test_catalog() -> SqliteVehicleCatalog {
        let pool = create_pool(&DatabaseConfig::in_memory()).unwrap();
        SqliteVehicleCatalog::new(Arc::new(pool))
    }

    fn fleet() -> Vec<Vehicle> {
        vec![
            Vehicle::new("van", "Toyota Hiace", 25.0).with_capacity(12, 8),
            Vehicle::new("sedan", "Toyota Camry", 10.0).with_per_km_rate(1.5),
        ]
    }

    fn ids(vehicles: &[Vehicle]) -> Vec<&str> {
        vehicles.iter().map(|v| v.id.as_str()).collect()
    }

    #[tokio::test]
    async fn seed_fills_empty_catalog_in_order() {
        let catalog = create_test_catalog();
        assert_eq!(catalog.seed(&fleet()).await.unwrap(), 2);

        let vehicles = catalog.list_vehicles().await.unwrap();
        assert_eq!(ids(&vehicles), ["van", "sedan"]);
        assert_eq!(vehicles[0].capacity, 12);
        assert_eq!(vehicles[1].per_km_rate, Some(1.5));
    }

    #[tokio::test]
    async fn seed_leaves_existing_catalog_alone() {
        let catalog = create_test_catalog();
        catalog
            .add_vehicle(&Vehicle::new("limo", "Lincoln Continental", 60.0))
            .await
            .unwrap();

        assert_eq!(catalog.seed(&fleet()).await.unwrap(), 0);
        assert_eq!(ids(&catalog.list_vehicles().await.unwrap()), ["limo"]);
    }

    #[tokio::test]
    async fn add_appends_and_rejects_duplicates() {
        let catalog = create_test_catalog();
        catalog.seed(&fleet()).await.unwrap();
        catalog
            .add_vehicle(&Vehicle::new("suv", "Toyota Fortuner", 18.0))
            .await
            .unwrap();
        assert_eq!(ids(&catalog.list_vehicles().await.unwrap()), ["van", "sedan", "suv"]);

        let err = catalog
            .add_vehicle(&Vehicle::new("van", "Another van", 20.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidOperation(_)));
    }

    #[tokio::test]
    async fn update_keeps_position() {
        let catalog = create_test_catalog();
        catalog.seed(&fleet()).await.unwrap();

        let updated = Vehicle::new("van", "Toyota Hiace Grand", 30.0).with_base_fee(50.0);
        catalog.update_vehicle(&updated).await.unwrap();

        let vehicles = catalog.list_vehicles().await.unwrap();
        assert_eq!(ids(&vehicles), ["van", "sedan"]);
        assert_eq!(vehicles[0], updated);
    }

    #[tokio::test]
    async fn update_and_delete_missing_are_not_found() {
        let catalog = create_test_catalog();
        assert!(matches!(
            catalog.update_vehicle(&Vehicle::new("bus", "Coaster", 40.0)).await,
            Err(ApplicationError::NotFound(_))
        ));
        assert!(matches!(
            catalog.delete_vehicle(&VehicleId::new("bus")).await,
            Err(ApplicationError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_then_lookup() {
        let catalog = create_test_catalog();
        catalog.seed(&fleet()).await.unwrap();
        catalog.delete_vehicle(&VehicleId::new("van")).await.unwrap();

        assert!(catalog.get_vehicle(&VehicleId::new("van")).await.unwrap().is_none());
        assert!(catalog.get_vehicle(&VehicleId::new("sedan")).await.unwrap().is_some());
    }
}
