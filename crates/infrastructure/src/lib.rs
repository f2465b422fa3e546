//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: geocoding and routing
//! through `integration_maps`, toll estimation through `integration_tolls`,
//! the invoice/payment backend over HTTP, and SQLite storage for bookings and
//! the vehicle catalog.
//! Also owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, BackendConfig, DatabaseConfig, Environment, MapsAppConfig, PricingConfig,
    TelemetryAppConfig, TollsAppConfig,
};
pub use persistence::{
    ConnectionPool, DatabaseError, SqliteBookingStore, SqliteVehicleCatalog, create_pool,
};
pub use telemetry::{TelemetryError, init_telemetry};
