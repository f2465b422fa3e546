//! Persistence module
//!
//! SQLite storage for bookings and the vehicle catalog, pooled through r2d2.

mod connection;
mod migrations;
mod sqlite_booking_store;
mod sqlite_vehicle_catalog;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use sqlite_booking_store::SqliteBookingStore;
pub use sqlite_vehicle_catalog::SqliteVehicleCatalog;

use rusqlite::Row;
use rusqlite::types::Type;

/// Read a text column and parse it into a domain type
fn parse_column<T, E>(
    row: &Row<'_>,
    column: &str,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> rusqlite::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(column)?;
    parse(&raw).map_err(|e| {
        let index = row.as_ref().column_index(column).unwrap_or_default();
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
    })
}
