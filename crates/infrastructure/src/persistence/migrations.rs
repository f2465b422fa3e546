//! Database migrations
//!
//! Schema versions are tracked in `schema_version`. Each version has one
//! `migrate_vN` function; `run_migrations` applies the missing ones in order.

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_schema_version(conn)?;

    if current_version < SCHEMA_VERSION {
        info!(
            from_version = current_version,
            to_version = SCHEMA_VERSION,
            "Running database migrations"
        );

        if current_version < 1 {
            if let Err(e) = migrate_v1(conn) {
                error!(version = 1, error = %e, "Migration V001 (bookings and vehicles) failed");
                return Err(e);
            }
        }

        set_schema_version(conn, SCHEMA_VERSION)?;
        info!(version = SCHEMA_VERSION, "Database migrations complete");
    } else {
        debug!(version = current_version, "Database schema is up to date");
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration to version 1: bookings and the vehicle catalog
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: bookings and vehicles");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS vehicles (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            model_name TEXT NOT NULL,
            capacity INTEGER NOT NULL DEFAULT 0,
            luggage_space INTEGER NOT NULL DEFAULT 0,
            model_year INTEGER NOT NULL DEFAULT 0,
            per_hour_rate REAL NOT NULL,
            per_km_rate REAL,
            base_fee REAL NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS bookings (
            id TEXT PRIMARY KEY,
            pickup TEXT NOT NULL,
            dropoff TEXT NOT NULL,
            trip_date TEXT NOT NULL,
            trip_time TEXT NOT NULL,
            hours REAL NOT NULL,
            passengers INTEGER NOT NULL,
            transfer_type TEXT NOT NULL,
            vehicle_id TEXT NOT NULL,
            vehicle_name TEXT NOT NULL,
            vehicle_rate REAL NOT NULL,
            customer_name TEXT NOT NULL,
            customer_email TEXT NOT NULL,
            customer_phone TEXT NOT NULL,
            customer_address TEXT NOT NULL,
            distance_km REAL NOT NULL,
            duration_min INTEGER NOT NULL,
            base_fare REAL NOT NULL,
            fare_base_fee REAL NOT NULL,
            fare_hour REAL NOT NULL,
            fare_distance REAL NOT NULL,
            fare_time REAL NOT NULL,
            fare_toll REAL NOT NULL,
            fare_total REAL NOT NULL,
            total_fare REAL NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('pending', 'confirmed', 'cancelled', 'completed')),
            invoice_sent INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_vehicles_position ON vehicles(position);
        CREATE INDEX IF NOT EXISTS idx_bookings_created ON bookings(created_at);
        CREATE INDEX IF NOT EXISTS idx_bookings_status ON bookings(status);
        ",
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_create_tables() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert!(tables.contains(&"bookings".to_string()));
        assert!(tables.contains(&"vehicles".to_string()));
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}
