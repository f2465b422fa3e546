//! Database connection management
//!
//! Provides SQLite connection pooling via r2d2.

use std::path::Path;
use std::sync::Arc;

use application::ApplicationError;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use thiserror::Error;
use tokio::task;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// Database errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// SQLite connection pool type alias
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Pooled connection type alias
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Create a new connection pool
pub fn create_pool(config: &DatabaseConfig) -> Result<ConnectionPool, DatabaseError> {
    info!(path = %config.path, max_connections = config.max_connections, "Creating database connection pool");

    let manager = if config.is_in_memory() {
        SqliteConnectionManager::memory()
    } else {
        if let Some(parent) = Path::new(&config.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::Migration(format!("Failed to create database directory: {e}"))
                })?;
            }
        }
        SqliteConnectionManager::file(&config.path)
    };

    let pool = Pool::builder()
        .max_size(config.max_connections)
        .build(manager)?;

    {
        let conn = pool.get()?;
        initialize_database(&conn, config.is_in_memory())?;
        if config.run_migrations {
            super::migrations::run_migrations(&conn)?;
        }
    }

    debug!("Database connection pool created successfully");
    Ok(pool)
}

fn initialize_database(conn: &Connection, in_memory: bool) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )?;
    if !in_memory {
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    }
    Ok(())
}

pub(crate) fn persistence_error(err: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Persistence(err.to_string())
}

/// Run blocking SQLite work on a pooled connection off the async runtime
pub(crate) async fn with_connection<T, F>(pool: &Arc<ConnectionPool>, work: F) -> Result<T, ApplicationError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, ApplicationError> + Send + 'static,
{
    let pool = Arc::clone(pool);
    task::spawn_blocking(move || {
        let conn: PooledConn = pool.get().map_err(persistence_error)?;
        work(&conn)
    })
    .await
    .map_err(persistence_error)?
}
