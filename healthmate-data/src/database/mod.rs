//! Database connection module for the HealthMate application
//!
//! Provides a SQLite connection pool behind a process-wide handle. The pool
//! is optional at runtime: repositories fall back to in-memory storage when
//! it is unavailable.

use std::env;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing::{info, warn};

pub mod migrations;

/// Global database pool used throughout the application
static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

/// Database connection pool enum
///
/// A single SQLite variant today; another backend would be added here the
/// same way.
#[derive(Debug, Clone)]
pub enum DatabasePool {
    /// SQLite connection pool
    #[cfg(feature = "sqlite")]
    SQLite(Arc<r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>>),
}

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    /// Database pool already initialized
    #[error("Database pool is already initialized")]
    PoolAlreadyInitialized,

    /// Database pool not initialized
    #[error("Database pool is not initialized")]
    PoolNotInitialized,

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),

    /// Generic database error
    #[error("Database error: {0}")]
    GenericError(String),
}

impl From<String> for DatabaseError {
    fn from(error: String) -> Self {
        DatabaseError::GenericError(error)
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub sqlite_path: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: "data/healthmate.db".to_string(),
            max_connections: 10,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Self {
        let sqlite_path = env::var("DB_SQLITE_PATH")
            .unwrap_or_else(|_| "data/healthmate.db".to_string());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        info!(
            "Database configuration: path={}, max_connections={}",
            sqlite_path, max_connections
        );

        DatabaseConfig {
            sqlite_path,
            max_connections,
        }
    }
}

/// Initialize the database connection pool from environment configuration
pub fn initialize_database_pool() -> Result<(), DatabaseError> {
    if DB_POOL.get().is_some() {
        return Err(DatabaseError::PoolAlreadyInitialized);
    }

    let config = DatabaseConfig::from_env();
    let pool = initialize_sqlite_pool(&config)?;

    DB_POOL
        .set(pool)
        .map_err(|_| DatabaseError::PoolAlreadyInitialized)?;

    run_migrations()
}

/// Get the database connection pool
pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL.get().cloned().ok_or(DatabaseError::PoolNotInitialized)
}

/// Short human-readable description of the active connection, if any
pub fn get_connection_info() -> Option<String> {
    DB_POOL.get().map(|pool| match pool {
        #[cfg(feature = "sqlite")]
        DatabasePool::SQLite(p) => {
            format!("sqlite pool: {} connections", p.state().connections)
        }
    })
}

/// Initialize SQLite connection pool
#[cfg(feature = "sqlite")]
fn initialize_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    use rusqlite::OpenFlags;
    use std::fs;
    use std::path::Path;

    info!("Initializing SQLite database at: {}", config.sqlite_path);

    // Create parent directory if it doesn't exist
    if let Some(parent) = Path::new(&config.sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(
                    "Failed to create directory {:?}: {}, using in-memory database",
                    parent, e
                );
                return initialize_in_memory_sqlite_pool(config);
            }
        }
    }

    let manager = r2d2_sqlite::SqliteConnectionManager::file(&config.sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE);

    let pool = r2d2::Pool::builder()
        .max_size(config.max_connections)
        .build(manager)?;

    Ok(DatabasePool::SQLite(Arc::new(pool)))
}

/// Initialize an in-memory SQLite pool
///
/// Used when the configured file path is unusable. A single connection keeps
/// every pooled handle on the same in-memory database.
#[cfg(feature = "sqlite")]
fn initialize_in_memory_sqlite_pool(_config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    let manager = r2d2_sqlite::SqliteConnectionManager::memory();

    let pool = r2d2::Pool::builder().max_size(1).build(manager)?;

    Ok(DatabasePool::SQLite(Arc::new(pool)))
}

/// Run schema migrations against the active pool
fn run_migrations() -> Result<(), DatabaseError> {
    match get_db_pool()? {
        #[cfg(feature = "sqlite")]
        DatabasePool::SQLite(pool) => {
            let conn = pool.get()?;
            migrations::run_migrations(&conn)
                .map_err(DatabaseError::MigrationError)
        }
    }
}
