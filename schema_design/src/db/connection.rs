//! Database connection handling
//!
//! A `DatabaseConnection` is opened by the caller, lent to the extractor and
//! closed by the caller. No connection state is shared between analyses.

use std::time::Duration;

use sqlx::{
    mysql::MySqlPoolOptions, postgres::PgPoolOptions, sqlite::SqlitePoolOptions, MySql, Pool,
    Postgres, Sqlite,
};

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};

/// Enumeration of supported database types
#[derive(Debug, Clone)]
pub enum DatabaseConnection {
    Postgres(Pool<Postgres>),
    MySql(Pool<MySql>),
    Sqlite(Pool<Sqlite>),
}

impl DatabaseConnection {
    /// Open a connection pool from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool_size = config.pool_size.unwrap_or(5);
        let timeout = config.timeout();

        tracing::debug!(driver = %config.driver, pool_size, "Opening database connection");

        let connection = match config.driver.as_str() {
            "postgres" | "postgresql" => DatabaseConnection::Postgres(
                PgPoolOptions::new()
                    .max_connections(pool_size)
                    .acquire_timeout(timeout)
                    .connect(&config.url)
                    .await
                    .map_err(|e| Error::extraction_with("Failed to connect to PostgreSQL", e))?,
            ),
            "mysql" => DatabaseConnection::MySql(
                MySqlPoolOptions::new()
                    .max_connections(pool_size)
                    .acquire_timeout(timeout)
                    .connect(&config.url)
                    .await
                    .map_err(|e| Error::extraction_with("Failed to connect to MySQL", e))?,
            ),
            "sqlite" => DatabaseConnection::Sqlite(
                SqlitePoolOptions::new()
                    .max_connections(pool_size)
                    .acquire_timeout(timeout)
                    .connect(&config.url)
                    .await
                    .map_err(|e| Error::extraction_with("Failed to open SQLite database", e))?,
            ),
            _ => {
                return Err(Error::ConfigError(format!(
                    "Unsupported database driver: {}",
                    config.driver
                )))
            }
        };

        Ok(connection)
    }

    /// Short driver name
    pub fn driver(&self) -> &'static str {
        match self {
            DatabaseConnection::Postgres(_) => "postgres",
            DatabaseConnection::MySql(_) => "mysql",
            DatabaseConnection::Sqlite(_) => "sqlite",
        }
    }

    /// Close the pool, waiting for checked-out connections to be returned
    pub async fn close(self) {
        match self {
            DatabaseConnection::Postgres(pool) => pool.close().await,
            DatabaseConnection::MySql(pool) => pool.close().await,
            DatabaseConnection::Sqlite(pool) => pool.close().await,
        }
    }
}

/// Default catalog timeout when the caller supplies none
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
