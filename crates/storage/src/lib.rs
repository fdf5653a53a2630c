//! SQLite persistence layer for the relay.
//!
//! Everything persisted — principals, invites, config — shares one
//! schemaless document envelope `(collection, key, value, created_at,
//! updated_at)`, unique on `(collection, key)`. The typed repositories sit
//! on top of the generic [`document`] operations.
//!
//! # Example
//!
//! ```no_run
//! use storage::{principal, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect, run migrations, seed first-boot config
//!     let db = Database::connect("sqlite:relay.db?mode=rwc").await?;
//!     db.init().await?;
//!
//!     principal::upsert(db.pool(), 111, "Alice", false, false).await?;
//!     assert!(principal::is_authorized(db.pool(), 111).await?);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod invite;
pub mod models;
pub mod principal;

pub use error::{Result, StorageError};
pub use invite::INVITE_TTL_SECS;
pub use models::{DocumentRow, InviteDoc, InviteGrant, Principal, PrincipalDoc};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Set high enough to handle concurrent turns each acquiring their own
    /// connection per operation.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist;
    /// `sqlite::memory:` gives a throwaway database for tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Run migrations and seed first-boot config defaults.
    pub async fn init(&self) -> Result<()> {
        self.migrate().await?;
        config::seed_defaults(&self.pool).await?;
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
