//! # fleet-db
//!
//! PostgreSQL database layer for fleetcare.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for assets, reference catalogs, maintenances
//!   (with their embedded schedule array) and referenced schedule records
//! - An in-memory store implementing the same traits, for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use fleet_db::{Database, Maintenance, MaintenanceRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/fleet").await?;
//!     db.migrate().await?;
//!
//!     let m = Maintenance::new(fleet_db::new_v7(), asset_id, "Oil Changes");
//!     db.maintenances.insert(&m).await?;
//!     Ok(())
//! }
//! ```
pub mod assets;
pub mod maintenances;
pub mod memory;
pub mod pool;
pub mod references;
pub mod schedules;

// Always compiled so integration tests in tests/ can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

pub use fleet_core::*;

pub use assets::PgAssetRepository;
pub use maintenances::PgMaintenanceRepository;
pub use memory::MemoryStore;
pub use pool::{close_pool, create_pool, create_pool_with_config, PoolConfig};
pub use references::PgReferenceRepository;
pub use schedules::PgScheduleRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Asset records.
    pub assets: PgAssetRepository,
    /// Service and consumable catalogs.
    pub references: PgReferenceRepository,
    /// Maintenance records and their embedded schedules.
    pub maintenances: PgMaintenanceRepository,
    /// Schedules stored as independent records.
    pub schedules: PgScheduleRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            assets: PgAssetRepository::new(pool.clone()),
            references: PgReferenceRepository::new(pool.clone()),
            maintenances: PgMaintenanceRepository::new(pool.clone()),
            schedules: PgScheduleRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Close the pool. Called once on shutdown.
    pub async fn close(&self) {
        close_pool(&self.pool).await;
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}
