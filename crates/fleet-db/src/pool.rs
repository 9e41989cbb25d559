//! PostgreSQL connection pool.
//!
//! The pool is opened once at startup and closed on shutdown. Waiting for a
//! free connection is bounded by the same limit as a storage call, so an
//! exhausted pool surfaces as an error instead of a hung request.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use fleet_core::defaults::{DB_MAX_CONNECTIONS, STORAGE_TIMEOUT_SECS};
use fleet_core::{Error, Result};

/// Idle connections are dropped after ten minutes.
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DB_MAX_CONNECTIONS,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(STORAGE_TIMEOUT_SECS),
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }

    pub fn min_connections(mut self, n: u32) -> Self {
        self.min_connections = n.min(self.max_connections);
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    create_pool_with_config(database_url, PoolConfig::default()).await
}

pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(IDLE_TIMEOUT)
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "db",
        component = "pool",
        op = "open",
        max_connections = config.max_connections,
        pool_size = pool.size(),
        acquire_timeout_ms = config.acquire_timeout.as_millis() as u64,
        duration_ms = start.elapsed().as_millis() as u64,
        "Connection pool opened"
    );
    Ok(pool)
}

/// Close the pool, waiting for checked-out connections to come back.
pub async fn close_pool(pool: &PgPool) {
    let in_use = pool.size().saturating_sub(pool.num_idle() as u32);
    pool.close().await;
    info!(
        subsystem = "db",
        component = "pool",
        op = "close",
        in_use,
        "Connection pool closed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_wait_bounded_like_storage_calls() {
        let config = PoolConfig::default();
        assert_eq!(config.acquire_timeout, Duration::from_secs(STORAGE_TIMEOUT_SECS));
        assert_eq!(config.max_connections, DB_MAX_CONNECTIONS);
    }

    #[test]
    fn test_min_connections_capped_by_max() {
        let config = PoolConfig::new().max_connections(2).min_connections(5);
        assert_eq!(config.min_connections, 2);

        let config = PoolConfig::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(3));
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.acquire_timeout, Duration::from_secs(3));
    }
}
