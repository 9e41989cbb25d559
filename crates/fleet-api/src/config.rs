//! Process configuration read from the environment.
//!
//! Environment variables:
//!   DATABASE_URL          - PostgreSQL connection string
//!   HOST, PORT            - bind address (default 0.0.0.0:8080)
//!   SCHEDULE_STORAGE      - "embedded" or "referenced" (default "embedded")
//!   REFERENCE_SOURCE      - "store" or "http" (default "store")
//!   REFERENCE_FETCH       - "all" or "by_ids" (default "all")
//!   REFERENCE_BASE_URL    - sibling reference service (default http://localhost:5500)
//!   STORAGE_TIMEOUT_SECS  - per storage call deadline (default 10)
//!   DB_MAX_CONNECTIONS    - pool size (default 10)

use std::str::FromStr;
use std::time::Duration;

use fleet_core::defaults;
use fleet_core::{Error, Result, StorageShape};
use fleet_schedule::FetchStrategy;

/// Where reference data (services, consumables, assets) comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferenceSourceKind {
    /// Query the local store.
    #[default]
    Store,
    /// Call the sibling reference service over HTTP.
    Http,
}

impl FromStr for ReferenceSourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "store" => Ok(ReferenceSourceKind::Store),
            "http" => Ok(ReferenceSourceKind::Http),
            other => Err(Error::Config(format!(
                "unknown reference source '{}' (expected 'store' or 'http')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub schedule_storage: StorageShape,
    pub reference_source: ReferenceSourceKind,
    pub reference_fetch: FetchStrategy,
    pub reference_base_url: String,
    pub storage_timeout: Duration,
    pub db_max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: defaults::DATABASE_URL.to_string(),
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            schedule_storage: StorageShape::Embedded,
            reference_source: ReferenceSourceKind::Store,
            reference_fetch: FetchStrategy::All,
            reference_base_url: defaults::REFERENCE_BASE_URL.to_string(),
            storage_timeout: Duration::from_secs(defaults::STORAGE_TIMEOUT_SECS),
            db_max_connections: defaults::DB_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys keep their defaults; numbers
    /// that fail to parse fall back to the default as well.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        if let Some(shape) = lookup("SCHEDULE_STORAGE") {
            config.schedule_storage = shape.parse()?;
        }
        if let Some(source) = lookup("REFERENCE_SOURCE") {
            config.reference_source = source.parse()?;
        }
        if let Some(fetch) = lookup("REFERENCE_FETCH") {
            config.reference_fetch = fetch.parse()?;
        }
        if let Some(url) = lookup("REFERENCE_BASE_URL") {
            config.reference_base_url = url;
        }
        if let Some(secs) = lookup("STORAGE_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            if secs == 0 {
                return Err(Error::Config(
                    "STORAGE_TIMEOUT_SECS must be greater than zero".to_string(),
                ));
            }
            config.storage_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = lookup("DB_MAX_CONNECTIONS").and_then(|n| n.parse().ok()) {
            config.db_max_connections = n;
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage_timeout, Duration::from_secs(10));
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("SCHEDULE_STORAGE", "referenced"),
            ("REFERENCE_SOURCE", "HTTP"),
            ("REFERENCE_FETCH", "by_ids"),
            ("REFERENCE_BASE_URL", "http://refs:5500"),
            ("PORT", "9000"),
            ("STORAGE_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.schedule_storage, StorageShape::Referenced);
        assert_eq!(config.reference_source, ReferenceSourceKind::Http);
        assert_eq!(config.reference_fetch, FetchStrategy::ByIds);
        assert_eq!(config.reference_base_url, "http://refs:5500");
        assert_eq!(config.port, 9000);
        assert_eq!(config.storage_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_enumeration_is_config_error() {
        let err = AppConfig::from_lookup(lookup(&[("SCHEDULE_STORAGE", "nested")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = AppConfig::from_lookup(lookup(&[("REFERENCE_SOURCE", "grpc")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = AppConfig::from_lookup(lookup(&[("STORAGE_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_unparseable_port_keeps_default() {
        let config = AppConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap();
        assert_eq!(config.port, 8080);
    }
}
