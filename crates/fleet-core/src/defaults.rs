//! Centralized default constants for fleetcare.
//!
//! Every crate references these instead of defining its own magic numbers.

// =============================================================================
// STORAGE
// =============================================================================

/// Deadline for a single request-scoped storage operation, in seconds.
pub const STORAGE_TIMEOUT_SECS: u64 = 10;

/// Default maximum number of pooled database connections.
pub const DB_MAX_CONNECTIONS: u32 = 10;

/// Default database URL when `DATABASE_URL` is unset.
pub const DATABASE_URL: &str = "postgres://localhost/fleetcare";

// =============================================================================
// REFERENCE SERVICE
// =============================================================================

/// Base URL of the sibling service exposing services, consumables and assets.
pub const REFERENCE_BASE_URL: &str = "http://localhost:5500";

/// Path serving the full service list as a JSON array.
pub const SERVICES_PATH: &str = "/services";

/// Path serving the full consumable list as a JSON array.
pub const CONSUMABLES_PATH: &str = "/consumables";

/// Path prefix serving a single asset as a JSON object (`/assets/{id}`).
pub const ASSETS_PATH: &str = "/assets";

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8080;

// =============================================================================
// RESULT CHANNEL
// =============================================================================

/// Redirect target listing maintenances of an asset.
pub const MAINTENANCES_PATH: &str = "/maintenances";

/// Redirect target listing schedules of an asset.
pub const SCHEDULES_PATH: &str = "/schedules";
