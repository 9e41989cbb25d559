//! Structured logging schema and field name constants for fleetcare.
//!
//! All crates use these names for structured `tracing` fields so log
//! aggregation can query by the same keys across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Request failed on a storage or internal error |
//! | WARN  | Recoverable issue, automatic fallback applied (reference data degraded) |
//! | INFO  | Lifecycle events (startup, shutdown), completed mutations |
//! | DEBUG | Decision points (dropped malformed ids, zero-match updates) |
//! | TRACE | Per-item iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "api", "db", "reference", "schedule"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "resolver", "aggregate", "mutator", "embedded", "http", "pool"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "add_schedule", "build_name_maps", "fetch_services"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Asset UUID being operated on.
pub const ASSET_ID: &str = "asset_id";

/// Maintenance UUID being operated on.
pub const MAINTENANCE_ID: &str = "maintenance_id";

/// Schedule UUID being operated on.
pub const SCHEDULE_ID: &str = "schedule_id";

/// Schedule storage shape in effect ("embedded", "referenced").
pub const STORAGE_SHAPE: &str = "storage_shape";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of records returned by a query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of identifiers requested for resolution.
pub const REQUESTED_COUNT: &str = "requested_count";

/// Number of identifiers that fell back to their raw string form.
pub const FALLBACK_COUNT: &str = "fallback_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Connections still checked out when the pool closed.
pub const IN_USE: &str = "in_use";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
