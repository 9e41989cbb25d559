//! # fleet-core
//!
//! Core types, traits, and abstractions for fleetcare, the asset
//! maintenance tracker.
//!
//! This crate provides the domain model (assets, services, consumables,
//! maintenances and their schedules), the storage and reference-data traits
//! that backends implement, and the shared error type.

pub mod deadline;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;
pub mod uuid_utils;

// Re-export commonly used types at crate root
pub use deadline::Deadline;
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
pub use uuid_utils::{canonical, new_v7, parse_id, parse_id_list, parse_optional_id};
