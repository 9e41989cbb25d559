//! # fleet-reference
//!
//! Client for the sibling service that owns the service, consumable and
//! asset records. Implements [`fleet_core::ReferenceSource`] so the schedule
//! layer can resolve labels over HTTP instead of querying the local store.

pub mod http;

pub use http::{HttpReferenceSource, DEFAULT_BASE_URL};
