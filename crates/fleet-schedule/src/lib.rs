//! # fleet-schedule
//!
//! The schedule layer of fleetcare: how schedule entries are stored and
//! mutated against their owning maintenance, and how the service and
//! consumable ids they reference become display labels.
//!
//! - [`ScheduleStore`] with two implementations, [`EmbeddedScheduleStore`]
//!   (array inside the maintenance record) and [`ReferencedScheduleStore`]
//!   (independent records), selected by configuration.
//! - [`NameResolver`]: total id → label resolution over any
//!   [`fleet_core::ReferenceSource`].
//! - [`ScheduleAggregator`]: display-ready views for an asset or maintenance.
//! - [`ScheduleService`]: maintenance and schedule mutations.
//! - [`Redirect`]: the post-mutation result channel.

pub mod aggregate;
pub mod embedded;
pub mod mutator;
pub mod redirect;
pub mod referenced;
pub mod resolver;
pub mod source;
pub mod store;
pub mod views;

pub use aggregate::{Flash, ScheduleAggregator};
pub use embedded::EmbeddedScheduleStore;
pub use mutator::ScheduleService;
pub use redirect::{MessageType, Redirect};
pub use referenced::ReferencedScheduleStore;
pub use resolver::{collect_schedule_ids, label_map, NameResolver};
pub use source::{FetchStrategy, StoreReferenceSource};
pub use store::{ScheduleKey, SchedulePlacement, ScheduleStore, ScheduleWrite};
pub use views::{AssetScheduleView, MaintenanceListView, MaintenanceView};
