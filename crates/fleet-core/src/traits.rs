//! Core traits for fleetcare abstractions.
//!
//! These traits define the storage and reference-data contracts that
//! concrete backends satisfy, so the schedule layer can run against
//! PostgreSQL, the in-memory store, or the sibling HTTP service alike.

use std::collections::BTreeSet;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// ASSET REPOSITORY
// =============================================================================

/// Repository for asset records.
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Insert a new asset.
    async fn insert(&self, asset: Asset) -> Result<()>;

    /// Fetch an asset by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Asset>>;

    /// List every asset.
    async fn list(&self) -> Result<Vec<Asset>>;
}

// =============================================================================
// REFERENCE REPOSITORY
// =============================================================================

/// Repository for the service and consumable catalogs.
#[async_trait]
pub trait ReferenceRepository: Send + Sync {
    /// Insert a service.
    async fn insert_service(&self, service: Service) -> Result<()>;

    /// Insert a consumable.
    async fn insert_consumable(&self, consumable: Consumable) -> Result<()>;

    /// List every service.
    async fn list_services(&self) -> Result<Vec<Service>>;

    /// List every consumable.
    async fn list_consumables(&self) -> Result<Vec<Consumable>>;

    /// Fetch the services whose id is in `ids`. Unknown ids are skipped.
    async fn services_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Service>>;

    /// Fetch the consumables whose id is in `ids`. Unknown ids are skipped.
    async fn consumables_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Consumable>>;
}

// =============================================================================
// MAINTENANCE REPOSITORY
// =============================================================================

/// Repository for maintenance records and their embedded schedule array.
///
/// Each method is a single-document operation; nothing here spans records.
#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    /// Insert a new maintenance record.
    async fn insert(&self, maintenance: &Maintenance) -> Result<()>;

    /// Fetch a maintenance by ID, schedules normalised to a vector.
    async fn get(&self, id: Uuid) -> Result<Option<Maintenance>>;

    /// List maintenances belonging to an asset.
    async fn list_for_asset(&self, asset_id: Uuid) -> Result<Vec<Maintenance>>;

    /// Set the label. Returns false if no record matched.
    async fn update_label(&self, id: Uuid, label: &str) -> Result<bool>;

    /// Delete the record. Returns false if no record matched.
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Set the schedule array to empty where it is currently missing or null.
    async fn ensure_schedules(&self, id: Uuid) -> Result<()>;

    /// Append one element to the schedule array. Returns false if no record matched.
    async fn push_schedule(&self, id: Uuid, schedule: &Schedule) -> Result<bool>;

    /// Look up one element of the owner's schedule array.
    async fn find_schedule(&self, id: Uuid, schedule_id: Uuid) -> Result<Option<Schedule>>;

    /// Replace the fields of the element with `schedule_id`, leaving every
    /// other element and the order untouched. Returns false if nothing matched.
    async fn set_schedule(
        &self,
        id: Uuid,
        schedule_id: Uuid,
        fields: &ScheduleFields,
    ) -> Result<bool>;

    /// Remove the element with `schedule_id`, preserving the order of the
    /// rest. Returns false if nothing matched.
    async fn pull_schedule(&self, id: Uuid, schedule_id: Uuid) -> Result<bool>;
}

// =============================================================================
// SCHEDULE REPOSITORY
// =============================================================================

/// Repository for schedules stored as independent records.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Insert a new schedule record.
    async fn insert(&self, record: &ScheduleRecord) -> Result<()>;

    /// Fetch a schedule record by ID.
    async fn get(&self, id: Uuid) -> Result<Option<ScheduleRecord>>;

    /// List schedule records belonging to an asset.
    async fn list_for_asset(&self, asset_id: Uuid) -> Result<Vec<ScheduleRecord>>;

    /// List schedule records linked to a maintenance.
    async fn list_for_maintenance(&self, maintenance_id: Uuid) -> Result<Vec<ScheduleRecord>>;

    /// Overwrite the mutable fields. Returns false if no record matched.
    async fn update(&self, id: Uuid, fields: &ScheduleFields) -> Result<bool>;

    /// Delete a record. Returns false if no record matched.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

// =============================================================================
// REFERENCE SOURCE
// =============================================================================

/// Source of truth for service, consumable and asset records.
///
/// Implementations either query the local store or call the sibling HTTP
/// service. Each call returns the full current set; nothing is cached.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Fetch every service.
    async fn fetch_services(&self) -> Result<Vec<Service>>;

    /// Fetch every consumable.
    async fn fetch_consumables(&self) -> Result<Vec<Consumable>>;

    /// Fetch the services needed to label `ids`.
    ///
    /// The default fetches everything and filters; sources able to query by
    /// identifier set override it.
    async fn fetch_services_by_ids(&self, ids: &BTreeSet<Uuid>) -> Result<Vec<Service>> {
        let all = self.fetch_services().await?;
        Ok(all.into_iter().filter(|s| ids.contains(&s.id)).collect())
    }

    /// Fetch the consumables needed to label `ids`.
    async fn fetch_consumables_by_ids(&self, ids: &BTreeSet<Uuid>) -> Result<Vec<Consumable>> {
        let all = self.fetch_consumables().await?;
        Ok(all.into_iter().filter(|c| ids.contains(&c.id)).collect())
    }

    /// Fetch a single asset.
    async fn fetch_asset(&self, id: Uuid) -> Result<Option<Asset>>;

    /// Short name for logs ("store", "http").
    fn source_name(&self) -> &'static str;
}
