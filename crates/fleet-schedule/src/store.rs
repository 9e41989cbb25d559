//! The schedule storage capability.

use async_trait::async_trait;
use uuid::Uuid;

use fleet_core::{Maintenance, Result, ScheduleFields, ScheduleRecord, StorageShape};

/// Where a new schedule goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulePlacement {
    /// Owning maintenance. Required by the embedded shape.
    pub maintenance_id: Option<Uuid>,
    /// Owning asset. The referenced shape falls back to the maintenance's asset.
    pub asset_id: Option<Uuid>,
}

/// Identifies an existing schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleKey {
    pub schedule_id: Uuid,
    /// Owner of the array holding the entry. Required by the embedded shape.
    pub maintenance_id: Option<Uuid>,
}

/// Outcome of a schedule mutation: the entry and the asset it belongs to,
/// re-derived from storage after the write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWrite {
    pub schedule_id: Uuid,
    pub asset_id: Uuid,
}

/// Persistence of schedule entries in one storage shape.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    fn shape(&self) -> StorageShape;

    /// Create an entry. The new id is generated here.
    async fn add(&self, placement: &SchedulePlacement, fields: ScheduleFields)
        -> Result<ScheduleWrite>;

    /// Overwrite an entry's fields. Unknown ids are Not-Found.
    async fn edit(&self, key: &ScheduleKey, fields: ScheduleFields) -> Result<ScheduleWrite>;

    /// Remove an entry. Unknown or already removed ids are Not-Found.
    async fn delete(&self, key: &ScheduleKey) -> Result<ScheduleWrite>;

    /// Every schedule of an asset, empty when there are none.
    async fn list_for_asset(&self, asset_id: Uuid) -> Result<Vec<ScheduleRecord>>;

    /// Schedules belonging to `maintenance`.
    async fn list_for_maintenance(&self, maintenance: &Maintenance) -> Result<Vec<ScheduleRecord>>;
}
