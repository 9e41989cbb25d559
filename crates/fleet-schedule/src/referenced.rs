//! Schedules stored as independent records.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use fleet_core::{
    new_v7, Deadline, Error, Maintenance, MaintenanceRepository, Result, ScheduleFields,
    ScheduleRecord, ScheduleRepository, StorageShape,
};

use crate::store::{ScheduleKey, SchedulePlacement, ScheduleStore, ScheduleWrite};

/// [`ScheduleStore`] keeping each entry as its own record carrying the
/// maintenance and asset ids.
///
/// Records are not removed when their maintenance is deleted.
#[derive(Clone)]
pub struct ReferencedScheduleStore {
    maintenances: Arc<dyn MaintenanceRepository>,
    schedules: Arc<dyn ScheduleRepository>,
    deadline: Deadline,
}

impl ReferencedScheduleStore {
    pub fn new(
        maintenances: Arc<dyn MaintenanceRepository>,
        schedules: Arc<dyn ScheduleRepository>,
        deadline: Deadline,
    ) -> Self {
        Self {
            maintenances,
            schedules,
            deadline,
        }
    }

    /// Direct asset id wins; otherwise the maintenance's asset.
    async fn placement_asset(&self, placement: &SchedulePlacement) -> Result<Uuid> {
        match (placement.asset_id, placement.maintenance_id) {
            (Some(asset_id), _) => Ok(asset_id),
            (None, Some(maintenance_id)) => self
                .deadline
                .run("get_maintenance", self.maintenances.get(maintenance_id))
                .await?
                .map(|m| m.asset_id)
                .ok_or(Error::MaintenanceNotFound(maintenance_id)),
            (None, None) => Err(Error::InvalidInput("Missing asset_id".to_string())),
        }
    }

    async fn record(&self, schedule_id: Uuid) -> Result<ScheduleRecord> {
        self.deadline
            .run("get_schedule", self.schedules.get(schedule_id))
            .await?
            .ok_or(Error::ScheduleNotFound(schedule_id))
    }
}

#[async_trait]
impl ScheduleStore for ReferencedScheduleStore {
    fn shape(&self) -> StorageShape {
        StorageShape::Referenced
    }

    async fn add(
        &self,
        placement: &SchedulePlacement,
        fields: ScheduleFields,
    ) -> Result<ScheduleWrite> {
        let asset_id = self.placement_asset(placement).await?;
        let record = ScheduleRecord {
            id: new_v7(),
            maintenance_id: placement.maintenance_id,
            asset_id,
            fields,
        };

        self.deadline
            .run("insert_schedule", self.schedules.insert(&record))
            .await?;

        info!(
            subsystem = "schedule",
            component = "referenced",
            op = "add",
            schedule_id = %record.id,
            asset_id = %asset_id,
            "Schedule record inserted"
        );
        Ok(ScheduleWrite {
            schedule_id: record.id,
            asset_id,
        })
    }

    async fn edit(&self, key: &ScheduleKey, fields: ScheduleFields) -> Result<ScheduleWrite> {
        let matched = self
            .deadline
            .run("update_schedule", self.schedules.update(key.schedule_id, &fields))
            .await?;
        if !matched {
            return Err(Error::ScheduleNotFound(key.schedule_id));
        }

        let record = self.record(key.schedule_id).await?;
        info!(
            subsystem = "schedule",
            component = "referenced",
            op = "edit",
            schedule_id = %record.id,
            asset_id = %record.asset_id,
            "Schedule record updated"
        );
        Ok(ScheduleWrite {
            schedule_id: record.id,
            asset_id: record.asset_id,
        })
    }

    async fn delete(&self, key: &ScheduleKey) -> Result<ScheduleWrite> {
        let record = self.record(key.schedule_id).await?;

        let removed = self
            .deadline
            .run("delete_schedule", self.schedules.delete(record.id))
            .await?;
        if !removed {
            return Err(Error::ScheduleNotFound(record.id));
        }

        info!(
            subsystem = "schedule",
            component = "referenced",
            op = "delete",
            schedule_id = %record.id,
            asset_id = %record.asset_id,
            "Schedule record deleted"
        );
        Ok(ScheduleWrite {
            schedule_id: record.id,
            asset_id: record.asset_id,
        })
    }

    async fn list_for_asset(&self, asset_id: Uuid) -> Result<Vec<ScheduleRecord>> {
        self.deadline
            .run("list_schedules", self.schedules.list_for_asset(asset_id))
            .await
    }

    async fn list_for_maintenance(&self, maintenance: &Maintenance) -> Result<Vec<ScheduleRecord>> {
        self.deadline
            .run(
                "list_schedules",
                self.schedules.list_for_maintenance(maintenance.id),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_db::MemoryStore;

    fn fields(label: &str) -> ScheduleFields {
        ScheduleFields {
            label: label.to_string(),
            days: 7,
            ..Default::default()
        }
    }

    fn store(memory: &MemoryStore) -> ReferencedScheduleStore {
        ReferencedScheduleStore::new(
            Arc::new(memory.maintenances.clone()),
            Arc::new(memory.schedules.clone()),
            Deadline::default(),
        )
    }

    #[tokio::test]
    async fn test_add_resolves_asset_through_maintenance() {
        let memory = MemoryStore::new();
        let m = Maintenance::new(new_v7(), new_v7(), "Filters");
        memory.maintenances.insert(&m).await.unwrap();

        let placement = SchedulePlacement {
            maintenance_id: Some(m.id),
            asset_id: None,
        };
        let write = store(&memory).add(&placement, fields("Monthly")).await.unwrap();
        assert_eq!(write.asset_id, m.asset_id);

        let record = memory.schedules.get(write.schedule_id).await.unwrap().unwrap();
        assert_eq!(record.maintenance_id, Some(m.id));
    }

    #[tokio::test]
    async fn test_add_prefers_direct_asset_id() {
        let memory = MemoryStore::new();
        let asset = new_v7();
        let placement = SchedulePlacement {
            maintenance_id: Some(new_v7()),
            asset_id: Some(asset),
        };
        let write = store(&memory).add(&placement, fields("Weekly")).await.unwrap();
        assert_eq!(write.asset_id, asset);
    }

    #[tokio::test]
    async fn test_add_placement_errors() {
        let memory = MemoryStore::new();
        let s = store(&memory);

        let err = s
            .add(&SchedulePlacement::default(), fields("A"))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Invalid input: Missing asset_id");

        let dangling = SchedulePlacement {
            maintenance_id: Some(new_v7()),
            asset_id: None,
        };
        let err = s.add(&dangling, fields("A")).await.unwrap_err();
        assert!(matches!(err, Error::MaintenanceNotFound(_)));
    }

    #[tokio::test]
    async fn test_edit_and_delete_unknown_are_not_found() {
        let memory = MemoryStore::new();
        let s = store(&memory);
        let key = ScheduleKey {
            schedule_id: new_v7(),
            maintenance_id: None,
        };
        assert!(s.edit(&key, fields("X")).await.unwrap_err().is_not_found());
        assert!(s.delete(&key).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_edit_rederives_asset_from_record() {
        let memory = MemoryStore::new();
        let s = store(&memory);
        let asset = new_v7();
        let write = s
            .add(
                &SchedulePlacement {
                    maintenance_id: None,
                    asset_id: Some(asset),
                },
                fields("Weekly"),
            )
            .await
            .unwrap();

        let key = ScheduleKey {
            schedule_id: write.schedule_id,
            maintenance_id: None,
        };
        let edited = s.edit(&key, fields("Fortnightly")).await.unwrap();
        assert_eq!(edited.asset_id, asset);

        let record = memory.schedules.get(write.schedule_id).await.unwrap().unwrap();
        assert_eq!(record.fields.label, "Fortnightly");
    }
}
