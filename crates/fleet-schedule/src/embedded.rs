//! Schedules stored as an array inside their maintenance record.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use fleet_core::{
    new_v7, Deadline, Error, Maintenance, MaintenanceRepository, Result, Schedule,
    ScheduleFields, ScheduleRecord, StorageShape,
};

use crate::store::{ScheduleKey, SchedulePlacement, ScheduleStore, ScheduleWrite};

/// [`ScheduleStore`] keeping entries in the owner's `schedules` array.
///
/// Each array change is one single-record update. An edit that loses a race
/// with a concurrent delete matches nothing and completes as a no-op.
#[derive(Clone)]
pub struct EmbeddedScheduleStore {
    maintenances: Arc<dyn MaintenanceRepository>,
    deadline: Deadline,
}

impl EmbeddedScheduleStore {
    pub fn new(maintenances: Arc<dyn MaintenanceRepository>, deadline: Deadline) -> Self {
        Self {
            maintenances,
            deadline,
        }
    }

    fn owner(maintenance_id: Option<Uuid>) -> Result<Uuid> {
        maintenance_id.ok_or_else(|| Error::InvalidInput("Missing maintenance_id".to_string()))
    }

    async fn owner_asset(&self, maintenance_id: Uuid) -> Result<Uuid> {
        self.deadline
            .run("get_maintenance", self.maintenances.get(maintenance_id))
            .await?
            .map(|m| m.asset_id)
            .ok_or(Error::MaintenanceNotFound(maintenance_id))
    }

    async fn require_entry(&self, maintenance_id: Uuid, schedule_id: Uuid) -> Result<()> {
        self.deadline
            .run(
                "find_schedule",
                self.maintenances.find_schedule(maintenance_id, schedule_id),
            )
            .await?
            .map(|_| ())
            .ok_or(Error::ScheduleNotFound(schedule_id))
    }
}

#[async_trait]
impl ScheduleStore for EmbeddedScheduleStore {
    fn shape(&self) -> StorageShape {
        StorageShape::Embedded
    }

    async fn add(
        &self,
        placement: &SchedulePlacement,
        fields: ScheduleFields,
    ) -> Result<ScheduleWrite> {
        let maintenance_id = Self::owner(placement.maintenance_id)?;
        let schedule = Schedule::new(new_v7(), fields);

        self.deadline
            .run(
                "ensure_schedules",
                self.maintenances.ensure_schedules(maintenance_id),
            )
            .await?;
        let pushed = self
            .deadline
            .run(
                "push_schedule",
                self.maintenances.push_schedule(maintenance_id, &schedule),
            )
            .await?;
        if !pushed {
            return Err(Error::MaintenanceNotFound(maintenance_id));
        }

        let asset_id = self.owner_asset(maintenance_id).await?;
        info!(
            subsystem = "schedule",
            component = "embedded",
            op = "add",
            maintenance_id = %maintenance_id,
            schedule_id = %schedule.id,
            asset_id = %asset_id,
            "Schedule appended"
        );
        Ok(ScheduleWrite {
            schedule_id: schedule.id,
            asset_id,
        })
    }

    async fn edit(&self, key: &ScheduleKey, fields: ScheduleFields) -> Result<ScheduleWrite> {
        let maintenance_id = Self::owner(key.maintenance_id)?;
        self.require_entry(maintenance_id, key.schedule_id).await?;

        let matched = self
            .deadline
            .run(
                "set_schedule",
                self.maintenances
                    .set_schedule(maintenance_id, key.schedule_id, &fields),
            )
            .await?;
        if !matched {
            // Removed between the existence check and the update.
            debug!(
                subsystem = "schedule",
                component = "embedded",
                op = "edit",
                maintenance_id = %maintenance_id,
                schedule_id = %key.schedule_id,
                "Positional update matched no element, treating as no-op"
            );
        }

        let asset_id = self.owner_asset(maintenance_id).await?;
        info!(
            subsystem = "schedule",
            component = "embedded",
            op = "edit",
            maintenance_id = %maintenance_id,
            schedule_id = %key.schedule_id,
            success = matched,
            "Schedule updated"
        );
        Ok(ScheduleWrite {
            schedule_id: key.schedule_id,
            asset_id,
        })
    }

    async fn delete(&self, key: &ScheduleKey) -> Result<ScheduleWrite> {
        let maintenance_id = Self::owner(key.maintenance_id)?;
        self.require_entry(maintenance_id, key.schedule_id).await?;

        let removed = self
            .deadline
            .run(
                "pull_schedule",
                self.maintenances.pull_schedule(maintenance_id, key.schedule_id),
            )
            .await?;
        if !removed {
            return Err(Error::ScheduleNotFound(key.schedule_id));
        }

        let asset_id = self.owner_asset(maintenance_id).await?;
        info!(
            subsystem = "schedule",
            component = "embedded",
            op = "delete",
            maintenance_id = %maintenance_id,
            schedule_id = %key.schedule_id,
            "Schedule removed"
        );
        Ok(ScheduleWrite {
            schedule_id: key.schedule_id,
            asset_id,
        })
    }

    async fn list_for_asset(&self, asset_id: Uuid) -> Result<Vec<ScheduleRecord>> {
        let maintenances = self
            .deadline
            .run(
                "list_maintenances",
                self.maintenances.list_for_asset(asset_id),
            )
            .await?;
        Ok(maintenances
            .iter()
            .flat_map(|m| m.schedules.iter().map(move |s| ScheduleRecord::from_embedded(m, s)))
            .collect())
    }

    async fn list_for_maintenance(&self, maintenance: &Maintenance) -> Result<Vec<ScheduleRecord>> {
        Ok(maintenance
            .schedules
            .iter()
            .map(|s| ScheduleRecord::from_embedded(maintenance, s))
            .collect())
    }
}
