//! Write side: maintenance and schedule mutations.
//!
//! Inputs are validated before any storage access. Every storage call runs
//! under the request [`Deadline`]; nothing is retried.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use fleet_core::{
    new_v7, Deadline, Error, Maintenance, MaintenanceRepository, Result, ScheduleFields,
};

use crate::store::{ScheduleKey, SchedulePlacement, ScheduleStore, ScheduleWrite};

/// Mutations of maintenances and their schedules, over one storage shape.
#[derive(Clone)]
pub struct ScheduleService {
    maintenances: Arc<dyn MaintenanceRepository>,
    store: Arc<dyn ScheduleStore>,
    deadline: Deadline,
}

fn require_label(label: &str) -> Result<String> {
    let label = label.trim();
    if label.is_empty() {
        return Err(Error::InvalidInput("Label is required".to_string()));
    }
    Ok(label.to_string())
}

impl ScheduleService {
    pub fn new(
        maintenances: Arc<dyn MaintenanceRepository>,
        store: Arc<dyn ScheduleStore>,
        deadline: Deadline,
    ) -> Self {
        Self {
            maintenances,
            store,
            deadline,
        }
    }

    /// Create a maintenance with an empty schedule collection.
    ///
    /// Callers downgrade a storage error here to an inline message, see
    /// [`crate::Redirect::after_create_maintenance`].
    pub async fn create_maintenance(&self, asset_id: Uuid, label: &str) -> Result<Maintenance> {
        let label = require_label(label)?;
        let maintenance = Maintenance::new(new_v7(), asset_id, label);

        self.deadline
            .run("insert_maintenance", self.maintenances.insert(&maintenance))
            .await?;

        info!(
            subsystem = "schedule",
            component = "mutator",
            op = "create_maintenance",
            maintenance_id = %maintenance.id,
            asset_id = %asset_id,
            "Maintenance created"
        );
        Ok(maintenance)
    }

    /// Rename a maintenance. Returns its asset id.
    pub async fn rename_maintenance(&self, id: Uuid, label: &str) -> Result<Uuid> {
        let label = require_label(label)?;
        let existing = self.get_maintenance(id).await?;

        let updated = self
            .deadline
            .run("update_maintenance", self.maintenances.update_label(id, &label))
            .await?;
        if !updated {
            return Err(Error::MaintenanceNotFound(id));
        }

        info!(
            subsystem = "schedule",
            component = "mutator",
            op = "rename_maintenance",
            maintenance_id = %id,
            asset_id = %existing.asset_id,
            "Maintenance renamed"
        );
        Ok(existing.asset_id)
    }

    /// Delete a maintenance. Returns its asset id.
    ///
    /// Referenced schedule records of the maintenance are left in place.
    pub async fn delete_maintenance(&self, id: Uuid) -> Result<Uuid> {
        let existing = self.get_maintenance(id).await?;

        let deleted = self
            .deadline
            .run("delete_maintenance", self.maintenances.delete(id))
            .await?;
        if !deleted {
            return Err(Error::MaintenanceNotFound(id));
        }

        info!(
            subsystem = "schedule",
            component = "mutator",
            op = "delete_maintenance",
            maintenance_id = %id,
            asset_id = %existing.asset_id,
            "Maintenance deleted"
        );
        Ok(existing.asset_id)
    }

    pub async fn add_schedule(
        &self,
        placement: &SchedulePlacement,
        fields: ScheduleFields,
    ) -> Result<ScheduleWrite> {
        fields.validate()?;
        self.store.add(placement, fields).await
    }

    pub async fn edit_schedule(
        &self,
        key: &ScheduleKey,
        fields: ScheduleFields,
    ) -> Result<ScheduleWrite> {
        fields.validate()?;
        self.store.edit(key, fields).await
    }

    pub async fn delete_schedule(&self, key: &ScheduleKey) -> Result<ScheduleWrite> {
        self.store.delete(key).await
    }

    async fn get_maintenance(&self, id: Uuid) -> Result<Maintenance> {
        self.deadline
            .run("get_maintenance", self.maintenances.get(id))
            .await?
            .ok_or(Error::MaintenanceNotFound(id))
    }
}
