//! Read side: assemble display views from storage and reference data.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;
use uuid::Uuid;

use fleet_core::{canonical, Deadline, Error, MaintenanceRepository, Result};

use crate::resolver::{collect_schedule_ids, NameResolver};
use crate::store::ScheduleStore;
use crate::views::{AssetScheduleView, MaintenanceListView, MaintenanceView};

/// Optional message echoed back after a redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash {
    pub message: Option<String>,
    pub message_type: Option<String>,
}

/// Builds the views of the schedule layer.
///
/// List queries return empty collections when nothing matches. Storage
/// failures propagate; reference failures degrade inside the resolver.
#[derive(Clone)]
pub struct ScheduleAggregator {
    maintenances: Arc<dyn MaintenanceRepository>,
    store: Arc<dyn ScheduleStore>,
    resolver: NameResolver,
    deadline: Deadline,
}

impl ScheduleAggregator {
    pub fn new(
        maintenances: Arc<dyn MaintenanceRepository>,
        store: Arc<dyn ScheduleStore>,
        resolver: NameResolver,
        deadline: Deadline,
    ) -> Self {
        Self {
            maintenances,
            store,
            resolver,
            deadline,
        }
    }

    /// All schedules of an asset with resolved names.
    pub async fn schedules_for_asset(&self, asset_id: Uuid, flash: Flash) -> Result<AssetScheduleView> {
        let start = Instant::now();

        let schedules = self.store.list_for_asset(asset_id).await?;
        let maintenances = self
            .deadline
            .run(
                "list_maintenances",
                self.maintenances.list_for_asset(asset_id),
            )
            .await?;

        let ids = collect_schedule_ids(schedules.iter().map(|s| &s.fields));
        let names = self.resolver.build_name_maps(&ids).await;
        let asset_label = self.resolver.resolve_asset_label(asset_id).await;
        let (services, consumables) = self.resolver.reference_lists().await;

        let maintenance_labels = maintenances
            .iter()
            .map(|m| (canonical(&m.id), m.label.clone()))
            .collect();

        debug!(
            subsystem = "schedule",
            component = "aggregate",
            op = "schedules_for_asset",
            storage_shape = self.store.shape().as_str(),
            asset_id = %asset_id,
            result_count = schedules.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Built schedule view"
        );

        Ok(AssetScheduleView {
            asset_id,
            asset_label,
            maintenances,
            schedules,
            names,
            services,
            consumables,
            maintenance_labels,
            message: flash.message,
            message_type: flash.message_type,
        })
    }

    /// Maintenances of an asset, with name maps over the whole catalogs.
    pub async fn maintenances_for_asset(
        &self,
        asset_id: Uuid,
        flash: Flash,
    ) -> Result<MaintenanceListView> {
        let maintenances = self
            .deadline
            .run(
                "list_maintenances",
                self.maintenances.list_for_asset(asset_id),
            )
            .await?;

        let (services, consumables) = self.resolver.reference_lists().await;
        let names = NameResolver::catalog_name_maps(&services, &consumables);
        let asset_label = self.resolver.resolve_asset_label(asset_id).await;

        debug!(
            subsystem = "schedule",
            component = "aggregate",
            op = "maintenances_for_asset",
            asset_id = %asset_id,
            result_count = maintenances.len(),
            "Built maintenance list view"
        );

        Ok(MaintenanceListView {
            asset_id,
            asset_label,
            maintenances,
            services,
            consumables,
            names,
            message: flash.message,
            message_type: flash.message_type,
        })
    }

    /// One maintenance with its schedules. Not-Found for an unknown id.
    pub async fn maintenance_detail(&self, id: Uuid) -> Result<MaintenanceView> {
        let maintenance = self
            .deadline
            .run("get_maintenance", self.maintenances.get(id))
            .await?
            .ok_or(Error::MaintenanceNotFound(id))?;

        let schedules = self.store.list_for_maintenance(&maintenance).await?;
        let ids = collect_schedule_ids(schedules.iter().map(|s| &s.fields));
        let names = self.resolver.build_name_maps(&ids).await;

        Ok(MaintenanceView {
            maintenance,
            schedules,
            names,
        })
    }
}
