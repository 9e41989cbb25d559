//! Application context handed to the router.

use std::sync::Arc;

use tracing::info;

use fleet_core::{
    AssetRepository, Deadline, MaintenanceRepository, ReferenceRepository, ReferenceSource,
    Result, ScheduleRepository, StorageShape,
};
use fleet_db::{Database, MemoryStore};
use fleet_reference::HttpReferenceSource;
use fleet_schedule::{
    EmbeddedScheduleStore, NameResolver, ReferencedScheduleStore, ScheduleAggregator,
    ScheduleService, ScheduleStore, StoreReferenceSource,
};

use crate::config::{AppConfig, ReferenceSourceKind};

/// Everything a handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub schedules: ScheduleService,
    pub aggregator: ScheduleAggregator,
    /// Local catalogs, served as the reference-service endpoints.
    pub references: Arc<dyn ReferenceRepository>,
    pub assets: Arc<dyn AssetRepository>,
    pub deadline: Deadline,
}

/// The four repositories a state is assembled from.
pub struct Repositories {
    pub assets: Arc<dyn AssetRepository>,
    pub references: Arc<dyn ReferenceRepository>,
    pub maintenances: Arc<dyn MaintenanceRepository>,
    pub schedules: Arc<dyn ScheduleRepository>,
}

impl From<&Database> for Repositories {
    fn from(db: &Database) -> Self {
        Self {
            assets: Arc::new(db.assets.clone()),
            references: Arc::new(db.references.clone()),
            maintenances: Arc::new(db.maintenances.clone()),
            schedules: Arc::new(db.schedules.clone()),
        }
    }
}

impl From<&MemoryStore> for Repositories {
    fn from(store: &MemoryStore) -> Self {
        Self {
            assets: Arc::new(store.assets.clone()),
            references: Arc::new(store.references.clone()),
            maintenances: Arc::new(store.maintenances.clone()),
            schedules: Arc::new(store.schedules.clone()),
        }
    }
}

impl AppState {
    pub fn build(repos: Repositories, config: &AppConfig) -> Result<Self> {
        let deadline = Deadline::new(config.storage_timeout);

        let store: Arc<dyn ScheduleStore> = match config.schedule_storage {
            StorageShape::Embedded => Arc::new(EmbeddedScheduleStore::new(
                repos.maintenances.clone(),
                deadline,
            )),
            StorageShape::Referenced => Arc::new(ReferencedScheduleStore::new(
                repos.maintenances.clone(),
                repos.schedules.clone(),
                deadline,
            )),
        };

        let source: Arc<dyn ReferenceSource> = match config.reference_source {
            ReferenceSourceKind::Store => Arc::new(StoreReferenceSource::new(
                repos.references.clone(),
                repos.assets.clone(),
                config.reference_fetch,
                deadline,
            )),
            ReferenceSourceKind::Http => {
                Arc::new(HttpReferenceSource::new(config.reference_base_url.clone())?)
            }
        };

        info!(
            subsystem = "api",
            component = "state",
            storage_shape = config.schedule_storage.as_str(),
            reference_source = source.source_name(),
            reference_fetch = config.reference_fetch.as_str(),
            timeout_secs = config.storage_timeout.as_secs(),
            "Application state initialized"
        );

        Ok(Self {
            schedules: ScheduleService::new(repos.maintenances.clone(), store.clone(), deadline),
            aggregator: ScheduleAggregator::new(
                repos.maintenances,
                store,
                NameResolver::new(source),
                deadline,
            ),
            references: repos.references,
            assets: repos.assets,
            deadline,
        })
    }
}
