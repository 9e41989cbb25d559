//! In-memory store backing every repository trait.
//!
//! Used by unit tests and by `SCHEDULE_STORAGE` experiments without a
//! database. All handles share one state behind an async `RwLock`, so a
//! `MemoryStore` clone observes the same data.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use fleet_core::{
    Asset, AssetRepository, Consumable, Error, Maintenance, MaintenanceRepository,
    ReferenceRepository, Result, Schedule, ScheduleFields, ScheduleRecord, ScheduleRepository,
    Service,
};

/// Maintenance as stored. `None` models a record whose array was never written.
#[derive(Debug, Clone)]
struct StoredMaintenance {
    id: Uuid,
    label: String,
    asset_id: Uuid,
    schedules: Option<Vec<Schedule>>,
}

impl StoredMaintenance {
    fn to_maintenance(&self) -> Maintenance {
        Maintenance {
            id: self.id,
            label: self.label.clone(),
            asset_id: self.asset_id,
            schedules: self.schedules.clone().unwrap_or_default(),
        }
    }
}

#[derive(Default)]
struct State {
    assets: Vec<Asset>,
    services: Vec<Service>,
    consumables: Vec<Consumable>,
    maintenances: Vec<StoredMaintenance>,
    schedules: Vec<ScheduleRecord>,
    unavailable: bool,
    latency: Option<Duration>,
}

#[derive(Clone, Default)]
struct Shared(Arc<RwLock<State>>);

impl Shared {
    async fn read(&self) -> RwLockReadGuard<'_, State> {
        self.0.read().await
    }

    async fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.0.write().await
    }

    /// Apply the configured latency and availability before touching data.
    async fn gate(&self) -> Result<()> {
        let (unavailable, latency) = {
            let state = self.read().await;
            (state.unavailable, state.latency)
        };
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
        if unavailable {
            return Err(Error::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

/// Shared in-memory store. Fields mirror the `Database` aggregate.
#[derive(Clone)]
pub struct MemoryStore {
    pub assets: MemoryAssets,
    pub references: MemoryReferences,
    pub maintenances: MemoryMaintenances,
    pub schedules: MemorySchedules,
    shared: Shared,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        let shared = Shared::default();
        Self {
            assets: MemoryAssets(shared.clone()),
            references: MemoryReferences(shared.clone()),
            maintenances: MemoryMaintenances(shared.clone()),
            schedules: MemorySchedules(shared.clone()),
            shared,
        }
    }

    /// Make every subsequent operation fail as if the database were down.
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.shared.write().await.unavailable = unavailable;
    }

    /// Delay every subsequent operation by `latency`.
    pub async fn set_latency(&self, latency: Option<Duration>) {
        self.shared.write().await.latency = latency;
    }

    /// Insert a maintenance whose schedule array was never written.
    pub async fn insert_legacy_maintenance(&self, id: Uuid, asset_id: Uuid, label: &str) {
        self.shared.write().await.maintenances.push(StoredMaintenance {
            id,
            label: label.to_string(),
            asset_id,
            schedules: None,
        });
    }

    /// Raw view of a maintenance's array: `None` if missing, `Some` otherwise.
    pub async fn raw_schedules(&self, id: Uuid) -> Option<Option<Vec<Schedule>>> {
        let state = self.shared.read().await;
        state
            .maintenances
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.schedules.clone())
    }
}

// =============================================================================
// ASSETS
// =============================================================================

#[derive(Clone, Default)]
pub struct MemoryAssets(Shared);

#[async_trait]
impl AssetRepository for MemoryAssets {
    async fn insert(&self, asset: Asset) -> Result<()> {
        self.0.gate().await?;
        self.0.write().await.assets.push(asset);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Asset>> {
        self.0.gate().await?;
        let state = self.0.read().await;
        Ok(state.assets.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Asset>> {
        self.0.gate().await?;
        Ok(self.0.read().await.assets.clone())
    }
}

// =============================================================================
// REFERENCES
// =============================================================================

#[derive(Clone, Default)]
pub struct MemoryReferences(Shared);

#[async_trait]
impl ReferenceRepository for MemoryReferences {
    async fn insert_service(&self, service: Service) -> Result<()> {
        self.0.gate().await?;
        self.0.write().await.services.push(service);
        Ok(())
    }

    async fn insert_consumable(&self, consumable: Consumable) -> Result<()> {
        self.0.gate().await?;
        self.0.write().await.consumables.push(consumable);
        Ok(())
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        self.0.gate().await?;
        Ok(self.0.read().await.services.clone())
    }

    async fn list_consumables(&self) -> Result<Vec<Consumable>> {
        self.0.gate().await?;
        Ok(self.0.read().await.consumables.clone())
    }

    async fn services_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Service>> {
        self.0.gate().await?;
        let state = self.0.read().await;
        Ok(state
            .services
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn consumables_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Consumable>> {
        self.0.gate().await?;
        let state = self.0.read().await;
        Ok(state
            .consumables
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }
}

// =============================================================================
// MAINTENANCES
// =============================================================================

#[derive(Clone, Default)]
pub struct MemoryMaintenances(Shared);

#[async_trait]
impl MaintenanceRepository for MemoryMaintenances {
    async fn insert(&self, maintenance: &Maintenance) -> Result<()> {
        self.0.gate().await?;
        self.0.write().await.maintenances.push(StoredMaintenance {
            id: maintenance.id,
            label: maintenance.label.clone(),
            asset_id: maintenance.asset_id,
            schedules: Some(maintenance.schedules.clone()),
        });
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Maintenance>> {
        self.0.gate().await?;
        let state = self.0.read().await;
        Ok(state
            .maintenances
            .iter()
            .find(|m| m.id == id)
            .map(StoredMaintenance::to_maintenance))
    }

    async fn list_for_asset(&self, asset_id: Uuid) -> Result<Vec<Maintenance>> {
        self.0.gate().await?;
        let state = self.0.read().await;
        Ok(state
            .maintenances
            .iter()
            .filter(|m| m.asset_id == asset_id)
            .map(StoredMaintenance::to_maintenance)
            .collect())
    }

    async fn update_label(&self, id: Uuid, label: &str) -> Result<bool> {
        self.0.gate().await?;
        let mut state = self.0.write().await;
        match state.maintenances.iter_mut().find(|m| m.id == id) {
            Some(m) => {
                m.label = label.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.0.gate().await?;
        let mut state = self.0.write().await;
        let before = state.maintenances.len();
        state.maintenances.retain(|m| m.id != id);
        Ok(state.maintenances.len() < before)
    }

    async fn ensure_schedules(&self, id: Uuid) -> Result<()> {
        self.0.gate().await?;
        let mut state = self.0.write().await;
        if let Some(m) = state.maintenances.iter_mut().find(|m| m.id == id) {
            if m.schedules.is_none() {
                m.schedules = Some(Vec::new());
            }
        }
        Ok(())
    }

    async fn push_schedule(&self, id: Uuid, schedule: &Schedule) -> Result<bool> {
        self.0.gate().await?;
        let mut state = self.0.write().await;
        match state.maintenances.iter_mut().find(|m| m.id == id) {
            // Appending to a missing array is a no-op, like `NULL || x` in SQL.
            Some(StoredMaintenance {
                schedules: Some(list),
                ..
            }) => {
                list.push(schedule.clone());
                Ok(true)
            }
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }

    async fn find_schedule(&self, id: Uuid, schedule_id: Uuid) -> Result<Option<Schedule>> {
        self.0.gate().await?;
        let state = self.0.read().await;
        Ok(state
            .maintenances
            .iter()
            .find(|m| m.id == id)
            .and_then(|m| m.schedules.as_ref())
            .and_then(|list| list.iter().find(|s| s.id == schedule_id))
            .cloned())
    }

    async fn set_schedule(
        &self,
        id: Uuid,
        schedule_id: Uuid,
        fields: &ScheduleFields,
    ) -> Result<bool> {
        self.0.gate().await?;
        let mut state = self.0.write().await;
        let entry = state
            .maintenances
            .iter_mut()
            .find(|m| m.id == id)
            .and_then(|m| m.schedules.as_mut())
            .and_then(|list| list.iter_mut().find(|s| s.id == schedule_id));
        match entry {
            Some(s) => {
                s.fields = fields.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn pull_schedule(&self, id: Uuid, schedule_id: Uuid) -> Result<bool> {
        self.0.gate().await?;
        let mut state = self.0.write().await;
        let list = state
            .maintenances
            .iter_mut()
            .find(|m| m.id == id)
            .and_then(|m| m.schedules.as_mut());
        match list {
            Some(list) => {
                let before = list.len();
                list.retain(|s| s.id != schedule_id);
                Ok(list.len() < before)
            }
            None => Ok(false),
        }
    }
}

// =============================================================================
// SCHEDULES
// =============================================================================

#[derive(Clone, Default)]
pub struct MemorySchedules(Shared);

#[async_trait]
impl ScheduleRepository for MemorySchedules {
    async fn insert(&self, record: &ScheduleRecord) -> Result<()> {
        self.0.gate().await?;
        self.0.write().await.schedules.push(record.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<ScheduleRecord>> {
        self.0.gate().await?;
        let state = self.0.read().await;
        Ok(state.schedules.iter().find(|s| s.id == id).cloned())
    }

    async fn list_for_asset(&self, asset_id: Uuid) -> Result<Vec<ScheduleRecord>> {
        self.0.gate().await?;
        let state = self.0.read().await;
        Ok(state
            .schedules
            .iter()
            .filter(|s| s.asset_id == asset_id)
            .cloned()
            .collect())
    }

    async fn list_for_maintenance(&self, maintenance_id: Uuid) -> Result<Vec<ScheduleRecord>> {
        self.0.gate().await?;
        let state = self.0.read().await;
        Ok(state
            .schedules
            .iter()
            .filter(|s| s.maintenance_id == Some(maintenance_id))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, fields: &ScheduleFields) -> Result<bool> {
        self.0.gate().await?;
        let mut state = self.0.write().await;
        match state.schedules.iter_mut().find(|s| s.id == id) {
            Some(s) => {
                s.fields = fields.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        self.0.gate().await?;
        let mut state = self.0.write().await;
        let before = state.schedules.len();
        state.schedules.retain(|s| s.id != id);
        Ok(state.schedules.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::new_v7;

    fn fields(label: &str) -> ScheduleFields {
        ScheduleFields {
            label: label.to_string(),
            schedule_type: "interval".to_string(),
            days: 30,
            ..Default::default()
        }
    }

    async fn seeded(store: &MemoryStore, labels: &[&str]) -> (Uuid, Vec<Uuid>) {
        let m = Maintenance::new(new_v7(), new_v7(), "Oil Changes");
        store.maintenances.insert(&m).await.unwrap();
        let mut ids = Vec::new();
        for label in labels {
            let s = Schedule::new(new_v7(), fields(label));
            ids.push(s.id);
            assert!(store.maintenances.push_schedule(m.id, &s).await.unwrap());
        }
        (m.id, ids)
    }

    #[tokio::test]
    async fn test_legacy_maintenance_reads_empty_and_ensure_initialises() {
        let store = MemoryStore::new();
        let id = new_v7();
        store.insert_legacy_maintenance(id, new_v7(), "Legacy").await;

        let m = store.maintenances.get(id).await.unwrap().unwrap();
        assert!(m.schedules.is_empty());
        assert_eq!(store.raw_schedules(id).await, Some(None));

        store.maintenances.ensure_schedules(id).await.unwrap();
        assert_eq!(store.raw_schedules(id).await, Some(Some(Vec::new())));
    }

    #[tokio::test]
    async fn test_set_schedule_keeps_position_and_siblings() {
        let store = MemoryStore::new();
        let (mid, ids) = seeded(&store, &["A", "B", "C"]).await;

        let updated = store
            .maintenances
            .set_schedule(mid, ids[1], &fields("B2"))
            .await
            .unwrap();
        assert!(updated);

        let m = store.maintenances.get(mid).await.unwrap().unwrap();
        let labels: Vec<_> = m.schedules.iter().map(|s| s.fields.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B2", "C"]);
        assert_eq!(m.schedules[1].id, ids[1]);
    }

    #[tokio::test]
    async fn test_pull_schedule_preserves_order() {
        let store = MemoryStore::new();
        let (mid, ids) = seeded(&store, &["A", "B", "C"]).await;

        assert!(store.maintenances.pull_schedule(mid, ids[0]).await.unwrap());
        assert!(!store.maintenances.pull_schedule(mid, ids[0]).await.unwrap());

        let m = store.maintenances.get(mid).await.unwrap().unwrap();
        let labels: Vec<_> = m.schedules.iter().map(|s| s.fields.label.as_str()).collect();
        assert_eq!(labels, vec!["B", "C"]);
    }

    #[tokio::test]
    async fn test_set_schedule_unknown_element_matches_nothing() {
        let store = MemoryStore::new();
        let (mid, _) = seeded(&store, &["A"]).await;
        let updated = store
            .maintenances
            .set_schedule(mid, new_v7(), &fields("X"))
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_with_database_error() {
        let store = MemoryStore::new();
        store.set_unavailable(true).await;

        let err = store.assets.list().await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));

        store.set_unavailable(false).await;
        assert!(store.assets.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let clone = store.clone();
        let record = ScheduleRecord {
            id: new_v7(),
            maintenance_id: None,
            asset_id: new_v7(),
            fields: fields("Weekly"),
        };
        clone.schedules.insert(&record).await.unwrap();
        assert_eq!(
            store.schedules.get(record.id).await.unwrap(),
            Some(record.clone())
        );
        assert_eq!(
            store
                .schedules
                .list_for_asset(record.asset_id)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_references_by_ids_skip_unknown() {
        let store = MemoryStore::new();
        let oil = Service {
            id: new_v7(),
            label: "Oil change".into(),
            notes: String::new(),
        };
        store.references.insert_service(oil.clone()).await.unwrap();

        let found = store
            .references
            .services_by_ids(&[oil.id, new_v7()])
            .await
            .unwrap();
        assert_eq!(found, vec![oil]);
    }
}
