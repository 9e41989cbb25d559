//! Identifier → label resolution for schedule references.
//!
//! Resolution is total: every requested id gets an entry, either the
//! referenced record's label or the id's own canonical string. A failed
//! fetch is logged and treated as an empty reference set, so nothing here
//! returns an error.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};
use uuid::Uuid;

use fleet_core::{
    canonical, Consumable, IdSets, NameMaps, Reference, ReferenceSource, Result, ScheduleFields,
    Service,
};

/// Flatten the service and consumable ids of `schedules` into deduplicated sets.
pub fn collect_schedule_ids<'a, I>(schedules: I) -> IdSets
where
    I: IntoIterator<Item = &'a ScheduleFields>,
{
    let mut ids = IdSets::default();
    for fields in schedules {
        ids.extend(fields);
    }
    ids
}

/// Map every id in `ids` to its record's label, or to the id itself when no
/// record matches. The key set always equals `ids`.
pub fn label_map<R: Reference>(ids: &BTreeSet<Uuid>, records: &[R]) -> BTreeMap<String, String> {
    let index: HashMap<Uuid, &str> = records.iter().map(|r| (r.id(), r.label())).collect();
    ids.iter()
        .map(|id| {
            let key = canonical(id);
            let label = match index.get(id) {
                Some(label) => (*label).to_string(),
                None => key.clone(),
            };
            (key, label)
        })
        .collect()
}

/// Label map of every record, for views showing the whole catalog.
fn full_label_map<R: Reference>(records: &[R]) -> BTreeMap<String, String> {
    records
        .iter()
        .map(|r| (canonical(&r.id()), r.label().to_string()))
        .collect()
}

/// Resolves schedule references and asset labels against a [`ReferenceSource`].
#[derive(Clone)]
pub struct NameResolver {
    source: Arc<dyn ReferenceSource>,
}

impl NameResolver {
    pub fn new(source: Arc<dyn ReferenceSource>) -> Self {
        Self { source }
    }

    /// Build both name maps for `ids`. Key sets equal the requested sets.
    pub async fn build_name_maps(&self, ids: &IdSets) -> NameMaps {
        let start = Instant::now();

        let fetch_services = async {
            if ids.services.is_empty() {
                return Vec::new();
            }
            self.degrade("services", self.source.fetch_services_by_ids(&ids.services).await)
        };
        let fetch_consumables = async {
            if ids.consumables.is_empty() {
                return Vec::new();
            }
            self.degrade(
                "consumables",
                self.source.fetch_consumables_by_ids(&ids.consumables).await,
            )
        };
        let (services, consumables): (Vec<Service>, Vec<Consumable>) =
            futures::join!(fetch_services, fetch_consumables);

        let maps = NameMaps {
            services: label_map(&ids.services, &services),
            consumables: label_map(&ids.consumables, &consumables),
        };

        let fallback_count = maps.services.iter().filter(|(k, v)| k == v).count()
            + maps.consumables.iter().filter(|(k, v)| k == v).count();
        debug!(
            subsystem = "schedule",
            component = "resolver",
            op = "build_name_maps",
            source = self.source.source_name(),
            requested_count = ids.services.len() + ids.consumables.len(),
            fallback_count,
            duration_ms = start.elapsed().as_millis() as u64,
            "Resolved reference labels"
        );
        maps
    }

    /// Full service and consumable lists, empty on failure.
    pub async fn reference_lists(&self) -> (Vec<Service>, Vec<Consumable>) {
        let (services, consumables) =
            futures::join!(self.source.fetch_services(), self.source.fetch_consumables());
        (
            self.degrade("services", services),
            self.degrade("consumables", consumables),
        )
    }

    /// Name maps covering every record in the given lists.
    pub fn catalog_name_maps(services: &[Service], consumables: &[Consumable]) -> NameMaps {
        NameMaps {
            services: full_label_map(services),
            consumables: full_label_map(consumables),
        }
    }

    /// The asset's label, or its canonical id when the asset is missing, has
    /// an empty label, or cannot be fetched.
    pub async fn resolve_asset_label(&self, asset_id: Uuid) -> String {
        match self.source.fetch_asset(asset_id).await {
            Ok(Some(asset)) if !asset.label.is_empty() => asset.label,
            Ok(_) => canonical(&asset_id),
            Err(e) => {
                warn!(
                    subsystem = "schedule",
                    component = "resolver",
                    op = "resolve_asset_label",
                    source = self.source.source_name(),
                    asset_id = %asset_id,
                    error = %e,
                    "Asset lookup failed, showing raw id"
                );
                canonical(&asset_id)
            }
        }
    }

    fn degrade<T>(&self, kind: &'static str, result: Result<Vec<T>>) -> Vec<T> {
        match result {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    subsystem = "schedule",
                    component = "resolver",
                    source = self.source.source_name(),
                    kind,
                    error = %e,
                    "Reference fetch failed, resolving against an empty set"
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FetchStrategy, StoreReferenceSource};
    use fleet_core::{new_v7, Asset, AssetRepository, Deadline, ReferenceRepository};
    use fleet_db::MemoryStore;

    fn service(label: &str) -> Service {
        Service {
            id: new_v7(),
            label: label.to_string(),
            notes: String::new(),
        }
    }

    fn consumable(label: &str) -> Consumable {
        Consumable {
            id: new_v7(),
            label: label.to_string(),
            notes: String::new(),
        }
    }

    fn resolver(store: &MemoryStore) -> NameResolver {
        NameResolver::new(Arc::new(StoreReferenceSource::new(
            Arc::new(store.references.clone()),
            Arc::new(store.assets.clone()),
            FetchStrategy::All,
            Deadline::default(),
        )))
    }

    #[test]
    fn test_collect_schedule_ids_deduplicates() {
        let (a, b, c) = (new_v7(), new_v7(), new_v7());
        let first = ScheduleFields {
            label: "one".into(),
            services: vec![a, b],
            ..Default::default()
        };
        let second = ScheduleFields {
            label: "two".into(),
            services: vec![b, c],
            ..Default::default()
        };

        let ids = collect_schedule_ids([&first, &second]);
        assert_eq!(ids.services, [a, b, c].into_iter().collect());
        assert!(ids.consumables.is_empty());
    }

    #[test]
    fn test_label_map_falls_back_to_canonical_id() {
        let oil = service("Oil change");
        let missing = new_v7();
        let ids: BTreeSet<Uuid> = [oil.id, missing].into_iter().collect();

        let map = label_map(&ids, std::slice::from_ref(&oil));
        assert_eq!(map.len(), 2);
        assert_eq!(map[&canonical(&oil.id)], "Oil change");
        assert_eq!(map[&canonical(&missing)], canonical(&missing));
    }

    #[test]
    fn test_label_map_ignores_unrequested_records() {
        let oil = service("Oil change");
        let ids = BTreeSet::new();
        assert!(label_map(&ids, &[oil]).is_empty());
    }

    #[tokio::test]
    async fn test_build_name_maps_key_sets_equal_requested_sets() {
        let store = MemoryStore::new();
        let oil = service("Oil change");
        let filter = consumable("Oil filter");
        store.references.insert_service(oil.clone()).await.unwrap();
        store.references.insert_consumable(filter.clone()).await.unwrap();

        let mut ids = IdSets::default();
        ids.services.extend([oil.id, new_v7()]);
        ids.consumables.extend([filter.id]);

        let maps = resolver(&store).build_name_maps(&ids).await;

        let service_keys: BTreeSet<String> = maps.services.keys().cloned().collect();
        let requested: BTreeSet<String> = ids.services.iter().map(canonical).collect();
        assert_eq!(service_keys, requested);
        assert_eq!(maps.service_name(&oil.id), Some("Oil change"));
        assert_eq!(maps.consumable_name(&filter.id), Some("Oil filter"));
    }

    #[tokio::test]
    async fn test_build_name_maps_degrades_when_store_fails() {
        let store = MemoryStore::new();
        let oil = service("Oil change");
        store.references.insert_service(oil.clone()).await.unwrap();
        store.set_unavailable(true).await;

        let mut ids = IdSets::default();
        ids.services.insert(oil.id);

        let maps = resolver(&store).build_name_maps(&ids).await;
        assert_eq!(maps.service_name(&oil.id), Some(canonical(&oil.id).as_str()));
    }

    #[tokio::test]
    async fn test_resolve_asset_label_fallbacks() {
        let store = MemoryStore::new();
        let named = Asset {
            id: new_v7(),
            label: "Truck 7".into(),
            asset_type: "vehicle".into(),
            location: String::new(),
            effective_date: chrono::Utc::now(),
        };
        let unnamed = Asset {
            id: new_v7(),
            label: String::new(),
            ..named.clone()
        };
        store.assets.insert(named.clone()).await.unwrap();
        store.assets.insert(unnamed.clone()).await.unwrap();
        let r = resolver(&store);

        assert_eq!(r.resolve_asset_label(named.id).await, "Truck 7");
        assert_eq!(r.resolve_asset_label(unnamed.id).await, canonical(&unnamed.id));

        let missing = new_v7();
        assert_eq!(r.resolve_asset_label(missing).await, canonical(&missing));

        store.set_unavailable(true).await;
        assert_eq!(r.resolve_asset_label(named.id).await, canonical(&named.id));
    }

    #[test]
    fn test_catalog_name_maps_cover_every_record() {
        let services = vec![service("A"), service("B")];
        let maps = NameResolver::catalog_name_maps(&services, &[]);
        assert_eq!(maps.services.len(), 2);
        assert!(maps.consumables.is_empty());
    }
}
