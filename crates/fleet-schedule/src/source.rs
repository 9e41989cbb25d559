//! Reference source backed by the local store.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use fleet_core::{
    Asset, AssetRepository, Consumable, Deadline, Error, ReferenceRepository, ReferenceSource,
    Result, Service,
};

/// How the store-backed source answers an id-set query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Load the whole catalog and filter in memory.
    #[default]
    All,
    /// Query only the requested ids (`WHERE id = ANY($1)`).
    ByIds,
}

impl FetchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStrategy::All => "all",
            FetchStrategy::ByIds => "by_ids",
        }
    }
}

impl std::str::FromStr for FetchStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FetchStrategy::All),
            "by_ids" | "by-ids" | "byids" => Ok(FetchStrategy::ByIds),
            other => Err(Error::Config(format!(
                "unknown reference fetch strategy '{}' (expected 'all' or 'by_ids')",
                other
            ))),
        }
    }
}

/// [`ReferenceSource`] over the local reference and asset repositories.
///
/// Each repository call runs under the storage deadline; a timeout surfaces
/// as `Error::Timeout` like any other failed fetch.
#[derive(Clone)]
pub struct StoreReferenceSource {
    references: Arc<dyn ReferenceRepository>,
    assets: Arc<dyn AssetRepository>,
    strategy: FetchStrategy,
    deadline: Deadline,
}

impl StoreReferenceSource {
    pub fn new(
        references: Arc<dyn ReferenceRepository>,
        assets: Arc<dyn AssetRepository>,
        strategy: FetchStrategy,
        deadline: Deadline,
    ) -> Self {
        Self {
            references,
            assets,
            strategy,
            deadline,
        }
    }

    pub fn strategy(&self) -> FetchStrategy {
        self.strategy
    }
}

#[async_trait]
impl ReferenceSource for StoreReferenceSource {
    async fn fetch_services(&self) -> Result<Vec<Service>> {
        self.deadline
            .run("list_services", self.references.list_services())
            .await
    }

    async fn fetch_consumables(&self) -> Result<Vec<Consumable>> {
        self.deadline
            .run("list_consumables", self.references.list_consumables())
            .await
    }

    async fn fetch_services_by_ids(&self, ids: &BTreeSet<Uuid>) -> Result<Vec<Service>> {
        match self.strategy {
            FetchStrategy::All => {
                let all = self.fetch_services().await?;
                Ok(all.into_iter().filter(|s| ids.contains(&s.id)).collect())
            }
            FetchStrategy::ByIds => {
                let ids: Vec<Uuid> = ids.iter().copied().collect();
                self.deadline
                    .run("services_by_ids", self.references.services_by_ids(&ids))
                    .await
            }
        }
    }

    async fn fetch_consumables_by_ids(&self, ids: &BTreeSet<Uuid>) -> Result<Vec<Consumable>> {
        match self.strategy {
            FetchStrategy::All => {
                let all = self.fetch_consumables().await?;
                Ok(all.into_iter().filter(|c| ids.contains(&c.id)).collect())
            }
            FetchStrategy::ByIds => {
                let ids: Vec<Uuid> = ids.iter().copied().collect();
                self.deadline
                    .run("consumables_by_ids", self.references.consumables_by_ids(&ids))
                    .await
            }
        }
    }

    async fn fetch_asset(&self, id: Uuid) -> Result<Option<Asset>> {
        self.deadline.run("get_asset", self.assets.get(id)).await
    }

    fn source_name(&self) -> &'static str {
        "store"
    }
}
