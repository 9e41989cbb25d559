//! Asset repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use fleet_core::{Asset, AssetRepository, Error, Result};

/// PostgreSQL implementation of AssetRepository.
#[derive(Clone)]
pub struct PgAssetRepository {
    pool: Pool<Postgres>,
}

impl PgAssetRepository {
    /// Create a new PgAssetRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn asset_from_row(r: PgRow) -> Asset {
    Asset {
        id: r.get("id"),
        label: r.get("label"),
        asset_type: r.get("asset_type"),
        location: r.get("location"),
        effective_date: r.get("effective_date"),
    }
}

#[async_trait]
impl AssetRepository for PgAssetRepository {
    async fn insert(&self, asset: Asset) -> Result<()> {
        sqlx::query(
            "INSERT INTO assets (id, label, asset_type, location, effective_date)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(asset.id)
        .bind(&asset.label)
        .bind(&asset.asset_type)
        .bind(&asset.location)
        .bind(asset.effective_date)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Asset>> {
        let row = sqlx::query(
            "SELECT id, label, asset_type, location, effective_date FROM assets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(asset_from_row))
    }

    async fn list(&self) -> Result<Vec<Asset>> {
        let rows = sqlx::query(
            "SELECT id, label, asset_type, location, effective_date FROM assets ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(asset_from_row).collect())
    }
}
