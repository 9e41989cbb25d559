//! Service and consumable catalog repository.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use fleet_core::{Consumable, Error, ReferenceRepository, Result, Service};

/// PostgreSQL implementation of ReferenceRepository.
#[derive(Clone)]
pub struct PgReferenceRepository {
    pool: Pool<Postgres>,
}

impl PgReferenceRepository {
    /// Create a new PgReferenceRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_rows(
        &self,
        table: &str,
        ids: Option<&[Uuid]>,
    ) -> Result<Vec<(Uuid, String, String)>> {
        let rows = match ids {
            Some(ids) => {
                let sql = format!(
                    "SELECT id, label, notes FROM {} WHERE id = ANY($1) ORDER BY id",
                    table
                );
                sqlx::query(&sql)
                    .bind(ids)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(Error::Database)?
            }
            None => {
                let sql = format!("SELECT id, label, notes FROM {} ORDER BY id", table);
                sqlx::query(&sql)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(Error::Database)?
            }
        };

        Ok(rows
            .into_iter()
            .map(|r| (r.get("id"), r.get("label"), r.get("notes")))
            .collect())
    }

    async fn insert_row(&self, table: &str, id: Uuid, label: &str, notes: &str) -> Result<()> {
        let sql = format!(
            "INSERT INTO {} (id, label, notes) VALUES ($1, $2, $3)",
            table
        );
        sqlx::query(&sql)
            .bind(id)
            .bind(label)
            .bind(notes)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}

fn to_services(rows: Vec<(Uuid, String, String)>) -> Vec<Service> {
    rows.into_iter()
        .map(|(id, label, notes)| Service { id, label, notes })
        .collect()
}

fn to_consumables(rows: Vec<(Uuid, String, String)>) -> Vec<Consumable> {
    rows.into_iter()
        .map(|(id, label, notes)| Consumable { id, label, notes })
        .collect()
}

#[async_trait]
impl ReferenceRepository for PgReferenceRepository {
    async fn insert_service(&self, service: Service) -> Result<()> {
        self.insert_row("services", service.id, &service.label, &service.notes)
            .await
    }

    async fn insert_consumable(&self, consumable: Consumable) -> Result<()> {
        self.insert_row(
            "consumables",
            consumable.id,
            &consumable.label,
            &consumable.notes,
        )
        .await
    }

    async fn list_services(&self) -> Result<Vec<Service>> {
        self.fetch_rows("services", None).await.map(to_services)
    }

    async fn list_consumables(&self) -> Result<Vec<Consumable>> {
        self.fetch_rows("consumables", None).await.map(to_consumables)
    }

    async fn services_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Service>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_rows("services", Some(ids)).await.map(to_services)
    }

    async fn consumables_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Consumable>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_rows("consumables", Some(ids))
            .await
            .map(to_consumables)
    }
}
