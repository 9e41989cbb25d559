//! Repository for schedules stored as independent records.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use fleet_core::{Error, Result, ScheduleFields, ScheduleRecord, ScheduleRepository};

const SELECT_COLUMNS: &str = "SELECT id, maintenance_id, asset_id, label, schedule_type, days, \
                              services, consumables, notes FROM schedules";

/// PostgreSQL implementation of ScheduleRepository.
#[derive(Clone)]
pub struct PgScheduleRepository {
    pool: Pool<Postgres>,
}

impl PgScheduleRepository {
    /// Create a new PgScheduleRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_where(&self, clause: &str, id: Uuid) -> Result<Vec<ScheduleRecord>> {
        let sql = format!("{} WHERE {} = $1 ORDER BY id", SELECT_COLUMNS, clause);
        let rows = sqlx::query(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(rows.into_iter().map(record_from_row).collect())
    }
}

fn record_from_row(r: PgRow) -> ScheduleRecord {
    ScheduleRecord {
        id: r.get("id"),
        maintenance_id: r.get("maintenance_id"),
        asset_id: r.get("asset_id"),
        fields: ScheduleFields {
            label: r.get("label"),
            schedule_type: r.get("schedule_type"),
            days: r.get("days"),
            services: r.get("services"),
            consumables: r.get("consumables"),
            notes: r.get("notes"),
        },
    }
}

#[async_trait]
impl ScheduleRepository for PgScheduleRepository {
    async fn insert(&self, record: &ScheduleRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO schedules
                (id, maintenance_id, asset_id, label, schedule_type, days, services, consumables, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(record.id)
        .bind(record.maintenance_id)
        .bind(record.asset_id)
        .bind(&record.fields.label)
        .bind(&record.fields.schedule_type)
        .bind(record.fields.days)
        .bind(&record.fields.services)
        .bind(&record.fields.consumables)
        .bind(&record.fields.notes)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<ScheduleRecord>> {
        let sql = format!("{} WHERE id = $1", SELECT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.map(record_from_row))
    }

    async fn list_for_asset(&self, asset_id: Uuid) -> Result<Vec<ScheduleRecord>> {
        self.fetch_where("asset_id", asset_id).await
    }

    async fn list_for_maintenance(&self, maintenance_id: Uuid) -> Result<Vec<ScheduleRecord>> {
        self.fetch_where("maintenance_id", maintenance_id).await
    }

    async fn update(&self, id: Uuid, fields: &ScheduleFields) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE schedules
             SET label = $2, schedule_type = $3, days = $4, services = $5,
                 consumables = $6, notes = $7
             WHERE id = $1",
        )
        .bind(id)
        .bind(&fields.label)
        .bind(&fields.schedule_type)
        .bind(fields.days)
        .bind(&fields.services)
        .bind(&fields.consumables)
        .bind(&fields.notes)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
