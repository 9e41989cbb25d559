//! Maintenance repository implementation.
//!
//! The schedule array lives in the `schedules` JSONB column. Every array
//! mutation is a single UPDATE statement so it is atomic per record.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use fleet_core::{
    canonical, Error, Maintenance, MaintenanceRepository, Result, Schedule, ScheduleFields,
};

/// PostgreSQL implementation of MaintenanceRepository.
#[derive(Clone)]
pub struct PgMaintenanceRepository {
    pool: Pool<Postgres>,
}

impl PgMaintenanceRepository {
    /// Create a new PgMaintenanceRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn maintenance_from_row(r: PgRow) -> Result<Maintenance> {
    // NULL column and JSON null both read back as an empty array.
    let schedules: Option<Json<Option<Vec<Schedule>>>> = r
        .try_get("schedules")
        .map_err(|e| Error::Serialization(format!("maintenance schedules: {}", e)))?;

    Ok(Maintenance {
        id: r.get("id"),
        label: r.get("label"),
        asset_id: r.get("asset_id"),
        schedules: schedules.and_then(|Json(s)| s).unwrap_or_default(),
    })
}

#[async_trait]
impl MaintenanceRepository for PgMaintenanceRepository {
    async fn insert(&self, maintenance: &Maintenance) -> Result<()> {
        sqlx::query(
            "INSERT INTO maintenances (id, label, asset_id, schedules) VALUES ($1, $2, $3, $4)",
        )
        .bind(maintenance.id)
        .bind(&maintenance.label)
        .bind(maintenance.asset_id)
        .bind(Json(&maintenance.schedules))
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Maintenance>> {
        let row = sqlx::query("SELECT id, label, asset_id, schedules FROM maintenances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.map(maintenance_from_row).transpose()
    }

    async fn list_for_asset(&self, asset_id: Uuid) -> Result<Vec<Maintenance>> {
        let rows = sqlx::query(
            "SELECT id, label, asset_id, schedules FROM maintenances
             WHERE asset_id = $1 ORDER BY id",
        )
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.into_iter().map(maintenance_from_row).collect()
    }

    async fn update_label(&self, id: Uuid, label: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE maintenances SET label = $2 WHERE id = $1")
            .bind(id)
            .bind(label)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM maintenances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn ensure_schedules(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE maintenances SET schedules = '[]'::jsonb
             WHERE id = $1 AND (schedules IS NULL OR jsonb_typeof(schedules) = 'null')",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() > 0 {
            debug!(
                subsystem = "db",
                component = "maintenances",
                maintenance_id = %id,
                "Initialised missing schedule array"
            );
        }
        Ok(())
    }

    async fn push_schedule(&self, id: Uuid, schedule: &Schedule) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE maintenances
             SET schedules = schedules || jsonb_build_array($2::jsonb)
             WHERE id = $1",
        )
        .bind(id)
        .bind(Json(schedule))
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_schedule(&self, id: Uuid, schedule_id: Uuid) -> Result<Option<Schedule>> {
        let row = sqlx::query(
            "SELECT t.elem AS schedule
             FROM maintenances m,
                  jsonb_array_elements(
                      CASE WHEN jsonb_typeof(m.schedules) = 'array' THEN m.schedules
                           ELSE '[]'::jsonb END
                  ) AS t(elem)
             WHERE m.id = $1 AND t.elem->>'id' = $2
             LIMIT 1",
        )
        .bind(id)
        .bind(canonical(&schedule_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(r) => {
                let Json(schedule): Json<Schedule> = r
                    .try_get("schedule")
                    .map_err(|e| Error::Serialization(format!("schedule element: {}", e)))?;
                Ok(Some(schedule))
            }
            None => Ok(None),
        }
    }

    async fn set_schedule(
        &self,
        id: Uuid,
        schedule_id: Uuid,
        fields: &ScheduleFields,
    ) -> Result<bool> {
        let replacement = Schedule::new(schedule_id, fields.clone());
        let result = sqlx::query(
            "UPDATE maintenances m
             SET schedules = (
                 SELECT jsonb_agg(
                            CASE WHEN t.elem->>'id' = $2 THEN $3::jsonb ELSE t.elem END
                            ORDER BY t.ord)
                 FROM jsonb_array_elements(m.schedules) WITH ORDINALITY AS t(elem, ord)
             )
             WHERE m.id = $1
               AND jsonb_typeof(m.schedules) = 'array'
               AND m.schedules @> jsonb_build_array(jsonb_build_object('id', $2::text))",
        )
        .bind(id)
        .bind(canonical(&schedule_id))
        .bind(Json(&replacement))
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn pull_schedule(&self, id: Uuid, schedule_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE maintenances m
             SET schedules = COALESCE((
                 SELECT jsonb_agg(t.elem ORDER BY t.ord)
                 FROM jsonb_array_elements(m.schedules) WITH ORDINALITY AS t(elem, ord)
                 WHERE t.elem->>'id' <> $2
             ), '[]'::jsonb)
             WHERE m.id = $1
               AND jsonb_typeof(m.schedules) = 'array'
               AND m.schedules @> jsonb_build_array(jsonb_build_object('id', $2::text))",
        )
        .bind(id)
        .bind(canonical(&schedule_id))
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
