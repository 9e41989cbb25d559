use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::response::{Json, Response};

use fleet_schedule::redirect::{SCHEDULE_ADDED, SCHEDULE_DELETED, SCHEDULE_UPDATED};
use fleet_schedule::{AssetScheduleView, Redirect, ScheduleKey, SchedulePlacement};

use super::{flash, see_other};
use crate::error::ApiResult;
use crate::form::RawForm;
use crate::state::AppState;

/// GET /schedules?asset_id=
pub async fn list_schedules(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<AssetScheduleView>> {
    let form = RawForm::from_parts(query.as_deref(), b"");
    let asset_id = form.id("asset_id")?;
    let view = state
        .aggregator
        .schedules_for_asset(asset_id, flash(&form))
        .await?;
    Ok(Json(view))
}

fn schedule_key(form: &RawForm) -> ApiResult<ScheduleKey> {
    Ok(ScheduleKey {
        schedule_id: form.id("schedule_id")?,
        maintenance_id: form.optional_id("maintenance_id")?,
    })
}

/// POST /schedules/add
pub async fn add_schedule(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> ApiResult<Response> {
    let form = RawForm::from_parts(query.as_deref(), &body);
    let placement = SchedulePlacement {
        maintenance_id: form.optional_id("maintenance_id")?,
        asset_id: form.optional_id("asset_id")?,
    };
    let write = state
        .schedules
        .add_schedule(&placement, form.schedule_fields())
        .await?;
    Ok(see_other(
        Redirect::schedules(write.asset_id).success(SCHEDULE_ADDED),
    ))
}

/// POST /schedules/edit
pub async fn edit_schedule(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> ApiResult<Response> {
    let form = RawForm::from_parts(query.as_deref(), &body);
    let key = schedule_key(&form)?;
    let write = state
        .schedules
        .edit_schedule(&key, form.schedule_fields())
        .await?;
    Ok(see_other(
        Redirect::schedules(write.asset_id).success(SCHEDULE_UPDATED),
    ))
}

/// POST /schedules/delete
pub async fn delete_schedule(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> ApiResult<Response> {
    let form = RawForm::from_parts(query.as_deref(), &body);
    let key = schedule_key(&form)?;
    let write = state.schedules.delete_schedule(&key).await?;
    Ok(see_other(
        Redirect::schedules(write.asset_id).success(SCHEDULE_DELETED),
    ))
}
