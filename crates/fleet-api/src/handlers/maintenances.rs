use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::response::{Json, Response};

use fleet_schedule::redirect::{MAINTENANCE_DELETED, MAINTENANCE_UPDATED};
use fleet_schedule::{MaintenanceListView, MaintenanceView, Redirect};

use super::{flash, see_other};
use crate::error::ApiResult;
use crate::form::RawForm;
use crate::state::AppState;

/// GET /maintenances?asset_id=
pub async fn list_maintenances(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<MaintenanceListView>> {
    let form = RawForm::from_parts(query.as_deref(), b"");
    let asset_id = form.id("asset_id")?;
    let view = state
        .aggregator
        .maintenances_for_asset(asset_id, flash(&form))
        .await?;
    Ok(Json(view))
}

/// POST /maintenances/create
///
/// A storage failure still redirects, with the error as the message.
pub async fn create_maintenance(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> ApiResult<Response> {
    let form = RawForm::from_parts(query.as_deref(), &body);
    let asset_id = form.id("asset_id")?;
    let result = state
        .schedules
        .create_maintenance(asset_id, form.value("label"))
        .await;
    Ok(see_other(Redirect::after_create_maintenance(asset_id, result)?))
}

/// POST /maintenances/edit
pub async fn edit_maintenance(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> ApiResult<Response> {
    let form = RawForm::from_parts(query.as_deref(), &body);
    let id = form.id("id")?;
    let asset_id = state
        .schedules
        .rename_maintenance(id, form.value("label"))
        .await?;
    Ok(see_other(
        Redirect::maintenances(asset_id).success(MAINTENANCE_UPDATED),
    ))
}

/// GET /maintenances/view?id=
pub async fn view_maintenance(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<MaintenanceView>> {
    let form = RawForm::from_parts(query.as_deref(), b"");
    let id = form.id("id")?;
    Ok(Json(state.aggregator.maintenance_detail(id).await?))
}

/// POST /maintenances/delete
pub async fn delete_maintenance(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> ApiResult<Response> {
    let form = RawForm::from_parts(query.as_deref(), &body);
    let id = form.id("id")?;
    let asset_id = state.schedules.delete_maintenance(id).await?;
    Ok(see_other(
        Redirect::maintenances(asset_id).success(MAINTENANCE_DELETED),
    ))
}
