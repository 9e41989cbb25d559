//! The reference-service contract: catalogs as JSON arrays, assets by id.
//!
//! A second instance configured with `REFERENCE_SOURCE=http` can point its
//! `REFERENCE_BASE_URL` at these endpoints.

use axum::extract::{Path, State};
use axum::response::Json;

use fleet_core::{canonical, parse_id, Asset, Consumable, Error, Service};

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /services
pub async fn list_services(State(state): State<AppState>) -> ApiResult<Json<Vec<Service>>> {
    let services = state
        .deadline
        .run("list_services", state.references.list_services())
        .await?;
    Ok(Json(services))
}

/// GET /consumables
pub async fn list_consumables(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Consumable>>> {
    let consumables = state
        .deadline
        .run("list_consumables", state.references.list_consumables())
        .await?;
    Ok(Json(consumables))
}

/// GET /assets/:id
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Asset>> {
    let id = parse_id("id", &id)?;
    let asset = state
        .deadline
        .run("get_asset", state.assets.get(id))
        .await?
        .ok_or_else(|| Error::NotFound(format!("asset {}", canonical(&id))))?;
    Ok(Json(asset))
}
