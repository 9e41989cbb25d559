//! # fleet-api
//!
//! HTTP surface of fleetcare. Form posts answer with 303 redirects carrying
//! the result message; list and detail pages are served as JSON views.

pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::{AppConfig, ReferenceSourceKind};
pub use error::{ApiError, ApiResult};
pub use state::{AppState, Repositories};

use handlers::{maintenances, reference, schedules};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Maintenances
        .route("/maintenances", get(maintenances::list_maintenances))
        .route("/maintenances/create", post(maintenances::create_maintenance))
        .route("/maintenances/edit", post(maintenances::edit_maintenance))
        .route("/maintenances/view", get(maintenances::view_maintenance))
        .route("/maintenances/delete", post(maintenances::delete_maintenance))
        // Schedules
        .route("/schedules", get(schedules::list_schedules))
        .route("/schedules/add", post(schedules::add_schedule))
        .route("/schedules/edit", post(schedules::edit_schedule))
        .route("/schedules/delete", post(schedules::delete_schedule))
        // Reference catalogs
        .route("/services", get(reference::list_services))
        .route("/consumables", get(reference::list_consumables))
        .route("/assets/:id", get(reference::get_asset))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
