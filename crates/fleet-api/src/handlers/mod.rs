//! HTTP handlers.

pub mod maintenances;
pub mod reference;
pub mod schedules;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};

use fleet_schedule::{Flash, Redirect};

use crate::form::RawForm;

/// 303 to the redirect's location.
pub(crate) fn see_other(redirect: Redirect) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, redirect.location())],
    )
        .into_response()
}

/// `message` and `type` echoed back from a previous redirect.
pub(crate) fn flash(form: &RawForm) -> Flash {
    Flash {
        message: form.get("message").map(str::to_string),
        message_type: form.get("type").map(str::to_string),
    }
}

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
