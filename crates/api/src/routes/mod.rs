//! API route definitions.

use axum::{Json, Router, http::StatusCode, response::IntoResponse};
use ledgerview_shared::AppError;
use serde_json::json;

use crate::AppState;

pub mod health;
pub mod reports;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(reports::routes())
}

/// Renders an application error as a JSON response.
pub(crate) fn error_response(err: &AppError) -> axum::response::Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code().to_lowercase(),
            "message": err.to_string()
        })),
    )
        .into_response()
}
