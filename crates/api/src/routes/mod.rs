//! API route definitions.

use axum::{Json, Router, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;
use tracing::error;

use adnexus_db::repositories::account::AccountError;
use adnexus_shared::AppError;

use crate::AppState;

pub mod accounts;
pub mod campaigns;
pub mod credits;
pub mod health;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(credits::routes())
        .merge(campaigns::routes())
}

/// Renders a shared application error as a JSON response.
pub(crate) fn app_error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

/// Maps account repository errors onto the shared taxonomy.
pub(crate) fn account_error_response(err: AccountError) -> Response {
    match err {
        AccountError::NotFound(id) => {
            app_error_response(&AppError::NotFound(format!("Account {id}")))
        }
        AccountError::EmailTaken(email) => app_error_response(&AppError::Conflict(format!(
            "Account with email {email} already exists"
        ))),
        AccountError::Database(e) => {
            error!(error = %e, "Account query failed");
            internal_error_response()
        }
    }
}

/// Generic 500 response that leaks no detail.
pub(crate) fn internal_error_response() -> Response {
    app_error_response(&AppError::Internal("An error occurred".to_string()))
}
