//! Account management routes: creation and the admin account listing.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::routes::{account_error_response, app_error_response};
use adnexus_db::entities::accounts;
use adnexus_db::repositories::account::AccountRepository;
use adnexus_shared::AppError;
use adnexus_shared::types::{PageRequest, PageResponse};

/// Page-size cap for the account listing.
const ACCOUNTS_PER_PAGE_CAP: u32 = 100;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts", post(create_account))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Display name.
    pub name: String,
    /// Contact email, unique per account.
    pub email: String,
}

/// Query parameters for the account listing.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Accounts per page.
    pub per_page: Option<u32>,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Current credits balance.
    pub balance: String,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<accounts::Model> for AccountResponse {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            balance: model.balance.to_string(),
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/accounts` - Create an account with a zero balance.
async fn create_account(
    State(state): State<AppState>,
    Json(body): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let name = body.name.trim();
    let email = body.email.trim();
    if name.is_empty() || email.is_empty() {
        return app_error_response(&AppError::Validation(
            "Name and email are required".to_string(),
        ));
    }

    let accounts_repo = AccountRepository::new((*state.db).clone());
    match accounts_repo.create_account(name, email).await {
        Ok(account) => {
            (StatusCode::CREATED, Json(AccountResponse::from(account))).into_response()
        }
        Err(e) => account_error_response(e),
    }
}

/// GET `/accounts` - Admin listing of accounts, newest first.
async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> impl IntoResponse {
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page).max(1),
        per_page: query
            .per_page
            .unwrap_or(defaults.per_page)
            .clamp(1, ACCOUNTS_PER_PAGE_CAP),
    };

    let accounts_repo = AccountRepository::new((*state.db).clone());
    match accounts_repo.list_accounts(&page).await {
        Ok((models, total)) => {
            let accounts: Vec<AccountResponse> =
                models.into_iter().map(AccountResponse::from).collect();
            (
                StatusCode::OK,
                Json(PageResponse::new(accounts, page.page, page.per_page, total)),
            )
                .into_response()
        }
        Err(e) => account_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use tower::ServiceExt;

    use adnexus_shared::{BidderConfig, CreditsConfig};

    use crate::bidder::BidderClient;
    use crate::{AppState, create_router};

    fn test_state() -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
            credits: Arc::new(CreditsConfig::default()),
            bidder: Arc::new(BidderClient::new(BidderConfig::default()).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_blank_account_fields_are_rejected() {
        let app = create_router(test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/accounts")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name": "  ", "email": ""}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "VALIDATION_ERROR");
    }
}
