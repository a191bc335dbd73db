//! Credits wallet routes: balance, history, deposits, admin adjustments.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use crate::routes::{account_error_response, app_error_response, internal_error_response};
use adnexus_shared::AppError;
use adnexus_shared::types::{PageRequest, PageResponse};
use adnexus_core::ledger::EntryKind;
use adnexus_db::entities::ledger_entries;
use adnexus_db::repositories::account::AccountRepository;
use adnexus_db::repositories::ledger::{
    CreditError, HistoryFilter, LedgerRepository, to_domain,
};

/// Entries shown on the wallet page.
const WALLET_HISTORY_LIMIT: u64 = 50;
/// Page-size cap for the admin transaction listing.
const ADMIN_PER_PAGE_CAP: u32 = 100;

/// Creates the credits routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/{account_id}/credits", get(get_credits))
        .route("/accounts/{account_id}/credits/deposits", post(create_deposit))
        .route(
            "/accounts/{account_id}/credits/adjustments",
            post(create_adjustment),
        )
        .route(
            "/accounts/{account_id}/credits/transactions",
            get(list_transactions),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for purchasing credits.
#[derive(Debug, Deserialize)]
pub struct CreateDepositRequest {
    /// Amount to deposit.
    pub amount: Decimal,
    /// Optional description; a default is generated when absent.
    pub description: Option<String>,
}

/// Request body for an admin adjustment.
#[derive(Debug, Deserialize)]
pub struct CreateAdjustmentRequest {
    /// Signed amount: positive adds credits, negative removes them.
    pub amount: Decimal,
    /// Explanation for the adjustment.
    pub description: String,
}

/// Query parameters for the transaction listing.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by entry kind.
    pub kind: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Entries per page.
    pub per_page: Option<u32>,
}

/// Response for a single ledger entry.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Raw signed amount.
    pub amount: String,
    /// Display amount, with a leading `+` for credits.
    pub signed_amount: String,
    /// Entry kind.
    pub kind: String,
    /// Description.
    pub description: String,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<ledger_entries::Model> for EntryResponse {
    fn from(model: ledger_entries::Model) -> Self {
        let entry = to_domain(model);
        Self {
            id: entry.id.into_inner(),
            amount: entry.amount.to_string(),
            signed_amount: entry.signed_amount(),
            kind: entry.kind.to_string(),
            description: entry.description.clone(),
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/accounts/{account_id}/credits` - Balance and recent history.
async fn get_credits(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> impl IntoResponse {
    let accounts = AccountRepository::new((*state.db).clone());
    let account = match accounts.get_account(account_id).await {
        Ok(account) => account,
        Err(e) => return account_error_response(e),
    };

    let ledger = LedgerRepository::new((*state.db).clone());
    match ledger
        .history(
            account_id,
            HistoryFilter {
                kind: None,
                limit: Some(WALLET_HISTORY_LIMIT),
            },
        )
        .await
    {
        Ok(entries) => {
            let transactions: Vec<EntryResponse> =
                entries.into_iter().map(EntryResponse::from).collect();
            (
                StatusCode::OK,
                Json(json!({
                    "balance": account.balance.to_string(),
                    "min_deposit": state.credits.min_deposit_amount.to_string(),
                    "transactions": transactions,
                })),
            )
                .into_response()
        }
        Err(e) => credit_error_response(e),
    }
}

/// POST `/accounts/{account_id}/credits/deposits` - Purchase credits.
///
/// The deposit floor belongs to this layer, not to the ledger.
async fn create_deposit(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(body): Json<CreateDepositRequest>,
) -> impl IntoResponse {
    let min_deposit = state.credits.min_deposit_amount;
    if body.amount < min_deposit {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "MINIMUM_DEPOSIT",
                "message": format!("Minimum deposit is ${min_deposit}"),
            })),
        )
            .into_response();
    }

    let description = body
        .description
        .unwrap_or_else(|| format!("Credit purchase - ${}", body.amount));

    let ledger = LedgerRepository::new((*state.db).clone());
    match ledger
        .credit(account_id, body.amount, &description, EntryKind::Deposit)
        .await
    {
        Ok(entry) => match ledger.balance(account_id).await {
            Ok(balance) => (
                StatusCode::CREATED,
                Json(json!({
                    "entry": EntryResponse::from(entry),
                    "balance": balance.to_string(),
                })),
            )
                .into_response(),
            Err(e) => credit_error_response(e),
        },
        Err(e) => credit_error_response(e),
    }
}

/// POST `/accounts/{account_id}/credits/adjustments` - Admin adjustment.
async fn create_adjustment(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(body): Json<CreateAdjustmentRequest>,
) -> impl IntoResponse {
    if body.amount == Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "ZERO_AMOUNT",
                "message": "Amount cannot be zero",
            })),
        )
            .into_response();
    }

    let ledger = LedgerRepository::new((*state.db).clone());
    match ledger
        .admin_adjust(account_id, body.amount, &body.description)
        .await
    {
        Ok(entry) => match ledger.balance(account_id).await {
            Ok(balance) => (
                StatusCode::CREATED,
                Json(json!({
                    "entry": EntryResponse::from(entry),
                    "balance": balance.to_string(),
                })),
            )
                .into_response(),
            Err(e) => credit_error_response(e),
        },
        Err(e) => credit_error_response(e),
    }
}

/// GET `/accounts/{account_id}/credits/transactions` - Filtered history.
async fn list_transactions(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let kind = match query.kind.as_deref() {
        Some(raw) => match EntryKind::from_str(raw) {
            Ok(kind) => Some(kind),
            Err(message) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "INVALID_KIND",
                        "message": message,
                    })),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page).max(1),
        per_page: query
            .per_page
            .unwrap_or(defaults.per_page)
            .clamp(1, ADMIN_PER_PAGE_CAP),
    };

    let ledger = LedgerRepository::new((*state.db).clone());
    match ledger.history_page(account_id, kind, &page).await {
        Ok((entries, total)) => {
            let transactions: Vec<EntryResponse> =
                entries.into_iter().map(EntryResponse::from).collect();
            (
                StatusCode::OK,
                Json(PageResponse::new(transactions, page.page, page.per_page, total)),
            )
                .into_response()
        }
        Err(e) => credit_error_response(e),
    }
}

// ============================================================================
// Error Mapping
// ============================================================================

fn credit_error_response(err: CreditError) -> Response {
    match err {
        CreditError::AccountNotFound(id) => {
            app_error_response(&AppError::NotFound(format!("Account {id}")))
        }
        CreditError::Validation(e) => {
            let status = StatusCode::from_u16(e.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(json!({
                    "error": e.error_code(),
                    "message": e.to_string(),
                })),
            )
                .into_response()
        }
        CreditError::Database(e) => {
            error!(error = %e, "Ledger operation failed");
            internal_error_response()
        }
    }
}
