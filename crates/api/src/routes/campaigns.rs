//! Campaign routes: creation, listing, and gated status transitions.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, warn};
use uuid::Uuid;

use crate::AppState;
use crate::routes::{account_error_response, app_error_response, internal_error_response};
use adnexus_shared::AppError;
use adnexus_shared::types::{CampaignId, PageRequest, PageResponse};
use adnexus_core::admission::{AdmissionService, EntityStatus};
use adnexus_db::entities::campaigns;
use adnexus_db::repositories::account::AccountRepository;
use adnexus_db::repositories::campaign::{
    CampaignError, CampaignRepository, CreateCampaignInput,
};

/// Creates the campaign routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts/{account_id}/campaigns", get(list_campaigns))
        .route("/accounts/{account_id}/campaigns", post(create_campaign))
        .route("/campaigns/{campaign_id}/status", patch(set_status))
        .route("/campaigns/{campaign_id}", delete(delete_campaign))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a campaign.
#[derive(Debug, Deserialize)]
pub struct CreateCampaignRequest {
    /// Campaign name.
    pub name: String,
    /// Initial status: inactive, active, or paused. Defaults to inactive.
    pub status: Option<String>,
    /// Daily budget.
    pub daily_budget: Option<Decimal>,
}

/// Request body for a status transition.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    /// Target status: inactive, active, or paused.
    pub status: String,
}

/// Query parameters for the campaign listing.
#[derive(Debug, Deserialize)]
pub struct ListCampaignsQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Campaigns per page.
    pub per_page: Option<u32>,
}

/// Page-size cap for the campaign listing.
const CAMPAIGNS_PER_PAGE_CAP: u32 = 100;

/// Response for a campaign, including serving flags derived from the
/// funding account's balance.
#[derive(Debug, Serialize)]
pub struct CampaignResponse {
    /// Campaign ID.
    pub id: Uuid,
    /// Funding account ID.
    pub account_id: Uuid,
    /// Campaign name.
    pub name: String,
    /// Lifecycle status.
    pub status: String,
    /// Daily budget.
    pub daily_budget: Option<String>,
    /// True if the campaign can serve ads right now.
    pub can_serve_ads: bool,
    /// True if an external scheduler should pause it for low credits.
    pub should_pause_for_credits: bool,
    /// Created at timestamp.
    pub created_at: String,
    /// Updated at timestamp.
    pub updated_at: String,
}

impl CampaignResponse {
    fn from_model(model: campaigns::Model, available: Decimal, floor: Decimal) -> Self {
        let status: EntityStatus = model.status.clone().into();
        Self {
            id: model.id,
            account_id: model.account_id,
            name: model.name,
            status: status.to_string(),
            daily_budget: model.daily_budget.map(|b| b.to_string()),
            can_serve_ads: AdmissionService::can_serve_ads(status, available, floor),
            should_pause_for_credits: AdmissionService::should_pause_for_credits(
                status, available, floor,
            ),
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/accounts/{account_id}/campaigns` - List campaigns with flags.
async fn list_campaigns(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Query(query): Query<ListCampaignsQuery>,
) -> impl IntoResponse {
    let accounts = AccountRepository::new((*state.db).clone());
    let account = match accounts.get_account(account_id).await {
        Ok(account) => account,
        Err(e) => return account_error_response(e),
    };

    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page).max(1),
        per_page: query
            .per_page
            .unwrap_or(defaults.per_page)
            .clamp(1, CAMPAIGNS_PER_PAGE_CAP),
    };

    let campaigns_repo = CampaignRepository::new((*state.db).clone());
    match campaigns_repo.list_by_account(account_id, &page).await {
        Ok((models, total)) => {
            let floor = state.credits.min_daily_budget;
            let campaigns: Vec<CampaignResponse> = models
                .into_iter()
                .map(|m| CampaignResponse::from_model(m, account.balance, floor))
                .collect();
            (
                StatusCode::OK,
                Json(PageResponse::new(campaigns, page.page, page.per_page, total)),
            )
                .into_response()
        }
        Err(e) => campaign_error_response(e),
    }
}

/// POST `/accounts/{account_id}/campaigns` - Create a campaign.
///
/// Creating straight into the active status runs the spend gate.
async fn create_campaign(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(body): Json<CreateCampaignRequest>,
) -> impl IntoResponse {
    let status = match body.status.as_deref() {
        Some(raw) => match EntityStatus::from_str(raw) {
            Ok(status) => status,
            Err(message) => return invalid_status_response(message),
        },
        None => EntityStatus::Inactive,
    };

    let campaigns_repo = CampaignRepository::new((*state.db).clone());
    let result = campaigns_repo
        .create_campaign(
            CreateCampaignInput {
                account_id,
                name: body.name,
                status,
                daily_budget: body.daily_budget,
            },
            state.credits.min_daily_budget,
        )
        .await;

    match result {
        Ok(campaign) => {
            if status.is_active() {
                notify_bidder(&state, CampaignId::from_uuid(campaign.id)).await;
            }
            campaign_with_flags(&state, campaign, StatusCode::CREATED).await
        }
        Err(e) => campaign_error_response(e),
    }
}

/// PATCH `/campaigns/{campaign_id}/status` - Gated status transition.
async fn set_status(
    State(state): State<AppState>,
    Path(campaign_id): Path<CampaignId>,
    Json(body): Json<SetStatusRequest>,
) -> impl IntoResponse {
    let status = match EntityStatus::from_str(&body.status) {
        Ok(status) => status,
        Err(message) => return invalid_status_response(message),
    };

    let campaigns_repo = CampaignRepository::new((*state.db).clone());
    match campaigns_repo
        .set_status(campaign_id, status, state.credits.min_daily_budget)
        .await
    {
        Ok(campaign) => {
            // The bidder learns about every transition; a failed
            // notification is logged and the transition stands.
            notify_bidder(&state, campaign_id).await;
            campaign_with_flags(&state, campaign, StatusCode::OK).await
        }
        Err(e) => campaign_error_response(e),
    }
}

/// DELETE `/campaigns/{campaign_id}` - Remove a campaign.
async fn delete_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<CampaignId>,
) -> impl IntoResponse {
    let campaigns_repo = CampaignRepository::new((*state.db).clone());
    match campaigns_repo.delete_campaign(campaign_id).await {
        Ok(()) => {
            if let Err(e) = state.bidder.delete_campaign(campaign_id).await {
                warn!(error = %e, %campaign_id, "Bidder notification failed; not retrying");
            }
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => campaign_error_response(e),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn notify_bidder(state: &AppState, campaign_id: CampaignId) {
    if let Err(e) = state.bidder.update_campaign(campaign_id).await {
        warn!(error = %e, %campaign_id, "Bidder notification failed; not retrying");
    }
}

/// Renders a campaign with serving flags computed from the current balance.
async fn campaign_with_flags(
    state: &AppState,
    campaign: campaigns::Model,
    status_code: StatusCode,
) -> Response {
    let accounts = AccountRepository::new((*state.db).clone());
    let available = match accounts.get_account(campaign.account_id).await {
        Ok(account) => account.balance,
        Err(e) => return account_error_response(e),
    };

    (
        status_code,
        Json(CampaignResponse::from_model(
            campaign,
            available,
            state.credits.min_daily_budget,
        )),
    )
        .into_response()
}

fn invalid_status_response(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "INVALID_STATUS",
            "message": message,
        })),
    )
        .into_response()
}

fn campaign_error_response(err: CampaignError) -> Response {
    match err {
        CampaignError::NotFound(id) => {
            app_error_response(&AppError::NotFound(format!("Campaign {id}")))
        }
        CampaignError::AccountNotFound(id) => {
            app_error_response(&AppError::NotFound(format!("Account {id}")))
        }
        CampaignError::Gate(e) => {
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
        CampaignError::Database(e) => {
            error!(error = %e, "Campaign operation failed");
            internal_error_response()
        }
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
    async fn test_unknown_target_status_is_rejected() {
        let app = create_router(test_state());

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/api/v1/campaigns/{}/status", uuid::Uuid::new_v4()))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"status": "runnable"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "INVALID_STATUS");
    }

    #[tokio::test]
    async fn test_create_with_unknown_status_is_rejected() {
        let app = create_router(test_state());

        let request = Request::builder()
            .method("POST")
            .uri(format!(
                "/api/v1/accounts/{}/campaigns",
                uuid::Uuid::new_v4()
            ))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name": "Spring push", "status": "expired"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
