//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for credits and campaigns
//! - The bidder (Crosstalk) notification client
//! - Response types

pub mod bidder;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use adnexus_shared::CreditsConfig;

use crate::bidder::BidderClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Credits and budget thresholds.
    pub credits: Arc<CreditsConfig>,
    /// Bidder notification client.
    pub bidder: Arc<BidderClient>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
