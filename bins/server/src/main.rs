//! Adnexus API Server
//!
//! Main entry point for the Adnexus campaign manager backend.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adnexus_api::{AppState, bidder::BidderClient, create_router};
use adnexus_db::connect;
use adnexus_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adnexus=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create bidder client
    let bidder = BidderClient::new(config.bidder.clone())?;
    info!(
        regions = config.bidder.region_hosts.len(),
        port = config.bidder.port,
        "Bidder client configured"
    );

    // A dead bidder is logged, not fatal; campaigns still manage fine.
    if let Err(e) = bidder.ping().await {
        tracing::warn!(error = %e, "Bidder ping failed at startup");
    }

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        credits: Arc::new(config.credits.clone()),
        bidder: Arc::new(bidder),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
