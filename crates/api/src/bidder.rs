//! Bidder (Crosstalk) notification client.
//!
//! The campaign manager tells each region's Crosstalk host about campaign
//! changes over a plain JSON POST. The call is synchronous fan-out with a
//! short timeout and no retry: a failure is returned to the caller, who
//! logs it and moves on. The bidder reconciles on its own schedule.

use std::time::Duration;

use serde_json::json;
use thiserror::Error;
use tracing::debug;

use adnexus_shared::BidderConfig;
use adnexus_shared::types::CampaignId;

/// Errors from bidder notification attempts.
#[derive(Debug, Error)]
pub enum BidderError {
    /// The HTTP request to a Crosstalk host failed.
    #[error("Bidder request to {host} failed: {source}")]
    Request {
        /// The host the request targeted.
        host: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// A Crosstalk host answered with a non-success status.
    #[error("Bidder at {host} returned status {status}")]
    Status {
        /// The host that answered.
        host: String,
        /// The HTTP status it returned.
        status: u16,
    },
}

/// Client for the Crosstalk API on each managed region.
#[derive(Debug)]
pub struct BidderClient {
    client: reqwest::Client,
    config: BidderConfig,
}

impl BidderClient {
    /// Creates a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: BidderConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Checks that every configured Crosstalk host answers.
    ///
    /// # Errors
    ///
    /// Returns the first failure encountered.
    pub async fn ping(&self) -> Result<(), BidderError> {
        self.broadcast("Ping#", None).await
    }

    /// Tells every region that a campaign changed.
    ///
    /// # Errors
    ///
    /// Returns the first failure encountered; callers log and continue.
    pub async fn update_campaign(&self, campaign_id: CampaignId) -> Result<(), BidderError> {
        self.broadcast("Update#", Some(campaign_id)).await
    }

    /// Tells every region that a campaign was removed.
    ///
    /// # Errors
    ///
    /// Returns the first failure encountered; callers log and continue.
    pub async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<(), BidderError> {
        self.broadcast("Delete#", Some(campaign_id)).await
    }

    async fn broadcast(
        &self,
        command: &str,
        campaign_id: Option<CampaignId>,
    ) -> Result<(), BidderError> {
        for (region, host) in &self.config.region_hosts {
            let url = format!("http://{host}:{}/api", self.config.port);

            let mut body = json!({
                "type": command,
                "username": self.config.username,
                "password": self.config.password,
                "async": true,
            });
            if let Some(id) = campaign_id {
                body["campaign"] = json!(id.to_string());
            }

            debug!(%region, %host, command, "Notifying bidder");

            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|source| BidderError::Request {
                    host: host.clone(),
                    source,
                })?;

            if !response.status().is_success() {
                return Err(BidderError::Status {
                    host: host.clone(),
                    status: response.status().as_u16(),
                });
            }
        }

        Ok(())
    }
}
