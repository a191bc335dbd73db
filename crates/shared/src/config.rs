//! Application configuration management.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Credits and budget thresholds.
    #[serde(default)]
    pub credits: CreditsConfig,
    /// Bidder (Crosstalk) notification configuration.
    #[serde(default)]
    pub bidder: BidderConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Credits and budget thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditsConfig {
    /// Minimum single deposit amount, enforced at the API layer.
    #[serde(default = "default_min_deposit_amount")]
    pub min_deposit_amount: Decimal,
    /// Floor for a campaign's daily budget, enforced by the spend gate.
    #[serde(default = "default_min_daily_budget")]
    pub min_daily_budget: Decimal,
}

fn default_min_deposit_amount() -> Decimal {
    Decimal::new(1000, 2) // 10.00
}

fn default_min_daily_budget() -> Decimal {
    Decimal::new(2500, 2) // 25.00
}

impl Default for CreditsConfig {
    fn default() -> Self {
        Self {
            min_deposit_amount: default_min_deposit_amount(),
            min_daily_budget: default_min_daily_budget(),
        }
    }
}

/// Bidder (Crosstalk) notification configuration.
///
/// Each managed region maps to one Crosstalk host; campaign updates are
/// posted to the region's host on `http://{host}:{port}/api`.
#[derive(Debug, Clone, Deserialize)]
pub struct BidderConfig {
    /// Region name to Crosstalk host.
    #[serde(default = "default_region_hosts")]
    pub region_hosts: HashMap<String, String>,
    /// Crosstalk API port. Must match the Crosstalk config.json setting.
    #[serde(default = "default_bidder_port")]
    pub port: u16,
    /// Crosstalk API username.
    #[serde(default = "default_bidder_user")]
    pub username: String,
    /// Crosstalk API password.
    #[serde(default)]
    pub password: String,
    /// Request timeout in seconds.
    #[serde(default = "default_bidder_timeout")]
    pub timeout_secs: u64,
}

fn default_region_hosts() -> HashMap<String, String> {
    HashMap::from([("US".to_string(), "crosstalk".to_string())])
}

fn default_bidder_port() -> u16 {
    8100
}

fn default_bidder_user() -> String {
    "ben*".to_string()
}

fn default_bidder_timeout() -> u64 {
    5
}

impl Default for BidderConfig {
    fn default() -> Self {
        Self {
            region_hosts: default_region_hosts(),
            port: default_bidder_port(),
            username: default_bidder_user(),
            password: String::new(),
            timeout_secs: default_bidder_timeout(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ADNEXUS").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credits_defaults() {
        let credits = CreditsConfig::default();
        assert_eq!(credits.min_deposit_amount, dec!(10.00));
        assert_eq!(credits.min_daily_budget, dec!(25.00));
    }

    #[test]
    fn test_bidder_defaults() {
        let bidder = BidderConfig::default();
        assert_eq!(bidder.port, 8100);
        assert_eq!(bidder.region_hosts.get("US").map(String::as_str), Some("crosstalk"));
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("ADNEXUS__DATABASE__URL", Some("postgres://localhost/adnexus_test")),
                ("ADNEXUS__SERVER__PORT", Some("9090")),
                ("ADNEXUS__CREDITS__MIN_DAILY_BUDGET", Some("50.00")),
            ],
            || {
                let config = AppConfig::load().expect("config should load from env");
                assert_eq!(config.database.url, "postgres://localhost/adnexus_test");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.credits.min_daily_budget, dec!(50.00));
            },
        );
    }
}
