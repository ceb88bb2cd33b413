/*
[INPUT]:  Optional YAML overrides file, API_* environment variables
[OUTPUT]: RegressionConfig and the ClientOption built from it
[POS]:    Configuration layer - regression runner setup
[UPDATE]: When adding new configuration options
*/

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use kucoin_universal_sdk::config::{
    GLOBAL_API_ENDPOINT, GLOBAL_BROKER_API_ENDPOINT, GLOBAL_FUTURES_API_ENDPOINT,
};
use kucoin_universal_sdk::{ClientOption, LoggingInterceptor, TransportOption, WebSocketClientOption};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_API_SECRET: &str = "API_SECRET";
pub const ENV_API_PASSPHRASE: &str = "API_PASSPHRASE";

/// Runner settings; every field has a default so the file is optional
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegressionConfig {
    pub spot_endpoint: String,
    pub futures_endpoint: String,
    pub broker_endpoint: String,
    /// Spot symbols used by ticker / order book subscriptions
    pub symbols: Vec<String>,
    pub futures_symbol: String,
    /// Market filter for the symbol list queries
    pub market: String,
    /// Cap on trade subscriptions in the reconnect run
    pub max_trade_symbols: usize,
    /// Seconds between forever-loop iterations and stats lines
    pub interval_secs: u64,
    /// Log every REST call through the access-log interceptor
    pub access_log: bool,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            spot_endpoint: GLOBAL_API_ENDPOINT.to_string(),
            futures_endpoint: GLOBAL_FUTURES_API_ENDPOINT.to_string(),
            broker_endpoint: GLOBAL_BROKER_API_ENDPOINT.to_string(),
            symbols: vec!["BTC-USDT".to_string(), "ETH-USDT".to_string()],
            futures_symbol: "XBTUSDTM".to_string(),
            market: "USDS".to_string(),
            max_trade_symbols: 50,
            interval_secs: 5,
            access_log: false,
        }
    }
}

/// API credentials read from the environment
#[derive(Clone, Default)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
    pub passphrase: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"***")
            .field("passphrase", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).unwrap_or_default();
        let credentials = Self {
            key: read(ENV_API_KEY),
            secret: read(ENV_API_SECRET),
            passphrase: read(ENV_API_PASSPHRASE),
        };
        if !credentials.is_complete() {
            warn!("API credentials incomplete, private calls will be rejected");
        }
        credentials
    }

    pub fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.secret.is_empty() && !self.passphrase.is_empty()
    }
}

impl RegressionConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Defaults, overridden by `path` when given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let path_str = path.to_str().context("config path must be valid utf-8")?;
        let config = Self::from_file(path_str).with_context(|| format!("load config {path_str}"))?;
        info!(path = path_str, "configuration loaded");
        Ok(config)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn client_option(
        &self,
        credentials: &Credentials,
        websocket: WebSocketClientOption,
    ) -> Result<ClientOption> {
        let mut transport = TransportOption::builder();
        if self.access_log {
            transport = transport.add_interceptor(std::sync::Arc::new(LoggingInterceptor));
        }

        ClientOption::builder()
            .key(credentials.key.as_str())
            .secret(credentials.secret.as_str())
            .passphrase(credentials.passphrase.as_str())
            .spot_endpoint(self.spot_endpoint.as_str())
            .futures_endpoint(self.futures_endpoint.as_str())
            .broker_endpoint(self.broker_endpoint.as_str())
            .transport_option(transport.build())
            .websocket_client_option(websocket)
            .build()
            .context("build client option")
    }
}
