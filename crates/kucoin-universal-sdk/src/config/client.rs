/*
[INPUT]:  Credentials, broker info, endpoint overrides, nested transport/ws options
[OUTPUT]: Validated ClientOption
[POS]:    Configuration layer - top-level client settings
[UPDATE]: When adding client-wide options
*/

use url::Url;

use super::{
    Domain, GLOBAL_API_ENDPOINT, GLOBAL_BROKER_API_ENDPOINT, GLOBAL_FUTURES_API_ENDPOINT,
    TransportOption, WebSocketClientOption,
};
use crate::http::{KucoinError, Result};

/// Everything a client needs to talk to the exchange
#[derive(Clone)]
pub struct ClientOption {
    pub key: String,
    pub secret: String,
    pub passphrase: String,
    pub broker_name: String,
    pub broker_partner: String,
    pub broker_key: String,
    pub spot_endpoint: String,
    pub futures_endpoint: String,
    pub broker_endpoint: String,
    pub transport_option: TransportOption,
    pub websocket_client_option: WebSocketClientOption,
}

impl std::fmt::Debug for ClientOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOption")
            .field("key", &self.key)
            .field("broker_name", &self.broker_name)
            .field("spot_endpoint", &self.spot_endpoint)
            .field("futures_endpoint", &self.futures_endpoint)
            .field("broker_endpoint", &self.broker_endpoint)
            .field("transport_option", &self.transport_option)
            .field("websocket_client_option", &self.websocket_client_option)
            .finish_non_exhaustive()
    }
}

impl ClientOption {
    pub fn builder() -> ClientOptionBuilder {
        ClientOptionBuilder::default()
    }

    /// Base endpoint for a domain
    pub fn endpoint(&self, domain: Domain) -> &str {
        match domain {
            Domain::Spot => &self.spot_endpoint,
            Domain::Futures => &self.futures_endpoint,
            Domain::Broker => &self.broker_endpoint,
        }
    }
}

#[derive(Debug, Default)]
pub struct ClientOptionBuilder {
    key: String,
    secret: String,
    passphrase: String,
    broker_name: String,
    broker_partner: String,
    broker_key: String,
    spot_endpoint: Option<String>,
    futures_endpoint: Option<String>,
    broker_endpoint: Option<String>,
    transport_option: Option<TransportOption>,
    websocket_client_option: Option<WebSocketClientOption>,
}

impl ClientOptionBuilder {
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = passphrase.into();
        self
    }

    pub fn broker_name(mut self, name: impl Into<String>) -> Self {
        self.broker_name = name.into();
        self
    }

    pub fn broker_partner(mut self, partner: impl Into<String>) -> Self {
        self.broker_partner = partner.into();
        self
    }

    pub fn broker_key(mut self, key: impl Into<String>) -> Self {
        self.broker_key = key.into();
        self
    }

    pub fn spot_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.spot_endpoint = Some(endpoint.into());
        self
    }

    pub fn futures_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.futures_endpoint = Some(endpoint.into());
        self
    }

    pub fn broker_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.broker_endpoint = Some(endpoint.into());
        self
    }

    pub fn transport_option(mut self, option: TransportOption) -> Self {
        self.transport_option = Some(option);
        self
    }

    pub fn websocket_client_option(mut self, option: WebSocketClientOption) -> Self {
        self.websocket_client_option = Some(option);
        self
    }

    /// Validate endpoints and assemble the option
    pub fn build(self) -> Result<ClientOption> {
        let spot_endpoint = validate_endpoint(
            Domain::Spot,
            self.spot_endpoint.unwrap_or_else(|| GLOBAL_API_ENDPOINT.to_string()),
        )?;
        let futures_endpoint = validate_endpoint(
            Domain::Futures,
            self.futures_endpoint
                .unwrap_or_else(|| GLOBAL_FUTURES_API_ENDPOINT.to_string()),
        )?;
        let broker_endpoint = validate_endpoint(
            Domain::Broker,
            self.broker_endpoint
                .unwrap_or_else(|| GLOBAL_BROKER_API_ENDPOINT.to_string()),
        )?;

        Ok(ClientOption {
            key: self.key,
            secret: self.secret,
            passphrase: self.passphrase,
            broker_name: self.broker_name,
            broker_partner: self.broker_partner,
            broker_key: self.broker_key,
            spot_endpoint,
            futures_endpoint,
            broker_endpoint,
            transport_option: self.transport_option.unwrap_or_default(),
            websocket_client_option: self.websocket_client_option.unwrap_or_default(),
        })
    }
}

fn validate_endpoint(domain: Domain, endpoint: String) -> Result<String> {
    let endpoint = endpoint.trim().trim_end_matches('/').to_string();
    if endpoint.is_empty() {
        return Err(KucoinError::Config(format!("{domain} endpoint is empty")));
    }
    Url::parse(&endpoint)
        .map_err(|e| KucoinError::Config(format!("{domain} endpoint {endpoint:?}: {e}")))?;
    Ok(endpoint)
}
