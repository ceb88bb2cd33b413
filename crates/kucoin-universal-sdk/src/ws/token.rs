/*
[INPUT]:  REST Transport, domain, public/private flag
[OUTPUT]: Connect tokens and instance servers (bullet endpoints)
[POS]:    WebSocket layer - connection credentials
[UPDATE]: When token acquisition changes
*/

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::config::Domain;
use crate::http::{KucoinError, Result, Transport};

const BULLET_PUBLIC: &str = "/api/v1/bullet-public";
const BULLET_PRIVATE: &str = "/api/v1/bullet-private";

/// One instance server with the token needed to dial it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsToken {
    #[serde(rename = "$token", default)]
    pub token: String,
    pub endpoint: String,
    #[serde(default)]
    pub encrypt: bool,
    #[serde(default)]
    pub protocol: String,
    /// Milliseconds
    pub ping_interval: u64,
    /// Milliseconds
    pub ping_timeout: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulletData {
    token: String,
    instance_servers: Vec<WsToken>,
}

/// Source of connect tokens; swapped out in tests
#[async_trait]
pub trait WsTokenProvider: Send + Sync + std::fmt::Debug {
    async fn get_token(&self) -> Result<Vec<WsToken>>;
}

/// Fetches tokens from the bullet endpoints
#[derive(Debug, Clone)]
pub struct DefaultWsTokenProvider {
    transport: Arc<Transport>,
    domain: Domain,
    private: bool,
}

impl DefaultWsTokenProvider {
    pub fn new(transport: Arc<Transport>, domain: Domain, private: bool) -> Self {
        Self {
            transport,
            domain,
            private,
        }
    }
}

#[async_trait]
impl WsTokenProvider for DefaultWsTokenProvider {
    async fn get_token(&self) -> Result<Vec<WsToken>> {
        let path = if self.private { BULLET_PRIVATE } else { BULLET_PUBLIC };
        let response = self
            .transport
            .call::<_, BulletData>(self.domain, false, Method::POST, path, &())
            .await?;

        let BulletData {
            token,
            instance_servers,
        } = response.data;

        if instance_servers.is_empty() {
            return Err(KucoinError::WebSocket(
                "bullet response has no instance servers".to_string(),
            ));
        }

        Ok(instance_servers
            .into_iter()
            .map(|server| WsToken {
                token: token.clone(),
                ..server
            })
            .collect())
    }
}
