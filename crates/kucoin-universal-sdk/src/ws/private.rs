/*
[INPUT]:  DefaultWsService on a private (token-authenticated) connection
[OUTPUT]: Account balance and order change subscriptions
[POS]:    WebSocket layer - private channel handles
[UPDATE]: When adding private channels
*/

use crate::http::Result;
use crate::types::{BalanceEvent, OrderV2Event};
use crate::ws::service::DefaultWsService;
use crate::ws::topic::CallbackResult;

#[derive(Debug, Clone)]
pub struct SpotPrivateWs {
    service: DefaultWsService,
}

impl SpotPrivateWs {
    pub fn new(service: DefaultWsService) -> Self {
        Self { service }
    }

    pub async fn start(&self) -> Result<()> {
        self.service.start().await
    }

    pub async fn stop(&self) -> Result<()> {
        self.service.stop().await
    }

    pub async fn unsubscribe(&self, id: &str) -> Result<()> {
        self.service.unsubscribe(id).await
    }

    /// `/account/balance`
    pub async fn balance<F>(&self, callback: F) -> Result<String>
    where
        F: Fn(&str, &str, BalanceEvent) -> CallbackResult + Send + Sync + 'static,
    {
        self.service
            .subscribe_typed("/account/balance", Vec::new(), callback)
            .await
    }

    /// `/spotMarket/tradeOrdersV2`
    pub async fn order_v2<F>(&self, callback: F) -> Result<String>
    where
        F: Fn(&str, &str, OrderV2Event) -> CallbackResult + Send + Sync + 'static,
    {
        self.service
            .subscribe_typed("/spotMarket/tradeOrdersV2", Vec::new(), callback)
            .await
    }
}
