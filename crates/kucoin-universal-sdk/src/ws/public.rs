/*
[INPUT]:  DefaultWsService on a public connection, symbols, typed callbacks
[OUTPUT]: Spot, margin and futures public channel subscriptions
[POS]:    WebSocket layer - public channel handles
[UPDATE]: When adding public channels
*/

use crate::http::{KucoinError, Result};
use crate::types::{
    FuturesExecutionEvent, FuturesOrderbookDepthEvent, FuturesTickerV1Event, FuturesTickerV2Event,
    IndicatorPriceEvent, OrderbookDepthEvent, TickerEvent, TradeEvent,
};
use crate::ws::service::DefaultWsService;
use crate::ws::topic::CallbackResult;

pub(crate) fn symbol_args<S: AsRef<str>>(symbols: &[S]) -> Result<Vec<String>> {
    if symbols.is_empty() {
        return Err(KucoinError::InvalidRequest(
            "at least one symbol is required".to_string(),
        ));
    }
    Ok(symbols.iter().map(|s| s.as_ref().to_string()).collect())
}

/// Spot market data: tickers, trades and depth snapshots
#[derive(Debug, Clone)]
pub struct SpotPublicWs {
    service: DefaultWsService,
}

impl SpotPublicWs {
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

    /// `/market/ticker:{symbols}`
    pub async fn ticker<S, F>(&self, symbols: &[S], callback: F) -> Result<String>
    where
        S: AsRef<str>,
        F: Fn(&str, &str, TickerEvent) -> CallbackResult + Send + Sync + 'static,
    {
        self.service
            .subscribe_typed("/market/ticker", symbol_args(symbols)?, callback)
            .await
    }

    /// `/market/ticker:all`, subject carries the symbol
    pub async fn all_tickers<F>(&self, callback: F) -> Result<String>
    where
        F: Fn(&str, &str, TickerEvent) -> CallbackResult + Send + Sync + 'static,
    {
        self.service
            .subscribe_typed("/market/ticker:all", Vec::new(), callback)
            .await
    }

    /// `/market/match:{symbols}`
    pub async fn trade<S, F>(&self, symbols: &[S], callback: F) -> Result<String>
    where
        S: AsRef<str>,
        F: Fn(&str, &str, TradeEvent) -> CallbackResult + Send + Sync + 'static,
    {
        self.service
            .subscribe_typed("/market/match", symbol_args(symbols)?, callback)
            .await
    }

    /// `/spotMarket/level2Depth5:{symbols}`
    pub async fn orderbook_level5<S, F>(&self, symbols: &[S], callback: F) -> Result<String>
    where
        S: AsRef<str>,
        F: Fn(&str, &str, OrderbookDepthEvent) -> CallbackResult + Send + Sync + 'static,
    {
        self.service
            .subscribe_typed("/spotMarket/level2Depth5", symbol_args(symbols)?, callback)
            .await
    }

    /// `/spotMarket/level2Depth50:{symbols}`
    pub async fn orderbook_level50<S, F>(&self, symbols: &[S], callback: F) -> Result<String>
    where
        S: AsRef<str>,
        F: Fn(&str, &str, OrderbookDepthEvent) -> CallbackResult + Send + Sync + 'static,
    {
        self.service
            .subscribe_typed("/spotMarket/level2Depth50", symbol_args(symbols)?, callback)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct MarginPublicWs {
    service: DefaultWsService,
}

impl MarginPublicWs {
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

    /// `/indicator/index:{symbols}`
    pub async fn index_price<S, F>(&self, symbols: &[S], callback: F) -> Result<String>
    where
        S: AsRef<str>,
        F: Fn(&str, &str, IndicatorPriceEvent) -> CallbackResult + Send + Sync + 'static,
    {
        self.service
            .subscribe_typed("/indicator/index", symbol_args(symbols)?, callback)
            .await
    }

    /// `/indicator/markPrice:{symbols}`
    pub async fn mark_price<S, F>(&self, symbols: &[S], callback: F) -> Result<String>
    where
        S: AsRef<str>,
        F: Fn(&str, &str, IndicatorPriceEvent) -> CallbackResult + Send + Sync + 'static,
    {
        self.service
            .subscribe_typed("/indicator/markPrice", symbol_args(symbols)?, callback)
            .await
    }
}

/// Futures market data, one contract per subscription
#[derive(Debug, Clone)]
pub struct FuturesPublicWs {
    service: DefaultWsService,
}

impl FuturesPublicWs {
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

    pub async fn ticker_v1<F>(&self, symbol: &str, callback: F) -> Result<String>
    where
        F: Fn(&str, &str, FuturesTickerV1Event) -> CallbackResult + Send + Sync + 'static,
    {
        self.service
            .subscribe_typed("/contractMarket/ticker", symbol_args(&[symbol])?, callback)
            .await
    }

    pub async fn ticker_v2<F>(&self, symbol: &str, callback: F) -> Result<String>
    where
        F: Fn(&str, &str, FuturesTickerV2Event) -> CallbackResult + Send + Sync + 'static,
    {
        self.service
            .subscribe_typed("/contractMarket/tickerV2", symbol_args(&[symbol])?, callback)
            .await
    }

    pub async fn execution<F>(&self, symbol: &str, callback: F) -> Result<String>
    where
        F: Fn(&str, &str, FuturesExecutionEvent) -> CallbackResult + Send + Sync + 'static,
    {
        self.service
            .subscribe_typed("/contractMarket/execution", symbol_args(&[symbol])?, callback)
            .await
    }

    pub async fn orderbook_level50<F>(&self, symbol: &str, callback: F) -> Result<String>
    where
        F: Fn(&str, &str, FuturesOrderbookDepthEvent) -> CallbackResult + Send + Sync + 'static,
    {
        self.service
            .subscribe_typed("/contractMarket/level2Depth50", symbol_args(&[symbol])?, callback)
            .await
    }
}
