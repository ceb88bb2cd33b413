/*
[INPUT]:  Spot market queries and HF order requests
[OUTPUT]: Symbols, tickers, stats, server time, order results
[POS]:    REST layer - spot domain
[UPDATE]: When adding spot endpoints
*/

use std::sync::Arc;

use reqwest::Method;

use crate::config::Domain;
use crate::http::{RestResponse, Result, Transport};
use crate::types::{
    AddOrderReq, AddOrderResp, AddOrderSyncReq, AddOrderSyncResp, CancelOrderByOrderIdReq,
    CancelOrderByOrderIdResp, Get24hrStatsReq, Get24hrStatsResp, GetAllSymbolsReq,
    GetAllSymbolsResp, GetOrderByOrderIdReq, GetOrderByOrderIdResp, GetServerTimeResp,
    GetTickerReq, GetTickerResp,
};

#[derive(Debug, Clone)]
pub struct SpotService {
    transport: Arc<Transport>,
}

impl SpotService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub fn market_api(&self) -> SpotMarketApi {
        SpotMarketApi {
            transport: self.transport.clone(),
        }
    }

    pub fn order_api(&self) -> SpotOrderApi {
        SpotOrderApi {
            transport: self.transport.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpotMarketApi {
    transport: Arc<Transport>,
}

impl SpotMarketApi {
    /// GET /api/v2/symbols?market={market}
    pub async fn get_all_symbols(&self, req: &GetAllSymbolsReq) -> Result<RestResponse<GetAllSymbolsResp>> {
        self.transport
            .call(Domain::Spot, false, Method::GET, "/api/v2/symbols", req)
            .await
    }

    /// Best bid/ask and last trade
    ///
    /// GET /api/v1/market/orderbook/level1?symbol={symbol}
    pub async fn get_ticker(&self, req: &GetTickerReq) -> Result<RestResponse<GetTickerResp>> {
        self.transport
            .call(
                Domain::Spot,
                false,
                Method::GET,
                "/api/v1/market/orderbook/level1",
                req,
            )
            .await
    }

    /// GET /api/v1/market/stats?symbol={symbol}
    pub async fn get_24hr_stats(&self, req: &Get24hrStatsReq) -> Result<RestResponse<Get24hrStatsResp>> {
        self.transport
            .call(Domain::Spot, false, Method::GET, "/api/v1/market/stats", req)
            .await
    }

    /// GET /api/v1/timestamp
    pub async fn get_server_time(&self) -> Result<RestResponse<GetServerTimeResp>> {
        self.transport
            .call(Domain::Spot, false, Method::GET, "/api/v1/timestamp", &())
            .await
    }
}

#[derive(Debug, Clone)]
pub struct SpotOrderApi {
    transport: Arc<Transport>,
}

impl SpotOrderApi {
    /// POST /api/v1/hf/orders
    pub async fn add_order(&self, req: &AddOrderReq) -> Result<RestResponse<AddOrderResp>> {
        self.transport
            .call(Domain::Spot, false, Method::POST, "/api/v1/hf/orders", req)
            .await
    }

    /// Place an order and wait for the matching result
    ///
    /// POST /api/v1/hf/orders/sync
    pub async fn add_order_sync(&self, req: &AddOrderSyncReq) -> Result<RestResponse<AddOrderSyncResp>> {
        self.transport
            .call(Domain::Spot, false, Method::POST, "/api/v1/hf/orders/sync", req)
            .await
    }

    /// GET /api/v1/hf/orders/{orderId}?symbol={symbol}
    pub async fn get_order_by_order_id(
        &self,
        req: &GetOrderByOrderIdReq,
    ) -> Result<RestResponse<GetOrderByOrderIdResp>> {
        self.transport
            .call(Domain::Spot, false, Method::GET, "/api/v1/hf/orders/{orderId}", req)
            .await
    }

    /// DELETE /api/v1/hf/orders/{orderId}?symbol={symbol}
    pub async fn cancel_order_by_order_id(
        &self,
        req: &CancelOrderByOrderIdReq,
    ) -> Result<RestResponse<CancelOrderByOrderIdResp>> {
        self.transport
            .call(Domain::Spot, false, Method::DELETE, "/api/v1/hf/orders/{orderId}", req)
            .await
    }
}
