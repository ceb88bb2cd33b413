/*
[INPUT]:  Futures market queries and order requests
[OUTPUT]: Futures ticker, 24h stats and order results
[POS]:    REST layer - futures domain (futures endpoint)
[UPDATE]: When adding futures endpoints
*/

use std::sync::Arc;

use reqwest::Method;

use crate::config::Domain;
use crate::http::{RestResponse, Result, Transport};
use crate::types::{
    CancelOrderByIdReq, CancelOrderByIdResp, Futures24hrStatsResp, FuturesAddOrderReq,
    FuturesAddOrderResp, FuturesGetOrderByOrderIdReq, FuturesGetOrderByOrderIdResp,
    FuturesTickerResp, SymbolReq,
};

#[derive(Debug, Clone)]
pub struct FuturesService {
    transport: Arc<Transport>,
}

impl FuturesService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub fn market_api(&self) -> FuturesMarketApi {
        FuturesMarketApi {
            transport: self.transport.clone(),
        }
    }

    pub fn order_api(&self) -> FuturesOrderApi {
        FuturesOrderApi {
            transport: self.transport.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FuturesMarketApi {
    transport: Arc<Transport>,
}

impl FuturesMarketApi {
    /// GET /api/v1/ticker?symbol={symbol}
    pub async fn get_ticker(&self, req: &SymbolReq) -> Result<RestResponse<FuturesTickerResp>> {
        self.transport
            .call(Domain::Futures, false, Method::GET, "/api/v1/ticker", req)
            .await
    }

    /// Platform-wide 24h turnover
    ///
    /// GET /api/v1/trade-statistics
    pub async fn get_24hr_stats(&self) -> Result<RestResponse<Futures24hrStatsResp>> {
        self.transport
            .call(Domain::Futures, false, Method::GET, "/api/v1/trade-statistics", &())
            .await
    }
}

#[derive(Debug, Clone)]
pub struct FuturesOrderApi {
    transport: Arc<Transport>,
}

impl FuturesOrderApi {
    /// POST /api/v1/orders
    pub async fn add_order(&self, req: &FuturesAddOrderReq) -> Result<RestResponse<FuturesAddOrderResp>> {
        self.transport
            .call(Domain::Futures, false, Method::POST, "/api/v1/orders", req)
            .await
    }

    /// GET /api/v1/orders/{orderId}
    pub async fn get_order_by_order_id(
        &self,
        req: &FuturesGetOrderByOrderIdReq,
    ) -> Result<RestResponse<FuturesGetOrderByOrderIdResp>> {
        self.transport
            .call(Domain::Futures, false, Method::GET, "/api/v1/orders/{orderId}", req)
            .await
    }

    /// DELETE /api/v1/orders/{orderId}
    pub async fn cancel_order_by_id(
        &self,
        req: &CancelOrderByIdReq,
    ) -> Result<RestResponse<CancelOrderByIdResp>> {
        self.transport
            .call(Domain::Futures, false, Method::DELETE, "/api/v1/orders/{orderId}", req)
            .await
    }
}
