/*
[INPUT]:  Margin order requests
[OUTPUT]: Margin order placement, query and cancellation results
[POS]:    REST layer - margin domain (spot endpoint)
[UPDATE]: When adding margin endpoints
*/

use std::sync::Arc;

use reqwest::Method;

use crate::config::Domain;
use crate::http::{RestResponse, Result, Transport};
use crate::types::{
    CancelOrderByOrderIdReq, CancelOrderByOrderIdResp, GetOrderByOrderIdReq, GetOrderByOrderIdResp,
    MarginAddOrderReq, MarginAddOrderResp,
};

#[derive(Debug, Clone)]
pub struct MarginService {
    transport: Arc<Transport>,
}

impl MarginService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub fn order_api(&self) -> MarginOrderApi {
        MarginOrderApi {
            transport: self.transport.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarginOrderApi {
    transport: Arc<Transport>,
}

impl MarginOrderApi {
    /// Place a cross or isolated margin order
    ///
    /// POST /api/v3/hf/margin/order
    pub async fn add_order(&self, req: &MarginAddOrderReq) -> Result<RestResponse<MarginAddOrderResp>> {
        self.transport
            .call(Domain::Spot, false, Method::POST, "/api/v3/hf/margin/order", req)
            .await
    }

    /// GET /api/v3/hf/margin/orders/{orderId}?symbol={symbol}
    pub async fn get_order_by_order_id(
        &self,
        req: &GetOrderByOrderIdReq,
    ) -> Result<RestResponse<GetOrderByOrderIdResp>> {
        self.transport
            .call(
                Domain::Spot,
                false,
                Method::GET,
                "/api/v3/hf/margin/orders/{orderId}",
                req,
            )
            .await
    }

    /// DELETE /api/v3/hf/margin/orders/{orderId}?symbol={symbol}
    pub async fn cancel_order_by_order_id(
        &self,
        req: &CancelOrderByOrderIdReq,
    ) -> Result<RestResponse<CancelOrderByOrderIdResp>> {
        self.transport
            .call(
                Domain::Spot,
                false,
                Method::DELETE,
                "/api/v3/hf/margin/orders/{orderId}",
                req,
            )
            .await
    }
}
