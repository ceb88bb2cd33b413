/*
[INPUT]:  Savings product queries
[OUTPUT]: Earn product listings
[POS]:    REST layer - earn domain (spot endpoint)
[UPDATE]: When adding earn endpoints
*/

use std::sync::Arc;

use reqwest::Method;

use crate::config::Domain;
use crate::http::{RestResponse, Result, Transport};
use crate::types::{GetSavingsProductsReq, GetSavingsProductsResp};

#[derive(Debug, Clone)]
pub struct EarnService {
    transport: Arc<Transport>,
}

impl EarnService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub fn earn_api(&self) -> EarnApi {
        EarnApi {
            transport: self.transport.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EarnApi {
    transport: Arc<Transport>,
}

impl EarnApi {
    /// GET /api/v1/earn/saving/products?currency={currency}
    pub async fn get_savings_products(
        &self,
        req: &GetSavingsProductsReq,
    ) -> Result<RestResponse<GetSavingsProductsResp>> {
        self.transport
            .call(Domain::Spot, false, Method::GET, "/api/v1/earn/saving/products", req)
            .await
    }
}
