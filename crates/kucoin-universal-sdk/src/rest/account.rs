/*
[INPUT]:  Fee query requests
[OUTPUT]: Basic and per-symbol trading fee rates
[POS]:    REST layer - account domain (spot endpoint)
[UPDATE]: When adding account endpoints
*/

use std::sync::Arc;

use reqwest::Method;

use crate::config::Domain;
use crate::http::{RestResponse, Result, Transport};
use crate::types::{GetBasicFeeReq, GetBasicFeeResp, GetSpotActualFeeReq, GetSpotActualFeeResp};

#[derive(Debug, Clone)]
pub struct AccountService {
    transport: Arc<Transport>,
}

impl AccountService {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub fn fee_api(&self) -> FeeApi {
        FeeApi {
            transport: self.transport.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeeApi {
    transport: Arc<Transport>,
}

impl FeeApi {
    /// Get basic fee rate of the account
    ///
    /// GET /api/v1/base-fee?currencyType={0|1}
    pub async fn get_basic_fee(&self, req: &GetBasicFeeReq) -> Result<RestResponse<GetBasicFeeResp>> {
        self.transport
            .call(Domain::Spot, false, Method::GET, "/api/v1/base-fee", req)
            .await
    }

    /// Get actual fee rates for up to 10 spot symbols
    ///
    /// GET /api/v1/trade-fees?symbols={symbols}
    pub async fn get_spot_actual_fee(
        &self,
        req: &GetSpotActualFeeReq,
    ) -> Result<RestResponse<GetSpotActualFeeResp>> {
        self.transport
            .call(Domain::Spot, false, Method::GET, "/api/v1/trade-fees", req)
            .await
    }
}
