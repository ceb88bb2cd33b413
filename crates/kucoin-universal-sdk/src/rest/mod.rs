/*
[INPUT]:  Shared REST Transport
[OUTPUT]: Per-domain service facades (account, earn, margin, spot, futures)
[POS]:    REST layer - entry point returned by DefaultClient::rest_service
[UPDATE]: When adding a domain service
*/

pub mod account;
pub mod earn;
pub mod futures;
pub mod margin;
pub mod spot;

use std::sync::Arc;

use crate::http::Transport;

pub use account::{AccountService, FeeApi};
pub use earn::{EarnApi, EarnService};
pub use futures::{FuturesMarketApi, FuturesOrderApi, FuturesService};
pub use margin::{MarginOrderApi, MarginService};
pub use spot::{SpotMarketApi, SpotOrderApi, SpotService};

/// Root of the REST API tree
#[derive(Debug, Clone)]
pub struct RestService {
    transport: Arc<Transport>,
}

impl RestService {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub fn account_service(&self) -> AccountService {
        AccountService::new(self.transport.clone())
    }

    pub fn earn_service(&self) -> EarnService {
        EarnService::new(self.transport.clone())
    }

    pub fn margin_service(&self) -> MarginService {
        MarginService::new(self.transport.clone())
    }

    pub fn spot_service(&self) -> SpotService {
        SpotService::new(self.transport.clone())
    }

    pub fn futures_service(&self) -> FuturesService {
        FuturesService::new(self.transport.clone())
    }
}
