/*
[INPUT]:  REST Transport (for bullet tokens) and WebSocketClientOption
[OUTPUT]: Public/private channel handles per market
[POS]:    WebSocket layer - real-time data streams
[UPDATE]: When adding new channels or changing connection logic
*/

pub mod message;
pub mod private;
pub mod public;
pub mod service;
pub mod token;
pub mod topic;
pub mod transport;

use std::sync::Arc;

use crate::config::{Domain, WebSocketClientOption};
use crate::http::Transport;

pub use message::{WebSocketEvent, WsMessage};
pub use private::SpotPrivateWs;
pub use public::{FuturesPublicWs, MarginPublicWs, SpotPublicWs};
pub use service::DefaultWsService;
pub use token::{DefaultWsTokenProvider, WsToken, WsTokenProvider};
pub use topic::{CallbackError, CallbackResult, MessageCallback, SubInfo};
pub use transport::WebSocketTransport;

/// Factory for channel handles; each handle owns its own connection
#[derive(Debug, Clone)]
pub struct WsService {
    transport: Arc<Transport>,
    option: WebSocketClientOption,
}

impl WsService {
    pub(crate) fn new(transport: Arc<Transport>, option: WebSocketClientOption) -> Self {
        Self { transport, option }
    }

    fn service(&self, domain: Domain, private: bool) -> DefaultWsService {
        let provider = DefaultWsTokenProvider::new(self.transport.clone(), domain, private);
        DefaultWsService::new(Arc::new(provider), self.option.clone(), private)
    }

    pub fn new_spot_public_ws(&self) -> SpotPublicWs {
        SpotPublicWs::new(self.service(Domain::Spot, false))
    }

    pub fn new_spot_private_ws(&self) -> SpotPrivateWs {
        SpotPrivateWs::new(self.service(Domain::Spot, true))
    }

    pub fn new_margin_public_ws(&self) -> MarginPublicWs {
        MarginPublicWs::new(self.service(Domain::Spot, false))
    }

    pub fn new_futures_public_ws(&self) -> FuturesPublicWs {
        FuturesPublicWs::new(self.service(Domain::Futures, false))
    }
}
