/*
[INPUT]:  Validated ClientOption
[OUTPUT]: DefaultClient exposing the REST tree and WebSocket factory
[POS]:    Crate entry point - one shared HTTP transport per client
[UPDATE]: When the top-level client surface changes
*/

use std::sync::Arc;

use crate::config::ClientOption;
use crate::http::{Result, Transport};
use crate::rest::RestService;
use crate::ws::WsService;

/// Entry point of the SDK
///
/// ```no_run
/// use kucoin_universal_sdk::{ClientOption, DefaultClient};
///
/// # async fn run() -> kucoin_universal_sdk::Result<()> {
/// let option = ClientOption::builder().build()?;
/// let client = DefaultClient::new(option)?;
/// let time = client
///     .rest_service()
///     .spot_service()
///     .market_api()
///     .get_server_time()
///     .await?;
/// println!("server time {}", time.data);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DefaultClient {
    rest: RestService,
    ws: WsService,
}

impl DefaultClient {
    pub fn new(option: ClientOption) -> Result<Self> {
        let ws_option = option.websocket_client_option.clone();
        let transport = Arc::new(Transport::new(option)?);
        Ok(Self {
            rest: RestService::new(transport.clone()),
            ws: WsService::new(transport, ws_option),
        })
    }

    pub fn rest_service(&self) -> &RestService {
        &self.rest
    }

    pub fn ws_service(&self) -> &WsService {
        &self.ws
    }
}
