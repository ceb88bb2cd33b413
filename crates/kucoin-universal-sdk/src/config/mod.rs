/*
[INPUT]:  Builder calls from applications (credentials, endpoints, tuning)
[OUTPUT]: Validated ClientOption / TransportOption / WebSocketClientOption
[POS]:    Configuration layer - everything a DefaultClient is built from
[UPDATE]: When adding options or changing defaults
*/

pub mod client;
pub mod transport;
pub mod websocket;

pub use client::{ClientOption, ClientOptionBuilder};
pub use transport::{TransportOption, TransportOptionBuilder};
pub use websocket::{WebSocketClientOption, WebSocketClientOptionBuilder, WebSocketEventCallback};

pub const GLOBAL_API_ENDPOINT: &str = "https://api.kucoin.com";
pub const GLOBAL_FUTURES_API_ENDPOINT: &str = "https://api-futures.kucoin.com";
pub const GLOBAL_BROKER_API_ENDPOINT: &str = "https://api-broker.kucoin.com";

pub const RESULT_CODE_SUCCESS: &str = "200000";

/// Which base endpoint a call targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Spot,
    Futures,
    Broker,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Spot => "spot",
            Domain::Futures => "futures",
            Domain::Broker => "broker",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
