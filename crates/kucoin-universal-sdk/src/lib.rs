/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public KuCoin SDK crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod client;
pub mod config;
pub mod http;
pub mod rest;
pub mod types;
pub mod ws;

pub use client::DefaultClient;

pub use config::{
    ClientOption,
    ClientOptionBuilder,
    Domain,
    TransportOption,
    TransportOptionBuilder,
    WebSocketClientOption,
    WebSocketClientOptionBuilder,
    WebSocketEventCallback,
};

// Re-export commonly used types from http
pub use http::{
    Interceptor,
    KcSigner,
    KucoinError,
    LoggingInterceptor,
    RestRateLimit,
    RestResponse,
    Result,
};

pub use rest::RestService;

// Re-export all types
pub use types::*;

pub use ws::{
    CallbackError,
    CallbackResult,
    FuturesPublicWs,
    MarginPublicWs,
    SpotPrivateWs,
    SpotPublicWs,
    WebSocketEvent,
    WsMessage,
    WsService,
};
