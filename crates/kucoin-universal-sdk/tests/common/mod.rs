/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for kucoin-universal-sdk tests

#![allow(dead_code)]

use std::time::Duration;

use kucoin_universal_sdk::{ClientOption, TransportOption, WebSocketClientOption};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const TEST_KEY: &str = "test-key";
pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSPHRASE: &str = "test-passphrase";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Transport tuned for fast failures against local mocks
pub fn fast_transport() -> TransportOption {
    TransportOption::builder()
        .connect_timeout(Duration::from_secs(2))
        .read_timeout(Duration::from_secs(2))
        .max_retries(0)
        .build()
}

/// Client option pointing every domain at the mock server, with credentials
pub fn signed_option(server: &MockServer) -> ClientOption {
    ClientOption::builder()
        .key(TEST_KEY)
        .secret(TEST_SECRET)
        .passphrase(TEST_PASSPHRASE)
        .spot_endpoint(server.uri())
        .futures_endpoint(server.uri())
        .broker_endpoint(server.uri())
        .transport_option(fast_transport())
        .build()
        .expect("valid test option")
}

/// Client option without credentials
pub fn public_option(server: &MockServer) -> ClientOption {
    ClientOption::builder()
        .spot_endpoint(server.uri())
        .futures_endpoint(server.uri())
        .transport_option(fast_transport())
        .build()
        .expect("valid test option")
}

pub fn fast_ws_option() -> WebSocketClientOption {
    WebSocketClientOption::builder()
        .reconnect(false)
        .dial_timeout(Duration::from_secs(2))
        .write_timeout(Duration::from_secs(2))
        .build()
}

/// Success envelope around `data`
pub fn ok_body(data: Value) -> Value {
    json!({ "code": "200000", "data": data })
}
