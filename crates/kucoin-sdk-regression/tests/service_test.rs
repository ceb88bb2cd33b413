/*
[INPUT]:  Mock exchange responses for every REST regression case
[OUTPUT]: Verification of case checks, summaries and symbol selection
[POS]:    Integration test layer - regression runner against a mock server
[UPDATE]: When adding regression cases
*/

use kucoin_sdk_regression::service::{self, Summary};
use kucoin_sdk_regression::{Credentials, RegressionConfig, reconnect};
use kucoin_universal_sdk::{DefaultClient, WebSocketClientOption};
use serde_json::{Value, json};
use tokio_test::assert_ok;
use wiremock::matchers::{body_partial_json, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("gw-ratelimit-limit", "4000")
        .insert_header("gw-ratelimit-remaining", "3990")
        .insert_header("gw-ratelimit-reset", "25000")
        .set_body_json(json!({ "code": "200000", "data": data }))
}

fn client_for(server: &MockServer, config: &mut RegressionConfig) -> DefaultClient {
    config.spot_endpoint = server.uri();
    config.futures_endpoint = server.uri();
    let credentials = Credentials {
        key: "key".to_string(),
        secret: "secret".to_string(),
        passphrase: "pass".to_string(),
    };
    let option = config
        .client_option(&credentials, WebSocketClientOption::default())
        .expect("client option");
    DefaultClient::new(option).expect("client")
}

fn savings_product() -> Value {
    json!({
        "id": "2172",
        "currency": "USDT",
        "category": "DEMAND",
        "type": "DEMAND",
        "precision": 8,
        "productUpperLimit": "480",
        "productRemainAmount": "132.36",
        "userUpperLimit": "20",
        "userLowerLimit": "0.01",
        "redeemPeriod": 0,
        "lockStartTime": 1644807600000_i64,
        "lockEndTime": null,
        "applyStartTime": 1644807600000_i64,
        "applyEndTime": null,
        "returnRate": "0.00047208",
        "incomeCurrency": "USDT",
        "earlyRedeemSupported": 0,
        "status": "ONGOING",
        "redeemType": "MANUAL",
        "incomeReleaseType": "DAILY",
        "interestDate": 1729267200000_i64,
        "duration": 0,
        "newUserOnly": 0
    })
}

fn order_detail(id: &str) -> Value {
    json!({
        "id": id,
        "symbol": "BTC-USDT",
        "type": "limit",
        "side": "buy",
        "price": "10000",
        "size": "0.001",
        "createdAt": 1729521456248_i64,
        "active": true
    })
}

fn futures_order_detail(id: &str) -> Value {
    json!({
        "id": id,
        "symbol": "XBTUSDTM",
        "type": "limit",
        "side": "buy",
        "price": "1",
        "size": 1,
        "createdAt": 1729236185949_i64,
        "marginMode": "CROSS",
        "status": "open"
    })
}

async fn mount_happy_path(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/base-fee"))
        .respond_with(ok(json!({ "takerFeeRate": "0.001", "makerFeeRate": "0.001" })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/earn/saving/products"))
        .and(query_param("currency", "USDT"))
        .respond_with(ok(json!([savings_product()])))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v3/hf/margin/order"))
        .and(body_partial_json(json!({ "isIsolated": true, "autoBorrow": true })))
        .respond_with(ok(json!({ "orderId": "m-1", "loanApplyId": "600656d9a33ac90009de4f6f" })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/hf/margin/orders/m-1"))
        .and(query_param("symbol", "BTC-USDT"))
        .respond_with(ok(order_detail("m-1")))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v3/hf/margin/orders/m-1"))
        .and(query_param("symbol", "BTC-USDT"))
        .respond_with(ok(json!({ "orderId": "m-1" })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/market/stats"))
        .respond_with(ok(json!({ "time": 1729175612158_i64, "symbol": "BTC-USDT", "last": "67000" })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/hf/orders/sync"))
        .respond_with(ok(json!({
            "orderId": "s-1",
            "orderTime": 1729176273859_i64,
            "status": "open"
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/hf/orders/s-1"))
        .and(query_param("symbol", "BTC-USDT"))
        .respond_with(ok(order_detail("s-1")))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/hf/orders/s-1"))
        .respond_with(ok(json!({ "orderId": "s-1" })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/trade-statistics"))
        .respond_with(ok(json!({ "turnoverOf24h": 1.1155733413273683e9 })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders"))
        .respond_with(ok(json!({ "orderId": "f-1" })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orders/f-1"))
        .respond_with(ok(futures_order_detail("f-1")))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/orders/f-1"))
        .respond_with(ok(json!({ "cancelledOrderIds": ["f-1"] })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_all_cases_pass_against_healthy_exchange() {
    let server = MockServer::start().await;
    mount_happy_path(&server).await;

    let mut config = RegressionConfig::default();
    let client = client_for(&server, &mut config);
    let results = service::run_all(&client, &config).await;

    let names: Vec<_> = results.iter().map(|result| result.name).collect();
    assert_eq!(names, vec!["account", "earn", "margin", "spot", "futures"]);
    for result in &results {
        assert!(result.passed(), "{result}: {:?}", result.error);
    }
    assert!(Summary::from_results(&results).success());
}

#[tokio::test]
async fn test_empty_savings_products_fail_earn_case() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/earn/saving/products"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    let mut config = RegressionConfig::default();
    let client = client_for(&server, &mut config);
    let err = service::earn_case(&client).await.unwrap_err();
    assert!(err.to_string().contains("no USDT savings products"));
}

#[tokio::test]
async fn test_missing_fee_rate_fails_account_case() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/base-fee"))
        .respond_with(ok(json!({ "takerFeeRate": "0.001" })))
        .mount(&server)
        .await;

    let mut config = RegressionConfig::default();
    let client = client_for(&server, &mut config);
    assert!(service::account_case(&client).await.is_err());
}

#[tokio::test]
async fn test_spot_case_rejects_incomplete_responses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/market/stats"))
        .respond_with(ok(json!({ "time": 1729175612158_i64, "symbol": "BTC-USDT", "last": null })))
        .mount(&server)
        .await;

    let mut config = RegressionConfig::default();
    let client = client_for(&server, &mut config);
    let err = service::spot_case(&client, &config).await.unwrap_err();
    assert!(err.to_string().contains("missing last price"));

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/market/stats"))
        .respond_with(ok(json!({ "time": 1729175612158_i64, "symbol": "BTC-USDT", "last": "67000" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/hf/orders/sync"))
        .respond_with(ok(json!({ "orderId": "s-2", "orderTime": 0, "status": "open" })))
        .mount(&server)
        .await;
    let err = service::spot_case(&client, &config).await.unwrap_err();
    assert!(err.to_string().contains("order time"));
}

#[tokio::test]
async fn test_margin_case_rejects_empty_cancel_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v3/hf/margin/order"))
        .respond_with(ok(json!({ "orderId": "m-2" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/hf/margin/orders/m-2"))
        .respond_with(ok(order_detail("m-2")))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v3/hf/margin/orders/m-2"))
        .respond_with(ok(json!({ "orderId": "" })))
        .mount(&server)
        .await;

    let mut config = RegressionConfig::default();
    let client = client_for(&server, &mut config);
    let err = service::margin_case(&client, &config).await.unwrap_err();
    assert!(err.to_string().contains("cancelled order id is empty"));
}

#[tokio::test]
async fn test_futures_query_failure_stops_before_cancel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/trade-statistics"))
        .respond_with(ok(json!({ "turnoverOf24h": 1.0e9 })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders"))
        .respond_with(ok(json!({ "orderId": "f-2" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/orders/f-2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": "100001", "msg": "order not exist" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/orders/f-2"))
        .respond_with(ok(json!({ "cancelledOrderIds": ["f-2"] })))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = RegressionConfig::default();
    let client = client_for(&server, &mut config);
    let err = service::futures_case(&client, &config).await.unwrap_err();
    assert!(format!("{err:#}").contains("futures query order"));
}

#[tokio::test]
async fn test_api_error_marks_case_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/base-fee"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": "400003", "msg": "KC-API-KEY not exists" })),
        )
        .mount(&server)
        .await;

    let mut config = RegressionConfig::default();
    let client = client_for(&server, &mut config);
    let result = service::account_case(&client).await;

    let err = result.unwrap_err();
    let rendered = format!("{err:#}");
    assert!(rendered.contains("get basic fee"));
    assert!(rendered.contains("400003"));
}

#[tokio::test]
async fn test_missing_rate_limit_fails_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/earn/saving/products"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "code": "200000", "data": [] })),
        )
        .mount(&server)
        .await;

    let mut config = RegressionConfig::default();
    let client = client_for(&server, &mut config);
    assert!(service::earn_case(&client).await.is_err());
}

fn symbol_info(symbol: &str) -> Value {
    json!({
        "symbol": symbol,
        "name": symbol,
        "baseCurrency": "BASE",
        "quoteCurrency": "USDT",
        "feeCurrency": "USDT",
        "market": "USDS",
        "baseMinSize": "0.1",
        "quoteMinSize": "0.1",
        "baseMaxSize": "10000000000",
        "quoteMaxSize": "99999999",
        "baseIncrement": "0.0001",
        "quoteIncrement": "0.000001",
        "priceIncrement": "0.000001",
        "priceLimitRate": "0.1",
        "minFunds": "0.1",
        "isMarginEnabled": false,
        "enableTrading": true
    })
}

#[tokio::test]
async fn test_trade_symbols_respects_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex("^/api/v2/symbols$"))
        .and(query_param("market", "USDS"))
        .respond_with(ok(json!([
            symbol_info("AAA-USDT"),
            symbol_info("BBB-USDT"),
            symbol_info("CCC-USDT")
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = RegressionConfig {
        max_trade_symbols: 2,
        ..RegressionConfig::default()
    };
    let client = client_for(&server, &mut config);
    let symbols = assert_ok!(reconnect::trade_symbols(&client, &config).await);
    assert_eq!(symbols, vec!["AAA-USDT".to_string(), "BBB-USDT".to_string()]);
}
