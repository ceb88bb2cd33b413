/*
[INPUT]:  WebSocket test scenarios against a local server
[OUTPUT]: Test results for WebSocket transport and subscriptions
[POS]:    Integration tests - WebSocket
[UPDATE]: When WebSocket client changes
*/

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use common::{fast_ws_option, ok_body, public_option, setup_mock_server};
use futures_util::{SinkExt, StreamExt};
use kucoin_universal_sdk::config::Domain;
use kucoin_universal_sdk::http::Transport;
use kucoin_universal_sdk::ws::{
    DefaultWsService, DefaultWsTokenProvider, WsToken, WsTokenProvider,
};
use kucoin_universal_sdk::{
    KucoinError, Result, SpotPublicWs, TickerEvent, WebSocketClientOption,
    WebSocketClientOptionBuilder, WebSocketEvent,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_test::assert_ok;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct LocalTokens {
    endpoint: String,
    ping_interval: u64,
    ping_timeout: u64,
}

impl LocalTokens {
    fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            ping_interval: 18_000,
            ping_timeout: 10_000,
        }
    }
}

#[async_trait]
impl WsTokenProvider for LocalTokens {
    async fn get_token(&self) -> Result<Vec<WsToken>> {
        Ok(vec![WsToken {
            token: "local-token".to_string(),
            endpoint: self.endpoint.clone(),
            encrypt: false,
            protocol: "websocket".to_string(),
            ping_interval: self.ping_interval,
            ping_timeout: self.ping_timeout,
        }])
    }
}

/// How the local server misbehaves
#[derive(Debug, Clone, Copy, Default)]
struct ServerBehavior {
    /// The first N connections close right after their first subscription
    drop_after_subscribe: usize,
    /// Never answer `ping`
    ignore_pings: bool,
    /// Stop listening once this many connections were accepted
    max_connections: Option<usize>,
}

fn ticker_data() -> Value {
    json!({
        "sequence": "1545896668986",
        "price": "0.08",
        "size": "0.011",
        "bestAsk": "0.08",
        "bestAskSize": "0.18",
        "bestBid": "0.049",
        "bestBidSize": "0.036",
        "Time": 1704873323416_i64
    })
}

fn text(value: Value) -> Message {
    Message::Text(value.to_string().into())
}

async fn spawn_server(drop_after_subscribe: usize) -> (String, Arc<AtomicUsize>) {
    spawn_server_with(ServerBehavior {
        drop_after_subscribe,
        ..ServerBehavior::default()
    })
    .await
}

/// Local KuCoin-like server: welcome, pong, ack, one push per subscribed symbol.
/// Topics containing `BAD` get an error frame.
async fn spawn_server_with(behavior: ServerBehavior) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("ws://{}/endpoint", listener.local_addr().unwrap());
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = connections.clone();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let index = counter.fetch_add(1, Ordering::SeqCst);
            let last = behavior
                .max_connections
                .is_some_and(|limit| index + 1 >= limit);
            tokio::spawn(async move {
                let Ok(mut ws) = accept_async(stream).await else {
                    return;
                };
                if ws
                    .send(text(json!({ "id": "hello", "type": "welcome" })))
                    .await
                    .is_err()
                {
                    return;
                }

                while let Some(Ok(frame)) = ws.next().await {
                    let Message::Text(raw) = frame else {
                        continue;
                    };
                    let request: Value = serde_json::from_str(raw.as_str()).unwrap();
                    let id = request["id"].clone();
                    let topic = request["topic"].as_str().unwrap_or_default().to_string();

                    match request["type"].as_str() {
                        Some("ping") if behavior.ignore_pings => {}
                        Some("ping") => {
                            let _ = ws.send(text(json!({ "id": id, "type": "pong" }))).await;
                        }
                        Some("unsubscribe") => {
                            let _ = ws.send(text(json!({ "id": id, "type": "ack" }))).await;
                        }
                        Some("subscribe") if topic.contains("BAD") => {
                            let _ = ws
                                .send(text(json!({
                                    "id": id,
                                    "type": "error",
                                    "code": 404,
                                    "data": "topic does not exist"
                                })))
                                .await;
                        }
                        Some("subscribe") => {
                            let _ = ws.send(text(json!({ "id": id, "type": "ack" }))).await;
                            let (prefix, symbols) = topic.split_once(':').unwrap_or((topic.as_str(), ""));
                            for symbol in symbols.split(',').filter(|s| !s.is_empty()) {
                                let _ = ws
                                    .send(text(json!({
                                        "type": "message",
                                        "topic": format!("{prefix}:{symbol}"),
                                        "subject": "trade.ticker",
                                        "data": ticker_data()
                                    })))
                                    .await;
                            }
                            if index < behavior.drop_after_subscribe {
                                let _ = ws.send(Message::Close(None)).await;
                                return;
                            }
                        }
                        _ => {}
                    }
                }
            });
            if last {
                break;
            }
        }
    });

    (endpoint, connections)
}

fn spot_public(endpoint: String, option: WebSocketClientOption) -> SpotPublicWs {
    let service = DefaultWsService::new(Arc::new(LocalTokens::new(endpoint)), option, false);
    SpotPublicWs::new(service)
}

type EventLog = mpsc::UnboundedReceiver<(WebSocketEvent, String)>;

fn recording_builder(reconnect: bool) -> (WebSocketClientOptionBuilder, EventLog) {
    let (tx, rx) = mpsc::unbounded_channel();
    let builder = WebSocketClientOption::builder()
        .reconnect(reconnect)
        .reconnect_interval(Duration::from_millis(100))
        .dial_timeout(Duration::from_secs(2))
        .write_timeout(Duration::from_secs(2))
        .event_callback(move |event, message| {
            let _ = tx.send((event, message.to_string()));
        });
    (builder, rx)
}

fn recording_option(reconnect: bool) -> (WebSocketClientOption, EventLog) {
    let (builder, rx) = recording_builder(reconnect);
    (builder.build(), rx)
}

async fn wait_for_event(events: &mut EventLog, wanted: WebSocketEvent) -> String {
    let found = tokio::time::timeout(WAIT, async {
        while let Some((event, message)) = events.recv().await {
            if event == wanted {
                return Some(message);
            }
        }
        None
    })
    .await;
    found.ok().flatten().unwrap_or_else(|| panic!("event {wanted} not received"))
}

#[tokio::test]
async fn test_subscribe_dispatches_typed_messages() {
    let (endpoint, _) = spawn_server(0).await;
    let (option, mut events) = recording_option(false);
    let ws = spot_public(endpoint, option);
    assert_ok!(ws.start().await);
    wait_for_event(&mut events, WebSocketEvent::Connected).await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = assert_ok!(
        ws.ticker(&["ETH-USDT", "BTC-USDT"], move |topic, subject, event: TickerEvent| {
            let _ = tx.send((topic.to_string(), subject.to_string(), event));
            Ok(())
        })
        .await
    );
    assert_eq!(id, "/market/ticker@@BTC-USDT,ETH-USDT");

    let mut topics = Vec::new();
    for _ in 0..2 {
        let (topic, subject, event) = tokio::time::timeout(WAIT, rx.recv())
            .await
            .ok()
            .flatten()
            .expect("ticker push");
        assert_eq!(subject, "trade.ticker");
        assert_eq!(event.time, 1704873323416);
        topics.push(topic);
    }
    topics.sort();
    assert_eq!(topics, vec!["/market/ticker:BTC-USDT", "/market/ticker:ETH-USDT"]);

    assert_ok!(ws.unsubscribe(&id).await);
    assert_ok!(ws.stop().await);
    wait_for_event(&mut events, WebSocketEvent::ClientShutdown).await;
}

#[tokio::test]
async fn test_duplicate_subscription_is_rejected() {
    let (endpoint, _) = spawn_server(0).await;
    let ws = spot_public(endpoint, fast_ws_option());
    assert_ok!(ws.start().await);

    let first = assert_ok!(ws.trade(&["BTC-USDT"], |_, _, _: kucoin_universal_sdk::TradeEvent| Ok(())).await);
    let err = ws
        .trade(&["BTC-USDT"], |_, _, _: kucoin_universal_sdk::TradeEvent| Ok(()))
        .await
        .unwrap_err();
    assert!(matches!(err, KucoinError::AlreadySubscribed(ref id) if *id == first));

    assert_ok!(ws.stop().await);
}

#[tokio::test]
async fn test_error_frame_fails_subscribe() {
    let (endpoint, _) = spawn_server(0).await;
    let (option, mut events) = recording_option(false);
    let ws = spot_public(endpoint, option);
    assert_ok!(ws.start().await);

    let err = ws
        .orderbook_level5(&["BAD-PAIR"], |_, _, _: kucoin_universal_sdk::OrderbookDepthEvent| Ok(()))
        .await
        .unwrap_err();
    assert!(matches!(err, KucoinError::WebSocket(ref reason) if reason == "topic does not exist"));
    let reason = wait_for_event(&mut events, WebSocketEvent::ErrorReceived).await;
    assert_eq!(reason, "topic does not exist");

    // The failed entry is gone, so the same topic can be retried.
    let err = ws
        .orderbook_level5(&["BAD-PAIR"], |_, _, _: kucoin_universal_sdk::OrderbookDepthEvent| Ok(()))
        .await
        .unwrap_err();
    assert!(!matches!(err, KucoinError::AlreadySubscribed(_)));

    assert_ok!(ws.stop().await);
}

#[tokio::test]
async fn test_callback_error_is_reported() {
    let (endpoint, _) = spawn_server(0).await;
    let (option, mut events) = recording_option(false);
    let ws = spot_public(endpoint, option);
    assert_ok!(ws.start().await);

    assert_ok!(
        ws.ticker(&["BTC-USDT"], |_, _, _: TickerEvent| Err("boom".into()))
            .await
    );
    let message = wait_for_event(&mut events, WebSocketEvent::CallbackError).await;
    assert!(message.contains("boom"));

    assert_ok!(ws.stop().await);
}

#[tokio::test]
async fn test_reconnect_resubscribes() {
    let (endpoint, connections) = spawn_server(1).await;
    let (option, mut events) = recording_option(true);
    let ws = spot_public(endpoint, option);
    assert_ok!(ws.start().await);

    let pushes = Arc::new(AtomicUsize::new(0));
    let seen = pushes.clone();
    let id = assert_ok!(
        ws.ticker(&["BTC-USDT"], move |_, _, _: TickerEvent| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await
    );

    wait_for_event(&mut events, WebSocketEvent::Disconnected).await;
    wait_for_event(&mut events, WebSocketEvent::TryReconnect).await;
    let resubscribed = wait_for_event(&mut events, WebSocketEvent::ReSubscribeOk).await;
    assert_eq!(resubscribed, id);
    assert_eq!(connections.load(Ordering::SeqCst), 2);

    let delivered = tokio::time::timeout(WAIT, async {
        while pushes.load(Ordering::SeqCst) < 2 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;
    assert!(delivered.is_ok());

    assert_ok!(ws.stop().await);
}

#[tokio::test]
async fn test_missed_pong_drops_and_reconnects() {
    let (endpoint, connections) = spawn_server_with(ServerBehavior {
        ignore_pings: true,
        ..ServerBehavior::default()
    })
    .await;
    let (option, mut events) = recording_option(true);
    let tokens = LocalTokens {
        endpoint,
        ping_interval: 200,
        ping_timeout: 200,
    };
    let ws = SpotPublicWs::new(DefaultWsService::new(Arc::new(tokens), option, false));
    assert_ok!(ws.start().await);
    wait_for_event(&mut events, WebSocketEvent::Connected).await;

    let reason = wait_for_event(&mut events, WebSocketEvent::ErrorReceived).await;
    assert!(reason.starts_with("ping failed"), "{reason}");
    wait_for_event(&mut events, WebSocketEvent::Disconnected).await;
    wait_for_event(&mut events, WebSocketEvent::TryReconnect).await;
    wait_for_event(&mut events, WebSocketEvent::Connected).await;
    assert!(connections.load(Ordering::SeqCst) >= 2);

    assert_ok!(ws.stop().await);
}

#[tokio::test]
async fn test_exhausted_reconnect_attempts_emit_client_fail() {
    let (endpoint, connections) = spawn_server_with(ServerBehavior {
        drop_after_subscribe: 1,
        max_connections: Some(1),
        ..ServerBehavior::default()
    })
    .await;
    let (builder, mut events) = recording_builder(true);
    let option = builder.reconnect_attempts(1).build();
    let service = DefaultWsService::new(Arc::new(LocalTokens::new(endpoint)), option, false);
    let ws = SpotPublicWs::new(service.clone());
    assert_ok!(ws.start().await);

    assert_ok!(ws.ticker(&["BTC-USDT"], |_, _, _: TickerEvent| Ok(())).await);

    wait_for_event(&mut events, WebSocketEvent::Disconnected).await;
    let attempt = wait_for_event(&mut events, WebSocketEvent::TryReconnect).await;
    assert_eq!(attempt, "attempt 1");
    let reason = wait_for_event(&mut events, WebSocketEvent::ClientFail).await;
    assert!(reason.contains("1 attempts"), "{reason}");
    assert!(!service.is_connected());
    assert_eq!(connections.load(Ordering::SeqCst), 1);

    assert_ok!(ws.stop().await);
}

#[tokio::test]
async fn test_subscribe_before_start_fails() {
    let (endpoint, _) = spawn_server(0).await;
    let ws = spot_public(endpoint, fast_ws_option());
    let err = ws
        .ticker(&["BTC-USDT"], |_, _, _: TickerEvent| Ok(()))
        .await
        .unwrap_err();
    assert!(matches!(err, KucoinError::NotConnected));
}

#[tokio::test]
async fn test_bullet_token_provider() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/bullet-public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "token": "2neAiuYvAU61ZD",
            "instanceServers": [{
                "endpoint": "wss://ws-api-spot.kucoin.com/",
                "encrypt": true,
                "protocol": "websocket",
                "pingInterval": 18000,
                "pingTimeout": 10000
            }]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let transport = Arc::new(assert_ok!(Transport::new(public_option(&server))));
    let provider = DefaultWsTokenProvider::new(transport, Domain::Spot, false);
    let tokens = assert_ok!(provider.get_token().await);

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token, "2neAiuYvAU61ZD");
    assert_eq!(tokens[0].endpoint, "wss://ws-api-spot.kucoin.com/");
    assert_eq!(tokens[0].ping_interval, 18000);
}

#[tokio::test]
async fn test_bullet_without_servers_is_an_error() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/bullet-public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "token": "t",
            "instanceServers": []
        }))))
        .mount(&server)
        .await;

    let transport = Arc::new(assert_ok!(Transport::new(public_option(&server))));
    let provider = DefaultWsTokenProvider::new(transport, Domain::Spot, false);
    assert!(matches!(
        provider.get_token().await,
        Err(KucoinError::WebSocket(_))
    ));
}
