/*
[INPUT]:  Token provider, WebSocketClientOption, outgoing WsMessage frames
[OUTPUT]: Live connection with acked writes, heartbeat, automatic reconnect
[POS]:    WebSocket layer - connection lifecycle
[UPDATE]: When changing dial, heartbeat or reconnect behavior
*/

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use rand::seq::SliceRandom;
use tokio::net::TcpStream;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::WebSocketClientOption;
use crate::http::{KucoinError, Result};
use crate::ws::message::{
    TYPE_ACK, TYPE_COMMAND, TYPE_ERROR, TYPE_MESSAGE, TYPE_NOTICE, TYPE_PONG, TYPE_WELCOME,
    WebSocketEvent, WsMessage,
};
use crate::ws::token::WsTokenProvider;

const DROP_LOG_LIMIT: usize = 10;
const PARSE_FAIL_LOG_LIMIT: usize = 3;
const RAW_LOG_MAX_BYTES: usize = 1024;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWrite = SplitSink<WsStream, Message>;
type WsRead = SplitStream<WsStream>;
type AckSender = oneshot::Sender<Result<()>>;

/// What the transport hands to the layer above
#[derive(Debug)]
pub enum TransportEvent {
    /// A `message` frame for topic dispatch
    Message(WsMessage),
    /// A fresh connection replaced a dropped one
    Reconnected,
}

struct Connection {
    cancel: CancellationToken,
    reader: JoinHandle<()>,
}

/// Reconnecting WebSocket connection with ack tracking
#[derive(Clone)]
pub struct WebSocketTransport {
    inner: Arc<Inner>,
}

struct Inner {
    token_provider: Arc<dyn WsTokenProvider>,
    option: WebSocketClientOption,
    connected: AtomicBool,
    shutting_down: AtomicBool,
    pending: Mutex<HashMap<String, AckSender>>,
    outbound: Mutex<Option<mpsc::Sender<Message>>>,
    events: Mutex<Option<mpsc::Sender<TransportEvent>>>,
    shutdown: Mutex<Option<CancellationToken>>,
    supervisor: Mutex<Option<JoinHandle<()>>>,
    dropped_messages: AtomicUsize,
    parse_failures: AtomicUsize,
}

impl std::fmt::Debug for WebSocketTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketTransport")
            .field("token_provider", &self.inner.token_provider)
            .field("connected", &self.inner.connected.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl WebSocketTransport {
    pub fn new(token_provider: Arc<dyn WsTokenProvider>, option: WebSocketClientOption) -> Self {
        Self {
            inner: Arc::new(Inner {
                token_provider,
                option,
                connected: AtomicBool::new(false),
                shutting_down: AtomicBool::new(false),
                pending: Mutex::new(HashMap::new()),
                outbound: Mutex::new(None),
                events: Mutex::new(None),
                shutdown: Mutex::new(None),
                supervisor: Mutex::new(None),
                dropped_messages: AtomicUsize::new(0),
                parse_failures: AtomicUsize::new(0),
            }),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::SeqCst)
    }

    /// Dial, wait for the welcome frame and start supervising the connection
    pub async fn start(&self, events: mpsc::Sender<TransportEvent>) -> Result<()> {
        let mut supervisor = self.inner.supervisor.lock().await;
        if supervisor.is_some() {
            return Err(KucoinError::WebSocket("transport already started".to_string()));
        }

        self.inner.shutting_down.store(false, Ordering::SeqCst);
        *self.inner.events.lock().await = Some(events);

        let shutdown = CancellationToken::new();
        let connection = match self.inner.dial(&shutdown).await {
            Ok(connection) => connection,
            Err(err) => {
                *self.inner.events.lock().await = None;
                return Err(err);
            }
        };

        self.inner.connected.store(true, Ordering::SeqCst);
        self.inner.option.notify(WebSocketEvent::Connected, "");
        info!("websocket connected");

        *self.inner.shutdown.lock().await = Some(shutdown.clone());
        let inner = self.inner.clone();
        *supervisor = Some(tokio::spawn(async move {
            inner.supervise(connection, shutdown).await;
        }));
        Ok(())
    }

    /// Close the connection for good and fail every pending write
    pub async fn stop(&self) -> Result<()> {
        self.inner.shutting_down.store(true, Ordering::SeqCst);

        if let Some(shutdown) = self.inner.shutdown.lock().await.take() {
            shutdown.cancel();
        }
        let supervisor = self.inner.supervisor.lock().await.take();
        if let Some(handle) = supervisor
            && let Err(err) = handle.await
        {
            warn!(error = %err, "websocket supervisor ended abnormally");
        }

        self.inner.connected.store(false, Ordering::SeqCst);
        *self.inner.outbound.lock().await = None;
        self.inner.fail_pending().await;
        *self.inner.events.lock().await = None;

        self.inner.option.notify(WebSocketEvent::ClientShutdown, "");
        info!("websocket transport stopped");
        Ok(())
    }

    /// Send a frame carrying an id and wait for its ack/pong
    pub async fn write(&self, message: WsMessage, timeout: Duration) -> Result<()> {
        if !self.is_connected() {
            return Err(KucoinError::NotConnected);
        }
        let sender = self
            .inner
            .outbound
            .lock()
            .await
            .clone()
            .ok_or(KucoinError::NotConnected)?;
        self.inner.send_and_wait(&sender, message, timeout).await
    }
}

impl Inner {
    async fn dial(self: &Arc<Self>, shutdown: &CancellationToken) -> Result<Connection> {
        let tokens = self.token_provider.get_token().await?;
        let server = tokens
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| KucoinError::WebSocket("no instance servers available".to_string()))?;

        let mut url = Url::parse(&server.endpoint)?;
        url.query_pairs_mut()
            .append_pair("connectId", &now_nanos().to_string())
            .append_pair("token", &server.token);

        let dial_timeout = self.option.dial_timeout;
        debug!(endpoint = %server.endpoint, "dialing websocket");

        let (stream, _response) = tokio::time::timeout(dial_timeout, connect_async(url.as_str()))
            .await
            .map_err(|_| KucoinError::WebSocket(format!("dial timeout after {dial_timeout:?}")))?
            .map_err(|err| KucoinError::WebSocket(err.to_string()))?;

        let (write, mut read) = stream.split();
        tokio::time::timeout(dial_timeout, wait_welcome(&mut read))
            .await
            .map_err(|_| KucoinError::WebSocket("welcome message timeout".to_string()))??;

        let cancel = shutdown.child_token();
        let (outbound_tx, outbound_rx) = mpsc::channel(self.option.write_message_buffer.max(1));
        *self.outbound.lock().await = Some(outbound_tx.clone());

        let reader = tokio::spawn(
            self.clone()
                .run_connection(write, read, outbound_rx, cancel.clone()),
        );

        let ping_interval = Duration::from_millis(server.ping_interval);
        let ping_timeout = if server.ping_timeout == 0 {
            self.option.write_timeout
        } else {
            Duration::from_millis(server.ping_timeout)
        };
        tokio::spawn(
            self.clone()
                .keep_alive(outbound_tx, cancel.clone(), ping_interval, ping_timeout),
        );

        Ok(Connection { cancel, reader })
    }

    async fn run_connection(
        self: Arc<Self>,
        mut write: WsWrite,
        mut read: WsRead,
        mut outbound_rx: mpsc::Receiver<Message>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = tokio::time::timeout(
                        self.option.write_timeout,
                        write.send(Message::Close(None)),
                    )
                    .await;
                    break;
                }
                outbound = outbound_rx.recv() => {
                    match outbound {
                        Some(message) => {
                            if let Err(err) = write.send(message).await {
                                warn!(error = %err, "websocket write failed");
                                break;
                            }
                        }
                        None => {
                            let _ = write.send(Message::Close(None)).await;
                            break;
                        }
                    }
                }
                incoming = read.next() => {
                    match incoming {
                        Some(Ok(Message::Text(text))) => self.handle_text(text.as_str()).await,
                        Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                            Ok(text) => self.handle_text(text).await,
                            Err(err) => warn!(error = %err, "binary frame is not utf-8"),
                        },
                        Some(Ok(Message::Close(frame))) => {
                            info!(?frame, "websocket closed by server");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(err)) => {
                            warn!(error = %err, "websocket read failed");
                            break;
                        }
                        None => break,
                    }
                }
            }
        }

        cancel.cancel();
    }

    async fn handle_text(&self, text: &str) {
        let message: WsMessage = match serde_json::from_str(text) {
            Ok(message) => message,
            Err(err) => {
                self.log_parse_fail(&err, text);
                return;
            }
        };

        match message.msg_type() {
            TYPE_PONG | TYPE_ACK => self.complete(message.id.as_deref(), Ok(())).await,
            TYPE_ERROR => {
                let reason = message.error_text();
                warn!(id = ?message.id, reason = %reason, "websocket error frame");
                self.option.notify(WebSocketEvent::ErrorReceived, &reason);
                self.complete(message.id.as_deref(), Err(KucoinError::WebSocket(reason)))
                    .await;
            }
            TYPE_MESSAGE => self.forward(message).await,
            TYPE_WELCOME | TYPE_NOTICE | TYPE_COMMAND => {
                debug!(msg_type = message.msg_type(), topic = message.topic(), "control frame");
            }
            other => warn!(msg_type = other, "unknown websocket message type"),
        }
    }

    async fn forward(&self, message: WsMessage) {
        let events = self.events.lock().await.clone();
        let Some(events) = events else {
            return;
        };

        match events.try_send(TransportEvent::Message(message)) {
            Ok(()) => {}
            Err(TrySendError::Full(TransportEvent::Message(message))) => {
                let count = self.dropped_messages.fetch_add(1, Ordering::Relaxed);
                if count < DROP_LOG_LIMIT {
                    warn!(
                        sample_index = count + 1,
                        sample_limit = DROP_LOG_LIMIT,
                        topic = message.topic(),
                        "read buffer full, message dropped"
                    );
                }
            }
            Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Closed(_)) => debug!("message receiver closed"),
        }
    }

    async fn complete(&self, id: Option<&str>, result: Result<()>) {
        let Some(id) = id else {
            return;
        };
        if let Some(waiter) = self.pending.lock().await.remove(id) {
            let _ = waiter.send(result);
        }
    }

    async fn send_and_wait(
        &self,
        sender: &mpsc::Sender<Message>,
        message: WsMessage,
        timeout: Duration,
    ) -> Result<()> {
        let id = message
            .id
            .clone()
            .ok_or_else(|| KucoinError::WebSocket("message id is required".to_string()))?;
        let text = serde_json::to_string(&message)?;

        let (ack_tx, ack_rx) = oneshot::channel();
        self.pending.lock().await.insert(id.clone(), ack_tx);

        let exchange = async {
            sender
                .send(Message::Text(text.into()))
                .await
                .map_err(|_| KucoinError::ConnectionClosed)?;
            match ack_rx.await {
                Ok(result) => result,
                Err(_) => Err(KucoinError::ConnectionClosed),
            }
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                self.pending.lock().await.remove(&id);
                Err(err)
            }
            Err(_) => {
                self.pending.lock().await.remove(&id);
                Err(KucoinError::AckTimeout { id })
            }
        }
    }

    async fn keep_alive(
        self: Arc<Self>,
        sender: mpsc::Sender<Message>,
        cancel: CancellationToken,
        interval: Duration,
        timeout: Duration,
    ) {
        if interval.is_zero() {
            return;
        }

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let ping = WsMessage::ping(now_nanos().to_string());
                    if let Err(err) = self.send_and_wait(&sender, ping, timeout).await {
                        if cancel.is_cancelled() {
                            break;
                        }
                        warn!(error = %err, "heartbeat failed, dropping connection");
                        self.option
                            .notify(WebSocketEvent::ErrorReceived, &format!("ping failed: {err}"));
                        cancel.cancel();
                        break;
                    }
                }
            }
        }
    }

    async fn supervise(self: Arc<Self>, mut connection: Connection, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    connection.cancel.cancel();
                    let _ = connection.reader.await;
                    return;
                }
                _ = &mut connection.reader => {}
            }

            if shutdown.is_cancelled() || self.shutting_down.load(Ordering::SeqCst) {
                return;
            }

            self.safe_close().await;

            if !self.option.reconnect {
                warn!("websocket closed and reconnect is disabled");
                return;
            }

            match self.reconnect(&shutdown).await {
                Some(next) => connection = next,
                None => return,
            }
        }
    }

    async fn reconnect(self: &Arc<Self>, shutdown: &CancellationToken) -> Option<Connection> {
        let mut attempts = 0u32;
        loop {
            if shutdown.is_cancelled() {
                return None;
            }
            if !self.option.attempts_left(attempts) {
                error!(attempts, "websocket reconnect attempts exhausted");
                self.option.notify(
                    WebSocketEvent::ClientFail,
                    &format!("reconnect failed after {attempts} attempts"),
                );
                return None;
            }

            attempts += 1;
            self.option
                .notify(WebSocketEvent::TryReconnect, &format!("attempt {attempts}"));
            info!(attempt = attempts, "reconnecting websocket");

            let dialed = tokio::select! {
                _ = shutdown.cancelled() => return None,
                dialed = self.dial(shutdown) => dialed,
            };

            match dialed {
                Ok(connection) => {
                    self.connected.store(true, Ordering::SeqCst);
                    self.option.notify(WebSocketEvent::Connected, "");
                    info!(attempt = attempts, "websocket reconnected");

                    let events = self.events.lock().await.clone();
                    if let Some(events) = events
                        && events.send(TransportEvent::Reconnected).await.is_err()
                    {
                        debug!("reconnect receiver closed");
                    }
                    return Some(connection);
                }
                Err(err) => {
                    warn!(attempt = attempts, error = %err, "websocket reconnect failed");
                    tokio::select! {
                        _ = shutdown.cancelled() => return None,
                        _ = tokio::time::sleep(self.option.reconnect_interval) => {}
                    }
                }
            }
        }
    }

    async fn safe_close(&self) {
        self.connected.store(false, Ordering::SeqCst);
        *self.outbound.lock().await = None;
        self.fail_pending().await;
        self.option.notify(WebSocketEvent::Disconnected, "");
        warn!("websocket disconnected");
    }

    async fn fail_pending(&self) {
        let waiters: Vec<AckSender> = self
            .pending
            .lock()
            .await
            .drain()
            .map(|(_, waiter)| waiter)
            .collect();
        for waiter in waiters {
            let _ = waiter.send(Err(KucoinError::ConnectionClosed));
        }
    }

    fn log_parse_fail(&self, err: &serde_json::Error, raw: &str) {
        let count = self.parse_failures.fetch_add(1, Ordering::Relaxed);
        if count < PARSE_FAIL_LOG_LIMIT {
            warn!(
                sample_index = count + 1,
                sample_limit = PARSE_FAIL_LOG_LIMIT,
                error = %err,
                bytes = raw.len(),
                "ws message parse failed"
            );
            debug!(message = %truncate_for_log(raw, RAW_LOG_MAX_BYTES), "ws message parse failed");
        }
    }
}

async fn wait_welcome(read: &mut WsRead) -> Result<()> {
    while let Some(frame) = read.next().await {
        match frame.map_err(|err| KucoinError::WebSocket(err.to_string()))? {
            Message::Text(text) => {
                let message: WsMessage = serde_json::from_str(text.as_str())?;
                if message.msg_type() == TYPE_WELCOME {
                    return Ok(());
                }
                debug!(msg_type = message.msg_type(), "frame before welcome ignored");
            }
            Message::Close(frame) => {
                return Err(KucoinError::WebSocket(format!(
                    "closed before welcome: {frame:?}"
                )));
            }
            _ => {}
        }
    }
    Err(KucoinError::ConnectionClosed)
}

pub(crate) fn now_nanos() -> i64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
}

fn truncate_for_log(value: &str, max_len: usize) -> String {
    if value.len() <= max_len {
        return value.to_string();
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &value[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("abcdef", 3), "abc...");
        assert_eq!(truncate_for_log("ééé", 3), "é...");
    }

    #[tokio::test]
    async fn test_write_requires_connection() {
        #[derive(Debug)]
        struct NoTokens;

        #[async_trait::async_trait]
        impl WsTokenProvider for NoTokens {
            async fn get_token(&self) -> Result<Vec<crate::ws::token::WsToken>> {
                Ok(Vec::new())
            }
        }

        let transport = WebSocketTransport::new(Arc::new(NoTokens), WebSocketClientOption::default());
        let err = transport
            .write(WsMessage::ping("1"), Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, KucoinError::NotConnected));

        let (events, _rx) = mpsc::channel(1);
        let err = transport.start(events).await.unwrap_err();
        assert!(matches!(err, KucoinError::WebSocket(_)));
        assert!(!transport.is_connected());
    }
}
