/*
[INPUT]:  WebSocket tuning knobs and optional event callback
[OUTPUT]: WebSocketClientOption consumed by the WS transport/service
[POS]:    Configuration layer - WebSocket settings
[UPDATE]: When adding reconnect/buffer options or changing defaults
*/

use std::sync::Arc;
use std::time::Duration;

use crate::ws::message::WebSocketEvent;

/// Receives lifecycle events with a short detail message
pub type WebSocketEventCallback = Arc<dyn Fn(WebSocketEvent, &str) + Send + Sync>;

/// WebSocket client configuration
#[derive(Clone)]
pub struct WebSocketClientOption {
    pub reconnect: bool,
    /// `-1` retries forever
    pub reconnect_attempts: i32,
    pub reconnect_interval: Duration,
    pub dial_timeout: Duration,
    pub read_message_buffer: usize,
    pub write_message_buffer: usize,
    pub write_timeout: Duration,
    pub event_callback: Option<WebSocketEventCallback>,
    pub auto_resubscribe_max_attempts: u32,
}

impl std::fmt::Debug for WebSocketClientOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketClientOption")
            .field("reconnect", &self.reconnect)
            .field("reconnect_attempts", &self.reconnect_attempts)
            .field("reconnect_interval", &self.reconnect_interval)
            .field("dial_timeout", &self.dial_timeout)
            .field("read_message_buffer", &self.read_message_buffer)
            .field("write_message_buffer", &self.write_message_buffer)
            .field("write_timeout", &self.write_timeout)
            .field("event_callback", &self.event_callback.is_some())
            .field("auto_resubscribe_max_attempts", &self.auto_resubscribe_max_attempts)
            .finish()
    }
}

impl Default for WebSocketClientOption {
    fn default() -> Self {
        Self {
            reconnect: true,
            reconnect_attempts: -1,
            reconnect_interval: Duration::from_secs(5),
            dial_timeout: Duration::from_secs(10),
            read_message_buffer: 1024,
            write_message_buffer: 256,
            write_timeout: Duration::from_secs(5),
            event_callback: None,
            auto_resubscribe_max_attempts: 3,
        }
    }
}

impl WebSocketClientOption {
    pub fn builder() -> WebSocketClientOptionBuilder {
        WebSocketClientOptionBuilder::default()
    }

    /// True while another reconnect attempt is allowed
    pub(crate) fn attempts_left(&self, attempts: u32) -> bool {
        self.reconnect_attempts < 0 || attempts < self.reconnect_attempts as u32
    }

    pub(crate) fn notify(&self, event: WebSocketEvent, message: &str) {
        if let Some(callback) = &self.event_callback {
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                callback(event, message)
            }));
            if outcome.is_err() {
                tracing::error!(?event, "websocket event callback panicked");
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct WebSocketClientOptionBuilder {
    option: WebSocketClientOption,
}

impl WebSocketClientOptionBuilder {
    pub fn reconnect(mut self, reconnect: bool) -> Self {
        self.option.reconnect = reconnect;
        self
    }

    pub fn reconnect_attempts(mut self, attempts: i32) -> Self {
        self.option.reconnect_attempts = attempts;
        self
    }

    pub fn reconnect_interval(mut self, interval: Duration) -> Self {
        self.option.reconnect_interval = interval;
        self
    }

    pub fn dial_timeout(mut self, timeout: Duration) -> Self {
        self.option.dial_timeout = timeout;
        self
    }

    pub fn read_message_buffer(mut self, size: usize) -> Self {
        self.option.read_message_buffer = size;
        self
    }

    pub fn write_message_buffer(mut self, size: usize) -> Self {
        self.option.write_message_buffer = size;
        self
    }

    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.option.write_timeout = timeout;
        self
    }

    pub fn event_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(WebSocketEvent, &str) + Send + Sync + 'static,
    {
        self.option.event_callback = Some(Arc::new(callback));
        self
    }

    pub fn auto_resubscribe_max_attempts(mut self, attempts: u32) -> Self {
        self.option.auto_resubscribe_max_attempts = attempts;
        self
    }

    pub fn build(self) -> WebSocketClientOption {
        self.option
    }
}
