/*
[INPUT]:  Raw WebSocket text frames
[OUTPUT]: WsMessage envelope and WebSocketEvent lifecycle events
[POS]:    WebSocket layer - message framing
[UPDATE]: When adding message types or lifecycle events
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TYPE_WELCOME: &str = "welcome";
pub const TYPE_PING: &str = "ping";
pub const TYPE_PONG: &str = "pong";
pub const TYPE_SUBSCRIBE: &str = "subscribe";
pub const TYPE_ACK: &str = "ack";
pub const TYPE_UNSUBSCRIBE: &str = "unsubscribe";
pub const TYPE_ERROR: &str = "error";
pub const TYPE_MESSAGE: &str = "message";
pub const TYPE_NOTICE: &str = "notice";
pub const TYPE_COMMAND: &str = "command";

/// Envelope shared by every frame in both directions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub msg_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sn: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_channel: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl WsMessage {
    pub fn ping(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            msg_type: Some(TYPE_PING.to_string()),
            ..Default::default()
        }
    }

    /// Subscribe/unsubscribe request that asks for an ack
    pub fn topic_request(
        msg_type: &str,
        id: impl Into<String>,
        topic: impl Into<String>,
        private_channel: bool,
    ) -> Self {
        Self {
            id: Some(id.into()),
            msg_type: Some(msg_type.to_string()),
            topic: Some(topic.into()),
            private_channel: Some(private_channel),
            response: Some(true),
            ..Default::default()
        }
    }

    pub fn msg_type(&self) -> &str {
        self.msg_type.as_deref().unwrap_or_default()
    }

    pub fn topic(&self) -> &str {
        self.topic.as_deref().unwrap_or_default()
    }

    pub fn subject(&self) -> &str {
        self.subject.as_deref().unwrap_or_default()
    }

    /// Human readable error payload of an `error` frame
    pub fn error_text(&self) -> String {
        match &self.data {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => "unknown error".to_string(),
        }
    }
}

/// Lifecycle notifications delivered to the configured event callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebSocketEvent {
    Connected,
    Disconnected,
    TryReconnect,
    ErrorReceived,
    CallbackError,
    ReSubscribeOk,
    ReSubscribeError,
    ClientFail,
    ClientShutdown,
}

impl WebSocketEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebSocketEvent::Connected => "connected",
            WebSocketEvent::Disconnected => "disconnected",
            WebSocketEvent::TryReconnect => "try_reconnect",
            WebSocketEvent::ErrorReceived => "error_received",
            WebSocketEvent::CallbackError => "callback_error",
            WebSocketEvent::ReSubscribeOk => "resubscribe_ok",
            WebSocketEvent::ReSubscribeError => "resubscribe_error",
            WebSocketEvent::ClientFail => "client_fail",
            WebSocketEvent::ClientShutdown => "client_shutdown",
        }
    }
}

impl std::fmt::Display for WebSocketEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
