/*
[INPUT]:  Error sources (HTTP, API result codes, serialization, signing, WebSocket)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

use crate::http::response::RestRateLimit;

/// Main error type for the KuCoin SDK
#[derive(Error, Debug)]
pub enum KucoinError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// API returned a result code other than 200000
    #[error("Server returned an error, code: {code}, msg: {message}")]
    Api {
        code: String,
        message: String,
        rate_limit: RestRateLimit,
    },

    /// Request signing failed
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Request object is missing data required before any I/O
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Write attempted while the socket is down
    #[error("WebSocket not connected")]
    NotConnected,

    /// No ack/pong arrived for a written message
    #[error("ack timeout for message {id}")]
    AckTimeout { id: String },

    /// Connection dropped while a message was awaiting its ack
    #[error("connection closed")]
    ConnectionClosed,

    /// Subscription id already registered
    #[error("already subscribed: {0}")]
    AlreadySubscribed(String),

    /// Subscription id could not be parsed
    #[error("invalid subscription id: {0}")]
    InvalidSubscriptionId(String),
}

impl KucoinError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            KucoinError::Http(err) => err.is_connect() || err.is_timeout(),
            KucoinError::HttpStatus { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS.as_u16() || *status >= 500
            }
            KucoinError::WebSocket(_)
            | KucoinError::NotConnected
            | KucoinError::AckTimeout { .. }
            | KucoinError::ConnectionClosed => true,
            _ => false,
        }
    }

    /// Check if the server rejected the call with a result code
    pub fn is_api_error(&self) -> bool {
        matches!(self, KucoinError::Api { .. })
    }

    /// Result code of an API error
    pub fn api_code(&self) -> Option<&str> {
        match self {
            KucoinError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Create an HTTP status error from a status code and body
    pub fn http_status(status: StatusCode, body: impl Into<String>) -> Self {
        KucoinError::HttpStatus {
            status: status.as_u16(),
            body: body.into(),
        }
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, KucoinError>;
