/*
[INPUT]:  Raw HTTP response headers and JSON envelope {code, data, msg}
[OUTPUT]: RestResponse<T> with rate limit snapshot
[POS]:    HTTP layer - common response decoding
[UPDATE]: When the envelope or rate limit headers change
*/

use reqwest::header::HeaderMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::RESULT_CODE_SUCCESS;

pub const HEADER_RATE_LIMIT_LIMIT: &str = "gw-ratelimit-limit";
pub const HEADER_RATE_LIMIT_REMAINING: &str = "gw-ratelimit-remaining";
pub const HEADER_RATE_LIMIT_RESET: &str = "gw-ratelimit-reset";

/// Gateway rate limit snapshot; `-1` marks a missing header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestRateLimit {
    pub limit: i64,
    pub remaining: i64,
    pub reset: i64,
}

impl Default for RestRateLimit {
    fn default() -> Self {
        Self {
            limit: -1,
            remaining: -1,
            reset: -1,
        }
    }
}

impl RestRateLimit {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: header_i64(headers, HEADER_RATE_LIMIT_LIMIT),
            remaining: header_i64(headers, HEADER_RATE_LIMIT_REMAINING),
            reset: header_i64(headers, HEADER_RATE_LIMIT_RESET),
        }
    }

    /// True when the gateway reported any rate limit header
    pub fn is_present(&self) -> bool {
        self.limit >= 0 || self.remaining >= 0 || self.reset >= 0
    }
}

fn header_i64(headers: &HeaderMap, name: &str) -> i64 {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(-1)
}

/// Decoded REST response: common envelope plus typed data
#[derive(Debug, Clone, PartialEq)]
pub struct RestResponse<T> {
    pub code: String,
    pub message: Option<String>,
    pub rate_limit: RestRateLimit,
    pub data: T,
}

impl<T> RestResponse<T> {
    pub fn is_success(&self) -> bool {
        self.code == RESULT_CODE_SUCCESS
    }
}

/// Envelope before `data` is decoded into a concrete type
#[derive(Debug, Deserialize)]
pub(crate) struct RawResponse {
    #[serde(deserialize_with = "code_as_string")]
    pub code: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub msg: Option<String>,
}

fn code_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(code) => Ok(code),
        Value::Number(code) => Ok(code.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "unexpected result code {other}"
        ))),
    }
}
