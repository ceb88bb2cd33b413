/*
[INPUT]:  ClientOption (endpoints, credentials, transport tuning), typed requests
[OUTPUT]: Signed REST calls decoded into RestResponse<T>
[POS]:    HTTP layer - core transport implementation
[UPDATE]: When adding connection options or changing request building
*/

use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::{ClientOption, Domain, RESULT_CODE_SUCCESS};
use crate::http::interceptor::{CallOutcome, RequestContext};
use crate::http::response::{RawResponse, RestRateLimit, RestResponse};
use crate::http::{KcSigner, KucoinError, Result};

pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `Kucoin-Universal-Rust-SDK/<version>`
pub fn user_agent() -> String {
    format!("Kucoin-Universal-Rust-SDK/{SDK_VERSION}")
}

/// Path, query and body derived from a request object
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl PreparedRequest {
    /// Absolute URL on `endpoint` with the query form-encoded
    pub fn url(&self, endpoint: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{endpoint}{}", self.path))?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }
}

/// Path and query exactly as they appear in the request line
pub fn request_target(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

/// METHOD + request target + body
pub fn sign_payload(method: &Method, target: &str, body: Option<&str>) -> String {
    format!("{}{}{}", method.as_str(), target, body.unwrap_or_default())
}

/// Turn a serialized request into path/query/body.
///
/// `{name}` segments in `template` are filled from the request fields and
/// removed from the remaining parameters. GET and DELETE put the remaining
/// non-null fields in the query string; other methods send them as a JSON
/// body (an empty body when the request has no fields).
pub fn prepare_request(method: &Method, template: &str, request: Value) -> Result<PreparedRequest> {
    let mut fields = match request {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(KucoinError::InvalidRequest(format!(
                "request must serialize to an object, got {other}"
            )));
        }
    };

    let path = fill_path(template, &mut fields)?;

    if *method == Method::GET || *method == Method::DELETE {
        let query = fields
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key, scalar_to_string(&value)))
            .collect();
        return Ok(PreparedRequest {
            path,
            query,
            body: None,
        });
    }

    fields.retain(|_, value| !value.is_null());
    let body = if fields.is_empty() {
        String::new()
    } else {
        serde_json::to_string(&Value::Object(fields))?
    };

    Ok(PreparedRequest {
        path,
        query: Vec::new(),
        body: Some(body),
    })
}

fn fill_path(template: &str, fields: &mut Map<String, Value>) -> Result<String> {
    let mut path = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        path.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| {
            KucoinError::InvalidRequest(format!("unterminated path variable in {template}"))
        })?;
        let name = &after[..end];
        let value = fields
            .remove(name)
            .map(|value| scalar_to_string(&value))
            .filter(|value| !value.is_empty())
            .ok_or_else(|| KucoinError::InvalidRequest(format!("path variable {name} is required")))?;
        path.push_str(&value);
        rest = &after[end + 1..];
    }

    path.push_str(rest);
    Ok(path)
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(scalar_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Shared REST transport: one pooled reqwest client for every domain
#[derive(Debug)]
pub struct Transport {
    http_client: Client,
    signer: KcSigner,
    option: ClientOption,
}

impl Transport {
    pub fn new(option: ClientOption) -> Result<Self> {
        let tuning = &option.transport_option;

        let mut builder = Client::builder()
            .user_agent(user_agent())
            .connect_timeout(tuning.connect_timeout)
            .read_timeout(tuning.read_timeout)
            .pool_idle_timeout(tuning.keep_alive_duration)
            .pool_max_idle_per_host(if tuning.keep_alive {
                tuning.max_idle_connections
            } else {
                0
            });

        if tuning.keep_alive {
            builder = builder.tcp_keepalive(tuning.keep_alive_duration);
        }
        if let Some(timeout) = tuning.call_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy) = &tuning.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        let signer = KcSigner::with_broker(
            &option.key,
            &option.secret,
            &option.passphrase,
            &option.broker_name,
            &option.broker_partner,
            &option.broker_key,
        )?;

        Ok(Self {
            http_client: builder.build()?,
            signer,
            option,
        })
    }

    pub fn option(&self) -> &ClientOption {
        &self.option
    }

    /// Execute one REST call and decode its `data` into `Resp`.
    ///
    /// `broker` switches to partner-signed headers.
    pub async fn call<Req, Resp>(
        &self,
        domain: Domain,
        broker: bool,
        method: Method,
        path: &str,
        request: &Req,
    ) -> Result<RestResponse<Resp>>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let prepared = prepare_request(&method, path, serde_json::to_value(request)?)?;

        let url = prepared.url(self.option.endpoint(domain))?;
        let payload = sign_payload(&method, &request_target(&url), prepared.body.as_deref());
        let headers = self.sign_headers(&payload, broker)?;
        let context = RequestContext {
            domain,
            method: method.clone(),
            url: url.to_string(),
        };

        for interceptor in &self.option.transport_option.interceptors {
            interceptor.before(&context);
        }

        let started = Instant::now();
        let outcome = self
            .execute(&method, url, &headers, prepared.body.as_deref())
            .await;

        let (status, error) = match &outcome {
            Ok((status, _, _)) if (200..300).contains(status) => (Some(*status), None),
            Ok((status, _, _)) => (Some(*status), Some(format!("http status {status}"))),
            Err(err) => (None, Some(err.to_string())),
        };
        self.notify_after(&context, status, started.elapsed(), error);

        let (status, response_headers, body) = outcome?;
        decode_response(status, &response_headers, &body)
    }

    fn sign_headers(&self, payload: &str, broker: bool) -> Result<Vec<(&'static str, String)>> {
        if broker {
            return self.signer.broker_headers(payload);
        }
        if !self.signer.has_credentials() {
            return Ok(Vec::new());
        }
        self.signer.headers(payload)
    }

    async fn execute(
        &self,
        method: &Method,
        url: Url,
        headers: &[(&'static str, String)],
        body: Option<&str>,
    ) -> Result<(u16, HeaderMap, String)> {
        let tuning = &self.option.transport_option;
        let mut attempt = 0u32;

        loop {
            let mut builder = self
                .http_client
                .request(method.clone(), url.clone())
                .header(CONTENT_TYPE, "application/json");
            for (name, value) in headers {
                builder = builder.header(*name, value.as_str());
            }
            if let Some(body) = body {
                builder = builder.body(body.to_string());
            }

            debug!(method = %method, url = %url, attempt, "sending request");

            match builder.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let response_headers = response.headers().clone();
                    let text = response.text().await?;
                    return Ok((status, response_headers, text));
                }
                Err(err)
                    if err.is_connect()
                        && tuning.retry_on_connection_failure
                        && attempt < tuning.max_retries =>
                {
                    attempt += 1;
                    warn!(
                        method = %method,
                        url = %url,
                        attempt,
                        error = %err,
                        "connection failed, retrying"
                    );
                    tokio::time::sleep(tuning.retry_delay).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn notify_after(
        &self,
        context: &RequestContext,
        status: Option<u16>,
        elapsed: Duration,
        error: Option<String>,
    ) {
        let interceptors = &self.option.transport_option.interceptors;
        if interceptors.is_empty() {
            return;
        }
        let outcome = CallOutcome {
            status,
            elapsed,
            error,
        };
        for interceptor in interceptors {
            interceptor.after(context, &outcome);
        }
    }
}

fn decode_response<Resp: DeserializeOwned>(
    status: u16,
    headers: &HeaderMap,
    body: &str,
) -> Result<RestResponse<Resp>> {
    if !(200..300).contains(&status) {
        return Err(KucoinError::HttpStatus {
            status,
            body: body.to_string(),
        });
    }

    let rate_limit = RestRateLimit::from_headers(headers);
    let raw: RawResponse = serde_json::from_str(body)?;

    if raw.code != RESULT_CODE_SUCCESS {
        return Err(KucoinError::Api {
            code: raw.code,
            message: raw.msg.unwrap_or_default(),
            rate_limit,
        });
    }

    let data = serde_json::from_value(raw.data.unwrap_or(Value::Null))?;
    Ok(RestResponse {
        code: raw.code,
        message: raw.msg,
        rate_limit,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prepare_get_moves_fields_to_query() {
        let prepared = prepare_request(
            &Method::GET,
            "/api/v1/hf/orders/{orderId}",
            json!({"orderId": "abc", "symbol": "BTC-USDT", "unused": null}),
        )
        .unwrap();

        assert_eq!(prepared.path, "/api/v1/hf/orders/abc");
        assert_eq!(
            prepared.query,
            vec![("symbol".to_string(), "BTC-USDT".to_string())]
        );
        assert!(prepared.body.is_none());
        let url = prepared.url("https://api.kucoin.com").unwrap();
        let target = request_target(&url);
        assert_eq!(target, "/api/v1/hf/orders/abc?symbol=BTC-USDT");
        assert_eq!(
            sign_payload(&Method::GET, &target, None),
            "GET/api/v1/hf/orders/abc?symbol=BTC-USDT"
        );
    }

    #[test]
    fn test_prepare_post_sends_body() {
        let prepared = prepare_request(
            &Method::POST,
            "/api/v1/hf/orders",
            json!({"remark": null, "size": "0.001", "symbol": "BTC-USDT"}),
        )
        .unwrap();

        assert!(prepared.query.is_empty());
        assert_eq!(
            prepared.body.as_deref(),
            Some(r#"{"size":"0.001","symbol":"BTC-USDT"}"#)
        );
        let url = prepared.url("https://api.kucoin.com").unwrap();
        assert_eq!(
            sign_payload(&Method::POST, &request_target(&url), prepared.body.as_deref()),
            r#"POST/api/v1/hf/orders{"size":"0.001","symbol":"BTC-USDT"}"#
        );
    }

    #[test]
    fn test_prepare_post_without_fields_has_empty_body() {
        let prepared = prepare_request(&Method::POST, "/api/v1/bullet-public", Value::Null).unwrap();
        assert_eq!(prepared.body.as_deref(), Some(""));
    }

    #[test]
    fn test_missing_path_variable_is_rejected() {
        let err = prepare_request(
            &Method::DELETE,
            "/api/v1/orders/{orderId}",
            json!({"symbol": "XBTUSDTM"}),
        )
        .unwrap_err();
        assert!(matches!(err, KucoinError::InvalidRequest(_)));
    }

    #[test]
    fn test_non_string_query_values() {
        let prepared = prepare_request(
            &Method::GET,
            "/api/v1/base-fee",
            json!({"currencyType": 0, "flag": true, "symbols": ["A", "B"]}),
        )
        .unwrap();
        let url = prepared.url("https://api.kucoin.com").unwrap();
        assert_eq!(
            request_target(&url),
            "/api/v1/base-fee?currencyType=0&flag=true&symbols=A%2CB"
        );
    }

    #[test]
    fn test_decode_error_code() {
        let err = decode_response::<Value>(
            200,
            &HeaderMap::new(),
            r#"{"code":"400100","msg":"bad"}"#,
        )
        .unwrap_err();
        match err {
            KucoinError::Api { code, message, .. } => {
                assert_eq!(code, "400100");
                assert_eq!(message, "bad");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_decode_http_status() {
        let err = decode_response::<Value>(503, &HeaderMap::new(), "down").unwrap_err();
        assert!(matches!(err, KucoinError::HttpStatus { status: 503, .. }));
    }

    #[test]
    fn test_user_agent() {
        assert!(user_agent().starts_with("Kucoin-Universal-Rust-SDK/"));
    }
}
