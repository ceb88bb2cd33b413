/*
[INPUT]:  API key, secret, passphrase, optional broker credentials
[OUTPUT]: Signed KC-API-* request headers
[POS]:    HTTP layer - request signing for authenticated endpoints
[UPDATE]: When changing signing algorithm or header format
*/

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

use crate::http::{KucoinError, Result};

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_API_KEY: &str = "KC-API-KEY";
pub const HEADER_API_PASSPHRASE: &str = "KC-API-PASSPHRASE";
pub const HEADER_API_TIMESTAMP: &str = "KC-API-TIMESTAMP";
pub const HEADER_API_SIGN: &str = "KC-API-SIGN";
pub const HEADER_API_KEY_VERSION: &str = "KC-API-KEY-VERSION";
pub const HEADER_API_PARTNER: &str = "KC-API-PARTNER";
pub const HEADER_BROKER_NAME: &str = "KC-BROKER-NAME";
pub const HEADER_PARTNER_VERIFY: &str = "KC-API-PARTNER-VERIFY";
pub const HEADER_PARTNER_SIGN: &str = "KC-API-PARTNER-SIGN";

const API_KEY_VERSION: &str = "3";

/// Signs REST payloads with HMAC-SHA256 (base64 output)
#[derive(Clone)]
pub struct KcSigner {
    api_key: String,
    api_secret: String,
    api_passphrase: String,
    broker_name: String,
    broker_partner: String,
    broker_key: String,
}

impl std::fmt::Debug for KcSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KcSigner")
            .field("api_key", &self.api_key)
            .field("broker_name", &self.broker_name)
            .field("broker_partner", &self.broker_partner)
            .finish_non_exhaustive()
    }
}

impl KcSigner {
    /// Create a signer for regular accounts
    pub fn new(api_key: &str, api_secret: &str, api_passphrase: &str) -> Result<Self> {
        Self::with_broker(api_key, api_secret, api_passphrase, "", "", "")
    }

    /// Create a signer carrying broker credentials
    pub fn with_broker(
        api_key: &str,
        api_secret: &str,
        api_passphrase: &str,
        broker_name: &str,
        broker_partner: &str,
        broker_key: &str,
    ) -> Result<Self> {
        let api_key = api_key.trim().to_string();
        let api_secret = api_secret.trim().to_string();
        let raw_passphrase = api_passphrase.trim();

        let api_passphrase = if !raw_passphrase.is_empty() && !api_secret.is_empty() {
            sign(raw_passphrase.as_bytes(), api_secret.as_bytes())?
        } else {
            raw_passphrase.to_string()
        };

        if api_key.is_empty() || api_secret.is_empty() || api_passphrase.is_empty() {
            warn!("api credentials incomplete, only public endpoints are available");
        }

        Ok(Self {
            api_key,
            api_secret,
            api_passphrase,
            broker_name: broker_name.trim().to_string(),
            broker_partner: broker_partner.trim().to_string(),
            broker_key: broker_key.trim().to_string(),
        })
    }

    /// True when key, secret and passphrase are all present
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty() && !self.api_passphrase.is_empty()
    }

    /// Signature headers for `payload` (METHOD + path[?query] + body)
    pub fn headers(&self, payload: &str) -> Result<Vec<(&'static str, String)>> {
        self.headers_at(payload, now_millis())
    }

    pub fn headers_at(&self, payload: &str, timestamp: i64) -> Result<Vec<(&'static str, String)>> {
        let timestamp = timestamp.to_string();
        let signature = sign(
            format!("{timestamp}{payload}").as_bytes(),
            self.api_secret.as_bytes(),
        )?;

        Ok(vec![
            (HEADER_API_KEY, self.api_key.clone()),
            (HEADER_API_PASSPHRASE, self.api_passphrase.clone()),
            (HEADER_API_TIMESTAMP, timestamp),
            (HEADER_API_SIGN, signature),
            (HEADER_API_KEY_VERSION, API_KEY_VERSION.to_string()),
        ])
    }

    /// Signature headers plus the partner verification headers
    pub fn broker_headers(&self, payload: &str) -> Result<Vec<(&'static str, String)>> {
        self.broker_headers_at(payload, now_millis())
    }

    pub fn broker_headers_at(
        &self,
        payload: &str,
        timestamp: i64,
    ) -> Result<Vec<(&'static str, String)>> {
        if self.broker_partner.is_empty() || self.broker_name.is_empty() {
            return Err(KucoinError::Config(
                "broker information cannot be empty".to_string(),
            ));
        }

        let mut headers = self.headers_at(payload, timestamp)?;
        let partner_sign = sign(
            format!("{timestamp}{}{}", self.broker_partner, self.api_key).as_bytes(),
            self.broker_key.as_bytes(),
        )?;

        headers.push((HEADER_API_PARTNER, self.broker_partner.clone()));
        headers.push((HEADER_PARTNER_VERIFY, "true".to_string()));
        headers.push((HEADER_PARTNER_SIGN, partner_sign));
        headers.push((HEADER_BROKER_NAME, self.broker_name.clone()));
        Ok(headers)
    }
}

/// base64(HMAC-SHA256(key, plain))
pub fn sign(plain: &[u8], key: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| KucoinError::Authentication {
        message: format!("invalid secret key: {e}"),
    })?;
    mac.update(plain);
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header<'a>(headers: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn test_sign_known_vector() {
        // HMAC-SHA256("key", "The quick brown fox jumps over the lazy dog")
        let signature = sign(b"The quick brown fox jumps over the lazy dog", b"key").unwrap();
        assert_eq!(signature, "97yD9DBThCSxMpjmqm+xQ+9NWaFJRhdZl0edvC0aPNg=");
    }

    #[test]
    fn test_passphrase_is_signed_with_secret() {
        let signer = KcSigner::new(" key ", "secret", "pass").unwrap();
        let headers = signer.headers_at("GET/api/v1/timestamp", 1_700_000_000_000).unwrap();

        assert_eq!(header(&headers, HEADER_API_KEY), Some("key"));
        assert_eq!(
            header(&headers, HEADER_API_PASSPHRASE),
            Some(sign(b"pass", b"secret").unwrap().as_str())
        );
        assert_eq!(header(&headers, HEADER_API_TIMESTAMP), Some("1700000000000"));
        assert_eq!(header(&headers, HEADER_API_KEY_VERSION), Some("3"));
        assert_eq!(
            header(&headers, HEADER_API_SIGN),
            Some(
                sign(b"1700000000000GET/api/v1/timestamp", b"secret")
                    .unwrap()
                    .as_str()
            )
        );
        assert!(signer.has_credentials());
    }

    #[test]
    fn test_empty_credentials() {
        let signer = KcSigner::new("", "", "").unwrap();
        assert!(!signer.has_credentials());
    }

    #[test]
    fn test_broker_headers_require_partner() {
        let signer = KcSigner::new("key", "secret", "pass").unwrap();
        let err = signer.broker_headers_at("GET/api", 1).unwrap_err();
        assert!(matches!(err, KucoinError::Config(_)));
    }

    #[test]
    fn test_broker_headers() {
        let signer =
            KcSigner::with_broker("key", "secret", "pass", "broker", "partner", "bkey").unwrap();
        let headers = signer.broker_headers_at("GET/api", 42).unwrap();

        assert_eq!(header(&headers, HEADER_API_PARTNER), Some("partner"));
        assert_eq!(header(&headers, HEADER_BROKER_NAME), Some("broker"));
        assert_eq!(header(&headers, HEADER_PARTNER_VERIFY), Some("true"));
        assert_eq!(
            header(&headers, HEADER_PARTNER_SIGN),
            Some(sign(b"42partnerkey", b"bkey").unwrap().as_str())
        );
    }
}
