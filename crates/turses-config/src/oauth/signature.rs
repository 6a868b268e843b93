//! OAuth 1.0a request signing (HMAC-SHA1)

use crate::error::{ConfigError, Result};
use crate::token::Credential;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::{distributions::Alphanumeric, Rng};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters stay as they are, everything else is escaped
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";
const NONCE_LEN: usize = 32;

/// Credentials identifying the client application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumer {
    pub key: String,
    pub secret: String,
}

impl Consumer {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// The consumer compiled into this build
    ///
    /// Set `TURSES_CONSUMER_KEY` / `TURSES_CONSUMER_SECRET` at build time.
    pub fn builtin() -> Self {
        Self::new(
            option_env!("TURSES_CONSUMER_KEY").unwrap_or_default(),
            option_env!("TURSES_CONSUMER_SECRET").unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Everything needed to sign one request
#[derive(Debug, Clone)]
pub struct SigningInput<'a> {
    pub method: HttpMethod,
    /// Base URL without query string
    pub url: &'a str,
    pub consumer: &'a Consumer,
    pub token: Option<&'a Credential>,
    /// Extra `oauth_*` protocol parameters (callback, verifier)
    pub oauth_params: &'a [(&'a str, &'a str)],
    /// Query or form parameters of the request itself
    pub request_params: &'a [(&'a str, &'a str)],
    pub nonce: &'a str,
    pub timestamp: i64,
}

pub fn percent_encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE_SET).to_string()
}

pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

pub fn timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

impl SigningInput<'_> {
    /// All `oauth_*` parameters except the signature itself
    fn protocol_params(&self) -> Vec<(String, String)> {
        let timestamp = self.timestamp.to_string();
        let mut params = vec![
            ("oauth_consumer_key", self.consumer.key.as_str()),
            ("oauth_nonce", self.nonce),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_version", OAUTH_VERSION),
        ];
        if let Some(token) = self.token {
            params.push(("oauth_token", token.oauth_token.as_str()));
        }
        params.extend_from_slice(self.oauth_params);
        params
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// `METHOD&url&params`, each part percent-encoded
    pub fn base_string(&self) -> String {
        let mut encoded: Vec<(String, String)> = self
            .protocol_params()
            .into_iter()
            .chain(
                self.request_params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string())),
            )
            .map(|(k, v)| (percent_encode(&k), percent_encode(&v)))
            .collect();
        encoded.sort();

        let normalized = encoded
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{}&{}&{}",
            self.method.as_str(),
            percent_encode(self.url),
            percent_encode(&normalized)
        )
    }

    /// Base64 HMAC-SHA1 of the base string
    pub fn signature(&self) -> Result<String> {
        let key = format!(
            "{}&{}",
            percent_encode(&self.consumer.secret),
            percent_encode(self.token.map_or("", |t| t.oauth_token_secret.as_str()))
        );
        let mut mac =
            HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| ConfigError::InvalidSigningKey)?;
        mac.update(self.base_string().as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Value for the `Authorization` header
    pub fn authorization_header(&self) -> Result<String> {
        let mut params = self.protocol_params();
        params.push(("oauth_signature".to_string(), self.signature()?));
        params.sort();

        let fields = params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {}", fields))
    }
}
