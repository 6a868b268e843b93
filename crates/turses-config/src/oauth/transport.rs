//! HTTP transport used by the authorizer
//!
//! The authorizer only needs "send this signed request, give me status and
//! body", so that is all the trait asks for. Tests swap in a scripted
//! implementation; production uses a blocking `reqwest` client.

use super::signature::HttpMethod;
use crate::error::{ConfigError, Result};
use reqwest::header::AUTHORIZATION;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A signed request ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Full `Authorization` header value
    pub authorization: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Blocking request/response capability
pub trait HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).send(request)
    }
}

/// Transport backed by `reqwest::blocking`, with a bounded timeout
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("turses/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        log::debug!("{} {}", request.method.as_str(), request.url);

        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url).body(""),
        };
        let response = builder
            .header(AUTHORIZATION, &request.authorization)
            .send()
            .map_err(|e| ConfigError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| ConfigError::Transport(e.to_string()))?;

        log::debug!("{} {} -> {}", request.method.as_str(), request.url, status);
        Ok(HttpResponse { status, body })
    }
}
