// # reqwest HTTP Transport
//
// Implements `cfddns_core::HttpTransport` on top of `reqwest`.
//
// ## Behavior
//
// - One request per `send`, no retries
// - Request timeout applies to the whole exchange (default 30 seconds)
// - Any status code is returned as a response; only requests that produced
//   no response at all are errors
// - `X-Auth-Key` is marked sensitive so it is never printed by reqwest's
//   own debug output

use async_trait::async_trait;
use cfddns_core::traits::transport::HEADER_AUTH_KEY;
use cfddns_core::{Error, HttpRequest, HttpResponse, HttpTransport, Method, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default timeout for a single request
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Timeout for a whole request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl TransportConfig {
    pub fn new() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(1..=300).contains(&self.timeout_secs) {
            return Err(Error::config(format!(
                "HTTP timeout must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            )));
        }
        if self.user_agent.is_empty() {
            return Err(Error::config("User agent cannot be empty"));
        }
        Ok(())
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("cfddns/{}", env!("CARGO_PKG_VERSION"))
}

/// HTTP transport backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the client
    /// cannot be built (e.g. no TLS backend available).
    pub fn new(config: TransportConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::http(format!("Invalid header name {}: {}", name, e)))?;
            let mut header_value = HeaderValue::from_str(value)
                .map_err(|e| Error::http(format!("Invalid value for header {}: {}", name, e)))?;

            if name.eq_ignore_ascii_case(HEADER_AUTH_KEY) {
                header_value.set_sensitive(true);
            }
            map.append(header_name, header_value);
        }
        Ok(map)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let headers = Self::header_map(&request.headers)?;

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Put => self.client.put(&request.url),
        }
        .headers(headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::transport("reqwest", format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport("reqwest", format!("Failed to read response: {}", e)))?;

        tracing::trace!("{} {} -> {} ({} bytes)", request.method, request.url, status, body.len());
        Ok(HttpResponse { status, body })
    }

    fn transport_name(&self) -> &'static str {
        "reqwest"
    }
}
