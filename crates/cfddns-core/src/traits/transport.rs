// # HTTP Transport Trait
//
// The engine never talks to the network directly. Every remote call, both
// variable URL fetches and provider API calls, goes through an
// `HttpTransport`.
//
// ## Implementations
//
// - reqwest: `cfddns-http` crate
// - Scripted mock: `tests/common`
//
// ## Contract
//
// - One request in, one response out. No retries, no caching.
// - A non-2xx status is still a response, not an error: the caller scans the
//   body for success markers and decides for itself.
// - Errors are reserved for requests that produced no response at all
//   (connection refused, TLS failure, timeout). The fetch client degrades
//   them to an empty body.

use async_trait::async_trait;
use std::fmt;

use crate::Result;

/// Header carrying the account API key
pub const HEADER_AUTH_KEY: &str = "X-Auth-Key";

/// Header carrying the account email
pub const HEADER_AUTH_EMAIL: &str = "X-Auth-Email";

/// HTTP method used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request the engine wants sent
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// Header name/value pairs, in the order they should be sent
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// A GET with no headers
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// A PUT with the given body
    pub fn put(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Put,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of the first header with this name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// Custom Debug implementation that hides the API key
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(n, v)| {
                if n.eq_ignore_ascii_case(HEADER_AUTH_KEY) {
                    (n.as_str(), "<REDACTED>")
                } else {
                    (n.as_str(), v.as_str())
                }
            })
            .collect();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body", &self.body)
            .finish()
    }
}

/// What came back
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

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP transport implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe; the engine holds one behind a
/// `Box<dyn HttpTransport>`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request and return the response
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Transport name for logging
    fn transport_name(&self) -> &'static str;
}
