// # Remote Fetch Client
//
// Builds the four kinds of remote call a run makes and reduces each response
// to the little the engine needs:
//
// - variable URL fetch: GET, no headers, first token of the body
// - zone lookup: GET `/zones?name=<zone>`
// - record lookup: GET `/zones/<zone id>/dns_records?type=<type>&name=<fqdn>`
// - record update: PUT `/zones/<zone id>/dns_records/<record id>`
//
// Provider calls carry `X-Auth-Email`, `X-Auth-Key` and
// `Content-Type: application/json`, taken from the session at call time.
//
// Failures never surface as errors. A transport error is logged and treated
// as an empty body, and an empty body simply yields empty results, which the
// line handlers already treat as failure.

pub mod markers;

use serde::Serialize;
use tracing::{debug, warn};

use crate::bounded::BoundedString;
use crate::context::Session;
use crate::traits::transport::{HEADER_AUTH_EMAIL, HEADER_AUTH_KEY};
use crate::traits::{HttpRequest, HttpTransport};
use crate::Result;

/// Result of a record lookup
///
/// Both fields are empty when the lookup failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordLookup {
    pub id: BoundedString,
    pub content: BoundedString,
}

/// Body of a record update
#[derive(Debug, Serialize)]
struct UpdateBody<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    content: &'a str,
}

/// Client for variable URLs and the provider API
pub struct FetchClient {
    transport: Box<dyn HttpTransport>,
    api_base: String,
}

impl FetchClient {
    pub fn new(transport: Box<dyn HttpTransport>, api_base: impl Into<String>) -> Self {
        Self {
            transport,
            api_base: api_base.into(),
        }
    }

    /// GET `url` and return the first whitespace-delimited token of the body
    pub async fn fetch_first_token(&self, url: &str) -> BoundedString {
        let body = self.fetch(HttpRequest::get(url)).await;
        BoundedString::from(markers::first_token(&body))
    }

    /// Resolve the session's zone name to a zone id
    pub async fn lookup_zone(&self, session: &Session) -> BoundedString {
        let url = self.zone_lookup_url(session.zone_name.as_str());
        let body = self
            .fetch(self.authenticated(session, HttpRequest::get(url)))
            .await;

        match markers::extract_after(&body, markers::ZONE_ID) {
            Some(id) => BoundedString::from(id),
            None => {
                debug!("Zone lookup for {} found no id", session.zone_name);
                BoundedString::new()
            }
        }
    }

    /// Look up the session's current record
    pub async fn lookup_record(&self, session: &Session) -> RecordLookup {
        let url = self.record_lookup_url(
            session.zone_id.as_str(),
            session.record_type.as_str(),
            &session.fqdn(),
        );
        let body = self
            .fetch(self.authenticated(session, HttpRequest::get(url)))
            .await;

        let Some(id) = markers::extract_after(&body, markers::RECORD_ID) else {
            debug!(
                "Record lookup for {} {} found no id",
                session.record_type,
                session.fqdn()
            );
            return RecordLookup::default();
        };

        RecordLookup {
            id: BoundedString::from(id),
            content: markers::extract_after(&body, markers::RECORD_CONTENT)
                .map(BoundedString::from)
                .unwrap_or_default(),
        }
    }

    /// Set the session's current record to `content`
    ///
    /// Returns `true` if the provider reported success.
    pub async fn update_record(&self, session: &Session, content: &str) -> bool {
        let body = match update_body(session, content) {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to build update body: {}", e);
                return false;
            }
        };

        let url = self.record_update_url(session.zone_id.as_str(), session.record_id.as_str());
        let response = self
            .fetch(self.authenticated(session, HttpRequest::put(url, body)))
            .await;

        markers::is_update_success(&response)
    }

    pub fn zone_lookup_url(&self, zone_name: &str) -> String {
        format!("{}/zones?name={}", self.api_base, zone_name)
    }

    pub fn record_lookup_url(&self, zone_id: &str, record_type: &str, fqdn: &str) -> String {
        format!(
            "{}/zones/{}/dns_records?type={}&name={}",
            self.api_base, zone_id, record_type, fqdn
        )
    }

    pub fn record_update_url(&self, zone_id: &str, record_id: &str) -> String {
        format!("{}/zones/{}/dns_records/{}", self.api_base, zone_id, record_id)
    }

    fn authenticated(&self, session: &Session, request: HttpRequest) -> HttpRequest {
        request
            .with_header(HEADER_AUTH_EMAIL, session.auth_email.as_str())
            .with_header(HEADER_AUTH_KEY, session.auth_api_key.as_str())
            .with_header("Content-Type", "application/json")
    }

    /// Send a request, degrading any failure to an empty body
    async fn fetch(&self, request: HttpRequest) -> String {
        let method = request.method;
        debug!("{} {}", method, redact_url(&request.url, &self.api_base));

        match self.transport.send(request).await {
            Ok(response) => {
                if !response.is_success() {
                    debug!("{} returned status {}", method, response.status);
                }
                response.body
            }
            Err(e) => {
                warn!(
                    "{} request via {} failed: {}",
                    method,
                    self.transport.transport_name(),
                    e
                );
                String::new()
            }
        }
    }
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("transport", &self.transport.transport_name())
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// JSON body of a record update: `{"type":..,"name":..,"content":..}`
fn update_body(session: &Session, content: &str) -> Result<String> {
    let body = UpdateBody {
        record_type: session.record_type.as_str(),
        name: session.record_name.as_str(),
        content,
    };
    Ok(serde_json::to_string(&body)?)
}

/// Provider URLs embed zone and record ids; only the path shape is logged
fn redact_url(url: &str, api_base: &str) -> String {
    match url.strip_prefix(api_base) {
        Some(path) => {
            let path = path.split('?').next().unwrap_or_default();
            let shape: Vec<&str> = path
                .split('/')
                .enumerate()
                .map(|(i, seg)| if i == 0 || i % 2 == 1 { seg } else { "*" })
                .collect();
            format!("{}{}", api_base, shape.join("/"))
        }
        None => url.to_string(),
    }
}
