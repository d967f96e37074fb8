//! Test doubles and common utilities for engine contract tests
//!
//! `MockTransport` answers requests from a script keyed by method and URL and
//! records every request it sees. Unscripted requests fail like an
//! unreachable host.

#![allow(dead_code)]

use async_trait::async_trait;
use cfddns_core::error::Result;
use cfddns_core::{
    Engine, EngineConfig, Error, HttpRequest, HttpResponse, HttpTransport, Method, RunReport,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const API: &str = "https://api.test/client/v4";
pub const IP_URL: &str = "https://ip.test/v4";

pub const UPDATE_OK: &str = r#"{"result":{},"success":true,"errors":[],"messages":[]}"#;
pub const UPDATE_FAILED: &str = r#"{"result":null,"success":false,"errors":[{"code":81044,"message":"Record does not exist."}]}"#;

#[derive(Debug, Default)]
struct Script {
    replies: HashMap<(Method, String), VecDeque<Option<String>>>,
    calls: Vec<HttpRequest>,
}

/// A scripted HttpTransport that tracks calls
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<Script>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MockTransport that shares script and call log with another
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            script: Arc::clone(&other.script),
        }
    }

    /// Queue a reply; the last queued reply for a route repeats
    pub fn reply(&self, method: Method, url: impl Into<String>, body: impl Into<String>) -> &Self {
        self.queue(method, url.into(), Some(body.into()))
    }

    /// Queue a transport failure
    pub fn fail(&self, method: Method, url: impl Into<String>) -> &Self {
        self.queue(method, url.into(), None)
    }

    pub fn on_get(&self, url: impl Into<String>, body: impl Into<String>) -> &Self {
        self.reply(Method::Get, url, body)
    }

    pub fn on_put(&self, url: impl Into<String>, body: impl Into<String>) -> &Self {
        self.reply(Method::Put, url, body)
    }

    fn queue(&self, method: Method, url: String, reply: Option<String>) -> &Self {
        self.script
            .lock()
            .unwrap()
            .replies
            .entry((method, url))
            .or_default()
            .push_back(reply);
        self
    }

    /// Every request seen so far
    pub fn calls(&self) -> Vec<HttpRequest> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.script.lock().unwrap().calls.len()
    }

    pub fn count(&self, method: Method) -> usize {
        self.calls().iter().filter(|c| c.method == method).count()
    }

    /// PUT requests seen so far
    pub fn puts(&self) -> Vec<HttpRequest> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == Method::Put)
            .collect()
    }

    /// Record lookups seen so far
    pub fn record_lookups(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.method == Method::Get && c.url.contains("/dns_records?"))
            .count()
    }

    /// Zone lookups seen so far
    pub fn zone_lookups(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.method == Method::Get && c.url.contains("/zones?name="))
            .count()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(request.clone());

        let key = (request.method, request.url.clone());
        let reply = match script.replies.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().flatten(),
            Some(queue) => queue.front().cloned().flatten(),
            None => None,
        };

        match reply {
            Some(body) => Ok(HttpResponse::new(200, body)),
            None => Err(Error::transport("mock", format!("no route for {}", request.url))),
        }
    }

    fn transport_name(&self) -> &'static str {
        "mock"
    }
}

/// Output of a run as text, for scenarios that only write UTF-8
pub trait OutputText {
    fn text(&self) -> &str;
}

impl OutputText for RunReport {
    fn text(&self) -> &str {
        std::str::from_utf8(&self.output).expect("run output is UTF-8")
    }
}

/// Engine over a transport sharing state with `mock`
pub fn engine(mock: &MockTransport) -> Engine {
    engine_with(mock, EngineConfig::new().with_api_base(API))
}

pub fn engine_with(mock: &MockTransport, config: EngineConfig) -> Engine {
    Engine::new(Box::new(MockTransport::sharing_counters_with(mock)), config)
        .expect("engine construction succeeds")
}

pub fn zone_lookup_url(zone: &str) -> String {
    format!("{}/zones?name={}", API, zone)
}

pub fn record_lookup_url(zone_id: &str, record_type: &str, fqdn: &str) -> String {
    format!(
        "{}/zones/{}/dns_records?type={}&name={}",
        API, zone_id, record_type, fqdn
    )
}

pub fn record_update_url(zone_id: &str, record_id: &str) -> String {
    format!("{}/zones/{}/dns_records/{}", API, zone_id, record_id)
}

pub fn zone_body(zone_id: &str) -> String {
    format!(
        r#"{{"result":[{{"id":"{}","name":"example.com","status":"active"}}],"success":true}}"#,
        zone_id
    )
}

pub fn record_body(record_id: &str, content: &str) -> String {
    format!(
        r#"{{"result":[{{"id":"{}","type":"A","name":"www.example.com","content":"{}","ttl":1}}],"success":true}}"#,
        record_id, content
    )
}

/// Header block used by most scenarios: variable, credentials, zone
pub fn preamble(last_value: Option<&str>) -> String {
    let var = match last_value {
        Some(last) => format!("ip? {} {}\n", IP_URL, last),
        None => format!("ip? {}\n", IP_URL),
    };
    format!("{}me@example.com: key123\nexample.com/ z1\n", var)
}
