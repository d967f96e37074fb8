//! Core traits for cfddns
//!
//! - [`HttpTransport`]: Send a single HTTP request and return status + body

pub mod transport;

pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method};
