// # cfddns-core
//
// Core library for cfddns: keeps Cloudflare DNS records in sync with values
// fetched from URLs, driven by a line-oriented configuration file that the
// run rewrites with what it resolved.
//
// ## Architecture Overview
//
// - **Scanner**: Splits directive lines into fields
// - **BoundedString**: Fixed-capacity values with truncating writes
// - **HttpTransport**: Trait for sending one HTTP request
// - **FetchClient**: Variable fetches and provider calls over a transport
// - **Session**: Credentials, zone, record scratch and variables for one run
// - **Engine**: Classifies lines, reconciles records, rewrites the file text
// - **ConfigFile**: Loads the file and replaces it atomically
//
// ## Example
//
// ```rust,ignore
// use cfddns_core::{ConfigFile, Engine, EngineConfig};
//
// let file = ConfigFile::new("/etc/cfddns.conf");
// let input = file.load().await?;
// let engine = Engine::new(Box::new(transport), EngineConfig::default())?;
// let report = engine.run(&input).await;
// file.store(&report.output).await?;
// ```

pub mod bounded;
pub mod client;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod scanner;
pub mod state;
pub mod traits;
pub mod variables;

// Re-export core types for convenience
pub use bounded::{BOUNDED_CAPACITY, BoundedString};
pub use client::FetchClient;
pub use config::EngineConfig;
pub use engine::{Annotation, Engine, LineKind, LineReport, RunReport, RunSummary};
pub use error::{Error, Result};
pub use state::ConfigFile;
pub use traits::{HttpRequest, HttpResponse, HttpTransport, Method};
