//! Engine configuration
//!
//! The configuration *file* is the directive file the engine rewrites; the
//! settings here only control how a run talks to the provider and what it
//! shows in the transcript.

use serde::{Deserialize, Serialize};

/// Default Cloudflare API v4 base URL
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Provider API base URL, without trailing slash
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Perform lookups but never send record updates
    ///
    /// An update that would have been sent counts as successful.
    #[serde(default)]
    pub dry_run: bool,

    /// Show the API key, zone ids and record ids in the transcript
    #[serde(default)]
    pub log_secrets: bool,
}

impl EngineConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            api_base: default_api_base(),
            dry_run: false,
            log_secrets: false,
        }
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enable or disable secrets in the transcript
    pub fn with_log_secrets(mut self, log_secrets: bool) -> Self {
        self.log_secrets = log_secrets;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_base.is_empty() {
            return Err(crate::Error::config("API base URL cannot be empty"));
        }

        if !self.api_base.starts_with("https://") && !self.api_base.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "API base URL must use HTTP or HTTPS scheme. Got: {}",
                self.api_base
            )));
        }

        if self.api_base.ends_with('/') {
            return Err(crate::Error::config(format!(
                "API base URL must not end with '/'. Got: {}",
                self.api_base
            )));
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}
