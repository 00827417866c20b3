//! Configuration for the range service client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::digest::{MAX_PREFIX_LEN, PREFIX_LEN};
use crate::error::{Error, Result};

/// Base URL of the public Pwned Passwords range API.
pub const DEFAULT_BASE_URL: &str = "https://api.pwnedpasswords.com";

/// Settings injected into a [`BreachChecker`](crate::BreachChecker) at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service root; requests go to `{base_url}/range/{prefix}`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Number of digest characters revealed to the service.
    #[serde(default = "default_prefix_len")]
    pub prefix_len: usize,

    /// Whole-request timeout in seconds, covering connect and body read.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Ask the service to pad responses with zero-count decoy records.
    #[serde(default)]
    pub add_padding: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_prefix_len() -> usize {
    PREFIX_LEN
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("pwned-check/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            prefix_len: default_prefix_len(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            add_padding: false,
        }
    }
}

impl ClientConfig {
    /// Create a configuration pointing at `base_url` with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    pub fn with_prefix_len(mut self, prefix_len: usize) -> Self {
        self.prefix_len = prefix_len;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_padding(mut self, add_padding: bool) -> Self {
        self.add_padding = add_padding;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the range URL for a prefix, tolerating a trailing `/` on the base.
    pub fn range_url(&self, prefix: &str) -> String {
        format!("{}/range/{}", self.base_url.trim_end_matches('/'), prefix)
    }

    /// Rejects settings that can never produce a valid query.
    pub fn validate(&self) -> Result<()> {
        validate_prefix_len(self.prefix_len)?;
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// A prefix must be non-empty and must leave at least one digest character
/// unsent.
pub(crate) fn validate_prefix_len(prefix_len: usize) -> Result<()> {
    if prefix_len == 0 || prefix_len > MAX_PREFIX_LEN {
        return Err(Error::Config(format!(
            "prefix_len must be between 1 and {MAX_PREFIX_LEN}, got {prefix_len}"
        )));
    }
    Ok(())
}
