//! Reqwest client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use formsmith_core::{ErrorKind, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default base URL of the forms API, including its `/api` prefix.
pub const DEFAULT_API_URL: &str = "https://finalprojectbackend-9n0r.onrender.com/api";

/// Configuration for the reqwest HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// Base URL of the forms API
    #[cfg_attr(
        feature = "config",
        arg(long = "api-url", env = "FORMSMITH_API_URL", default_value = DEFAULT_API_URL)
    )]
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// HTTP request timeout in seconds (requests never time out when unset)
    #[cfg_attr(feature = "config", arg(long = "http-timeout", env = "HTTP_TIMEOUT"))]
    #[serde(default)]
    pub http_timeout: Option<u64>,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_owned()
}

impl Default for ReqwestConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            http_timeout: None,
            user_agent: None,
        }
    }
}

impl ReqwestConfig {
    /// Create a new configuration pointing at `api_url`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Returns the timeout as a Duration, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.http_timeout.map(Duration::from_secs)
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    /// Returns the default user agent string.
    fn default_user_agent() -> String {
        format!("formsmith/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Parses the base URL, normalised to end with `/` so relative
    /// endpoint paths are appended rather than replacing the last segment.
    pub fn base_url(&self) -> Result<Url> {
        let mut url = Url::parse(self.api_url.trim()).map_err(|e| {
            ErrorKind::Configuration
                .with_message(format!("invalid API URL '{}'", self.api_url))
                .with_source(e)
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ErrorKind::Configuration.with_message(format!(
                "API URL '{}' must use http or https",
                self.api_url
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;

        if self.http_timeout == Some(0) {
            return Err(ErrorKind::Configuration
                .with_message("HTTP timeout must be at least one second; omit it to disable"));
        }

        Ok(())
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = Some(timeout_secs);
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
