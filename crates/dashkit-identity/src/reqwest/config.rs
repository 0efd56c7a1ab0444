//! Identity client configuration.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{Error, Result};

/// Default timeout for identity provider requests: 10 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the identity provider client.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct IdentityConfig {
    /// Base URL of the identity provider's backend API
    #[cfg_attr(
        feature = "config",
        arg(long = "identity-api-url", env = "IDENTITY_API_URL")
    )]
    pub identity_api_url: String,

    /// Secret key used to authenticate against the backend API
    #[cfg_attr(
        feature = "config",
        arg(long = "identity-secret-key", env = "IDENTITY_SECRET_KEY", hide_env_values = true)
    )]
    pub identity_secret_key: String,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(
            long = "identity-http-timeout",
            env = "IDENTITY_HTTP_TIMEOUT",
            default_value = "10"
        )
    )]
    #[serde(default = "default_timeout_secs")]
    pub identity_http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "identity-user-agent", env = "IDENTITY_USER_AGENT")
    )]
    #[serde(default)]
    pub identity_user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl IdentityConfig {
    /// Creates a configuration with the default timeout.
    pub fn new(api_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            identity_api_url: api_url.into(),
            identity_secret_key: secret_key.into(),
            identity_http_timeout: DEFAULT_TIMEOUT_SECS,
            identity_user_agent: None,
        }
    }

    /// Parses the configured API URL.
    pub fn api_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.identity_api_url)?)
    }

    /// Returns the secret key.
    pub fn secret_key(&self) -> &str {
        &self.identity_secret_key
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        match self.identity_http_timeout {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.identity_user_agent
            .clone()
            .unwrap_or_else(|| format!("dashkit/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.identity_http_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.identity_user_agent = Some(user_agent.into());
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let url = self.api_url()?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(Error::Config(
                format!("identity API URL must be http(s), got '{url}'").into(),
            ));
        }

        if self.identity_secret_key.trim().is_empty() {
            return Err(Error::Config("identity secret key cannot be empty".into()));
        }

        Ok(())
    }
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("identity_api_url", &self.identity_api_url)
            .field("identity_secret_key", &"***")
            .field("identity_http_timeout", &self.identity_http_timeout)
            .field("identity_user_agent", &self.identity_user_agent)
            .finish()
    }
}
