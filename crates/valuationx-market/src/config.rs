//! Configuration for the Yahoo Finance client

use crate::error::{MarketError, Result};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_SESSION_URL: &str = "https://fc.yahoo.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Configuration for market data retrieval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    /// Host serving `/v1/test/getcrumb` and `/v10/finance/quoteSummary`
    pub base_url: String,

    /// Page visited to obtain the session cookie
    pub session_url: String,

    /// Maximum Yahoo requests per minute
    pub requests_per_minute: u32,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Browser-like user agent; Yahoo rejects the default reqwest one
    pub user_agent: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_url: DEFAULT_SESSION_URL.to_string(),
            requests_per_minute: 60,
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl MarketConfig {
    /// Create a new configuration builder
    pub fn builder() -> MarketConfigBuilder {
        MarketConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.requests_per_minute == 0 {
            return Err(MarketError::Config(
                "requests_per_minute must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(MarketError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.base_url.trim().is_empty() {
            return Err(MarketError::Config("base_url must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Builder for MarketConfig
#[derive(Debug, Default)]
pub struct MarketConfigBuilder {
    base_url: Option<String>,
    session_url: Option<String>,
    requests_per_minute: Option<u32>,
    request_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl MarketConfigBuilder {
    /// Set the quoteSummary host
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the session cookie page
    pub fn session_url(mut self, url: impl Into<String>) -> Self {
        self.session_url = Some(url.into());
        self
    }

    /// Set the request quota
    pub fn requests_per_minute(mut self, rpm: u32) -> Self {
        self.requests_per_minute = Some(rpm);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<MarketConfig> {
        let defaults = MarketConfig::default();

        let config = MarketConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            session_url: self.session_url.unwrap_or(defaults.session_url),
            requests_per_minute: self.requests_per_minute.unwrap_or(defaults.requests_per_minute),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        };

        config.validate()?;
        Ok(config)
    }
}
