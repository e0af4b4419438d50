//! Yahoo Finance quoteSummary client
//!
//! Yahoo requires a session cookie (set by visiting `fc.yahoo.com`) and a
//! crumb token tied to that cookie on every quoteSummary call. The cookie
//! lives in reqwest's cookie store; the crumb is fetched once and reused
//! until Yahoo rejects it.

use super::quote_summary::{MODULES, SummaryFields};
use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Crumbs are short opaque tokens; anything longer is an HTML error page
const MAX_CRUMB_LEN: usize = 64;

/// Yahoo Finance client
#[derive(Debug)]
pub struct YahooClient {
    client: Client,
    config: MarketConfig,
    rate_limiter: SharedRateLimiter,
    crumb: Mutex<Option<String>>,
}

impl YahooClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(MarketConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: MarketConfig) -> Result<Self> {
        config.validate()?;

        let rpm = NonZeroU32::new(config.requests_per_minute).ok_or_else(|| {
            MarketError::Config("requests_per_minute must be greater than 0".to_string())
        })?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(rpm)));

        let client = Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            config,
            rate_limiter,
            crumb: Mutex::new(None),
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Fetch and flatten the quoteSummary modules for `symbol`
    #[instrument(skip(self))]
    pub async fn quote_summary(&self, symbol: &str) -> Result<SummaryFields> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(MarketError::NotFound(String::new()));
        }

        let crumb = self.crumb().await?;

        self.rate_limiter.until_ready().await;

        let url = format!(
            "{}/v10/finance/quoteSummary/{symbol}",
            self.config.base_url.trim_end_matches('/')
        );
        debug!("Requesting quoteSummary from {url}");

        let response = self
            .client
            .get(&url)
            .query(&[("modules", MODULES.join(",").as_str()), ("crumb", crumb.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match status.as_u16() {
            401 | 403 => {
                warn!("Yahoo rejected crumb for {symbol}, discarding session");
                self.invalidate().await;
                Err(MarketError::Session(format!("HTTP {status}")))
            }
            429 => Err(MarketError::RateLimited),
            // 404 bodies still carry the quoteSummary error envelope
            404 => match SummaryFields::parse(&symbol, &body) {
                Err(MarketError::Json(_)) => Err(MarketError::NotFound(symbol)),
                other => other,
            },
            _ if status.is_success() => SummaryFields::parse(&symbol, &body),
            code => Err(MarketError::Http {
                status: code,
                message: truncate(&body, 200),
            }),
        }
    }

    /// Cached crumb, performing the cookie/crumb handshake when absent
    async fn crumb(&self) -> Result<String> {
        let mut guard = self.crumb.lock().await;
        if let Some(crumb) = guard.as_ref() {
            return Ok(crumb.clone());
        }

        let crumb = self.fetch_crumb().await?;
        *guard = Some(crumb.clone());
        Ok(crumb)
    }

    async fn fetch_crumb(&self) -> Result<String> {
        debug!("Starting Yahoo session via {}", self.config.session_url);

        self.rate_limiter.until_ready().await;
        // The cookie page usually answers 404; only the Set-Cookie matters
        self.client.get(&self.config.session_url).send().await?;

        self.rate_limiter.until_ready().await;
        let url = format!(
            "{}/v1/test/getcrumb",
            self.config.base_url.trim_end_matches('/')
        );
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status.as_u16() == 429 {
            return Err(MarketError::RateLimited);
        }
        if !status.is_success() {
            return Err(MarketError::Session(format!(
                "crumb request returned HTTP {status}"
            )));
        }

        let crumb = response.text().await?.trim().to_string();
        validate_crumb(&crumb)?;
        Ok(crumb)
    }

    /// Drop the cached crumb so the next request starts a new session
    pub async fn invalidate(&self) {
        *self.crumb.lock().await = None;
    }
}

fn validate_crumb(crumb: &str) -> Result<()> {
    if crumb.is_empty() || crumb.len() > MAX_CRUMB_LEN || crumb.contains(char::is_whitespace) {
        return Err(MarketError::Session("invalid crumb".to_string()));
    }
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
