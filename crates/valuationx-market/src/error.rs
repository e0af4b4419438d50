//! Error types for market data retrieval

use thiserror::Error;
use valuationx_core::ValuationError;

/// Market data specific errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// Yahoo does not know the symbol
    #[error("Symbol not found: {0}")]
    NotFound(String),

    /// Yahoo answered 429
    #[error("Rate limit exceeded for Yahoo Finance")]
    RateLimited,

    /// Cookie/crumb handshake failed or the crumb was rejected
    #[error("Yahoo session error: {0}")]
    Session(String),

    /// Non-success HTTP status
    #[error("Yahoo Finance returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Yahoo reported an error in the response envelope
    #[error("Yahoo Finance error {code}: {description}")]
    Api { code: String, description: String },

    /// Network or transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;

impl From<MarketError> for ValuationError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::NotFound(symbol) => ValuationError::NotFound(symbol),
            other => ValuationError::Provider(other.to_string()),
        }
    }
}
