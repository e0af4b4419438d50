//! Market data retrieval for ValuationX
//!
//! Raw stock and sector-ETF metrics come from Yahoo Finance's quoteSummary
//! endpoint. [`YahooMetricsFetcher`] implements the core
//! [`MetricsFetcher`](valuationx_core::MetricsFetcher) trait; no data is
//! cached between calls.

pub mod api;
pub mod config;
pub mod error;
pub mod fetcher;

pub use api::{SummaryFields, YahooClient};
pub use config::{MarketConfig, MarketConfigBuilder};
pub use error::{MarketError, Result};
pub use fetcher::{YahooMetricsFetcher, sector_metrics_from_summary, stock_metrics_from_summary};
