//! Shared utilities for ValuationX: tracing setup and layered configuration

pub mod config;
pub mod logging;

pub use config::{AnalysisSettings, AppConfig, ConfigError, DEFAULT_CONFIG_FILE, LlmSettings};
pub use logging::{LogFormat, init_tracing};
