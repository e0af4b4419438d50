//! Layered application configuration
//!
//! Values are resolved in order: built-in defaults, then an optional JSON
//! file (`valuationx.json` in the working directory, or an explicit path),
//! then environment variables. `${VAR}` references inside string values of
//! the file are expanded when it is loaded.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "valuationx.json";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// LLM endpoint and model settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub api_base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub classifier_model: String,
    pub explainer_model: String,
    pub timeout_secs: u64,
    pub max_tokens: usize,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            classifier_model: "gpt-4.1-mini".to_string(),
            explainer_model: "gpt-4.1-mini".to_string(),
            timeout_secs: 120,
            max_tokens: 1024,
        }
    }
}

/// Normalization and data-provider settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub valuation_threshold: f64,
    pub yahoo_requests_per_minute: u32,
    pub request_timeout_secs: u64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            valuation_threshold: 0.15,
            yahoo_requests_per_minute: 60,
            request_timeout_secs: 30,
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmSettings,
    pub analysis: AnalysisSettings,
}

impl AppConfig {
    /// Load configuration from a JSON file, expanding `${VAR}` from the process environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`from_file`](Self::from_file) with a custom variable source
    pub fn from_file_with<F>(path: impl AsRef<Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut config: AppConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        config.resolve_vars_with(&lookup)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Load defaults, file and environment, then validate
    ///
    /// With `path` set the file must exist; otherwise `valuationx.json` is
    /// used only if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with a custom variable source
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_file_with(path, &lookup)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file_with(DEFAULT_CONFIG_FILE, &lookup)?
            }
            None => Self::default(),
        };

        config.apply_env_with(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from `OPENAI_API_KEY`, `OPENAI_API_BASE`,
    /// `OPENAI_MODEL` and `VALUATIONX_THRESHOLD`
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }

        if let Some(base) = lookup("OPENAI_API_BASE") {
            self.llm.api_base = base;
        }

        if let Some(model) = lookup("OPENAI_MODEL") {
            self.llm.classifier_model.clone_from(&model);
            self.llm.explainer_model = model;
        }

        if let Some(raw) = lookup("VALUATIONX_THRESHOLD") {
            self.analysis.valuation_threshold =
                raw.trim()
                    .parse()
                    .map_err(|e: std::num::ParseFloatError| ConfigError::InvalidValue {
                        key: "VALUATIONX_THRESHOLD".to_string(),
                        message: e.to_string(),
                    })?;
        }

        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let threshold = self.analysis.valuation_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(invalid(
                "analysis.valuation_threshold",
                format!("must be a positive number, got {threshold}"),
            ));
        }

        if self.analysis.yahoo_requests_per_minute == 0 {
            return Err(invalid(
                "analysis.yahoo_requests_per_minute",
                "must be greater than 0".to_string(),
            ));
        }

        if self.analysis.request_timeout_secs == 0 || self.llm.timeout_secs == 0 {
            return Err(invalid("timeout", "must be greater than 0".to_string()));
        }

        if self.llm.max_tokens == 0 {
            return Err(invalid("llm.max_tokens", "must be greater than 0".to_string()));
        }

        Ok(())
    }

    fn resolve_vars_with<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let llm = &mut self.llm;
        llm.api_base = resolve_vars(&llm.api_base, lookup)?;
        llm.classifier_model = resolve_vars(&llm.classifier_model, lookup)?;
        llm.explainer_model = resolve_vars(&llm.explainer_model, lookup)?;
        if let Some(key) = llm.api_key.take() {
            llm.api_key = Some(resolve_vars(&key, lookup)?);
        }
        Ok(())
    }
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    }
}

/// Expand `${VAR}` references using `lookup`
///
/// An unresolvable reference is an error rather than an empty string.
pub fn resolve_vars<F>(s: &str, lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| ConfigError::InvalidValue {
        key: "pattern".to_string(),
        message: e.to_string(),
    })?;

    let mut result = String::with_capacity(s.len());
    let mut last = 0;
    for cap in re.captures_iter(s) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let value = lookup(name.as_str())
            .ok_or_else(|| ConfigError::EnvVarNotFound(name.as_str().to_string()))?;
        result.push_str(&s[last..whole.start()]);
        result.push_str(&value);
        last = whole.end();
    }
    result.push_str(&s[last..]);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.llm.classifier_model, "gpt-4.1-mini");
        assert_eq!(config.analysis.valuation_threshold, 0.15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config(r#"{"analysis": {"valuation_threshold": 0.2}}"#);
        let config = AppConfig::from_file_with(file.path(), vars(&[])).unwrap();

        assert_eq!(config.analysis.valuation_threshold, 0.2);
        assert_eq!(config.analysis.yahoo_requests_per_minute, 60);
        assert_eq!(config.llm, LlmSettings::default());
    }

    #[test]
    fn test_var_expansion() {
        let file = write_config(
            r#"{"llm": {"api_base": "http://${LLM_HOST}:1234/v1", "api_key": "${MY_KEY}"}}"#,
        );
        let config = AppConfig::from_file_with(
            file.path(),
            vars(&[("LLM_HOST", "localhost"), ("MY_KEY", "sk-local")]),
        )
        .unwrap();

        assert_eq!(config.llm.api_base, "http://localhost:1234/v1");
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-local"));
    }

    #[test]
    fn test_missing_var_is_error() {
        let file = write_config(r#"{"llm": {"api_key": "${NOT_SET_ANYWHERE}"}}"#);
        let err = AppConfig::from_file_with(file.path(), vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarNotFound(ref v) if v == "NOT_SET_ANYWHERE"));
    }

    #[test]
    fn test_resolve_vars() {
        let lookup = vars(&[("A", "1"), ("B", "two")]);
        assert_eq!(resolve_vars("${A}-${B}-${A}", &lookup).unwrap(), "1-two-1");
        assert_eq!(resolve_vars("no refs", &lookup).unwrap(), "no refs");
        assert_eq!(resolve_vars("$A stays", &lookup).unwrap(), "$A stays");
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config(
            r#"{"llm": {"classifier_model": "file-model"}, "analysis": {"valuation_threshold": 0.2}}"#,
        );
        let config = AppConfig::load_with(
            Some(file.path()),
            vars(&[
                ("OPENAI_API_KEY", "sk-env"),
                ("OPENAI_MODEL", "env-model"),
                ("VALUATIONX_THRESHOLD", " 0.1 "),
            ]),
        )
        .unwrap();

        assert_eq!(config.llm.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.llm.classifier_model, "env-model");
        assert_eq!(config.llm.explainer_model, "env-model");
        assert_eq!(config.analysis.valuation_threshold, 0.1);
    }

    #[test]
    fn test_bad_threshold_env() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_with(vars(&[("VALUATIONX_THRESHOLD", "fifteen")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "VALUATIONX_THRESHOLD"
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.analysis.valuation_threshold = 0.0;
        assert!(config.validate().is_err());

        config.analysis.valuation_threshold = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.analysis.yahoo_requests_per_minute = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = AppConfig::load_with(Some(Path::new("/nonexistent/valuationx.json")), vars(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let file = write_config("{ not json");
        let err = AppConfig::from_file_with(file.path(), vars(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
