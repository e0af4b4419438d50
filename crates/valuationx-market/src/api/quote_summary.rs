//! quoteSummary response envelope and value unwrapping
//!
//! Yahoo groups fields into modules (`price`, `summaryDetail`, ...) and wraps
//! most numbers as `{"raw": 12.3, "fmt": "12.30"}`. An unavailable value is
//! either omitted, `null`, or an empty object `{}`.

use crate::error::{MarketError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Modules requested for every symbol, in lookup priority order
pub const MODULES: [&str; 5] = [
    "price",
    "summaryDetail",
    "defaultKeyStatistics",
    "financialData",
    "assetProfile",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    #[serde(default)]
    result: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

impl ApiError {
    fn is_not_found(&self) -> bool {
        self.code.eq_ignore_ascii_case("Not Found")
            || self.description.contains("not found")
            || self.description.contains("No fundamentals data")
    }
}

/// Flattened view over all modules of one quoteSummary result
///
/// When a key appears in more than one module the first module in
/// [`MODULES`] order wins.
#[derive(Debug, Clone, Default)]
pub struct SummaryFields {
    fields: HashMap<String, Value>,
}

impl SummaryFields {
    /// Parse a quoteSummary body for `symbol`
    pub fn parse(symbol: &str, body: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_str(body)?;
        let summary = envelope.quote_summary;

        if let Some(error) = summary.error {
            if error.is_not_found() {
                return Err(MarketError::NotFound(symbol.to_string()));
            }
            return Err(MarketError::Api {
                code: error.code,
                description: error.description,
            });
        }

        let result = summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| MarketError::NotFound(symbol.to_string()))?;

        Ok(Self::from_modules(&result))
    }

    fn from_modules(result: &Map<String, Value>) -> Self {
        let mut fields = HashMap::new();
        for module in MODULES {
            let Some(Value::Object(values)) = result.get(module) else {
                continue;
            };
            for (key, value) in values {
                fields.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }
        Self { fields }
    }

    /// Numeric value for `key`, unwrapping `{raw, fmt}`
    ///
    /// Zero is a real value and is kept; non-finite values are dropped.
    pub fn number(&self, key: &str) -> Option<f64> {
        let value = match self.fields.get(key)? {
            Value::Object(wrapped) => wrapped.get("raw")?,
            plain => plain,
        };
        value.as_f64().filter(|v| v.is_finite())
    }

    /// Non-empty string value for `key`
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// Number of flattened keys
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
