//! Contracts for the external collaborators the pipeline depends on
//!
//! Sector classification, raw data retrieval and narrative explanation are
//! opaque services. The pipeline only sees these request/response records
//! and the traits below, so each can be swapped for a deterministic double.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::Result;
use crate::normalize::ComparisonResult;
use crate::schema::{SectorDerivedMetrics, SectorRawMetrics, StockDerivedMetrics, StockRawMetrics};

/// Input to the sector classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub ticker: String,
    pub company_name: String,
    #[serde(default)]
    pub business_description: Option<String>,
}

impl ClassificationRequest {
    pub fn new(ticker: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            company_name: company_name.into(),
            business_description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.business_description = Some(description.into());
        self
    }
}

/// Sector ETF chosen by the classifier
///
/// `primary_etf` is expected to be one of the recognized codes but is not
/// validated here; an unknown code makes the sector fetch fail instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorSelection {
    pub primary_etf: String,
    #[serde(default)]
    pub secondary_etf: Option<String>,
    pub rationale: String,
}

/// Overall verdict of the narrative explanation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValuationClassification {
    #[serde(rename = "Potential Undervaluation")]
    PotentialUndervaluation,
    #[serde(rename = "Potential Overvaluation")]
    PotentialOvervaluation,
    #[serde(rename = "Likely Justified Valuation")]
    LikelyJustifiedValuation,
    #[serde(rename = "Inconclusive")]
    Inconclusive,
}

impl ValuationClassification {
    pub const ALL: [ValuationClassification; 4] = [
        Self::PotentialUndervaluation,
        Self::PotentialOvervaluation,
        Self::LikelyJustifiedValuation,
        Self::Inconclusive,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::PotentialUndervaluation => "Potential Undervaluation",
            Self::PotentialOvervaluation => "Potential Overvaluation",
            Self::LikelyJustifiedValuation => "Likely Justified Valuation",
            Self::Inconclusive => "Inconclusive",
        }
    }
}

impl fmt::Display for ValuationClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Narrative explanation of the valuation gap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationExplanation {
    pub valuation_summary: String,
    #[serde(deserialize_with = "text_or_lines")]
    pub key_drivers: String,
    #[serde(deserialize_with = "text_or_lines")]
    pub risk_factors: String,
    pub classification: ValuationClassification,
}

/// Accept either a string or a list of strings (joined with newlines)
fn text_or_lines<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrLines {
        Text(String),
        Lines(Vec<String>),
    }

    Ok(match TextOrLines::deserialize(deserializer)? {
        TextOrLines::Text(text) => text,
        TextOrLines::Lines(lines) => lines.join("\n"),
    })
}

/// Maps a company to a sector ETF
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SectorClassifier: Send + Sync {
    /// Fails with [`ValuationError::Classification`](crate::ValuationError::Classification)
    /// when no parsable mapping is produced
    async fn classify(&self, request: &ClassificationRequest) -> Result<SectorSelection>;
}

/// Retrieves raw per-entity metrics from a data provider
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait MetricsFetcher: Send + Sync {
    /// Raw metrics for a single stock
    async fn fetch_stock_raw(&self, ticker: &str) -> Result<StockRawMetrics>;

    /// Raw metrics for a sector ETF
    async fn fetch_sector_raw(&self, etf_ticker: &str) -> Result<SectorRawMetrics>;
}

/// Explains the valuation gap between a stock and its sector
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait NarrativeExplainer: Send + Sync {
    /// Fails with [`ValuationError::Explanation`](crate::ValuationError::Explanation)
    /// when no parsable result is produced
    async fn explain(
        &self,
        stock: &StockDerivedMetrics,
        sector: &SectorDerivedMetrics,
        comparison: &ComparisonResult,
    ) -> Result<ValuationExplanation>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_secondary_optional() {
        let selection: SectorSelection =
            serde_json::from_str(r#"{"primary_etf": "XLE", "rationale": "Oil and gas"}"#).unwrap();
        assert_eq!(selection.primary_etf, "XLE");
        assert_eq!(selection.secondary_etf, None);

        let selection: SectorSelection = serde_json::from_str(
            r#"{"primary_etf": "XLK", "secondary_etf": "XLC", "rationale": "Ads"}"#,
        )
        .unwrap();
        assert_eq!(selection.secondary_etf.as_deref(), Some("XLC"));
    }

    #[test]
    fn test_explanation_accepts_lists() {
        let explanation: ValuationExplanation = serde_json::from_str(
            r#"{
                "valuation_summary": "Trades at a discount.",
                "key_drivers": ["Lower growth", "Commodity exposure"],
                "risk_factors": "Oil price volatility",
                "classification": "Potential Undervaluation"
            }"#,
        )
        .unwrap();

        assert_eq!(explanation.key_drivers, "Lower growth\nCommodity exposure");
        assert_eq!(explanation.risk_factors, "Oil price volatility");
        assert_eq!(
            explanation.classification,
            ValuationClassification::PotentialUndervaluation
        );
    }

    #[test]
    fn test_explanation_rejects_unknown_classification() {
        let result = serde_json::from_str::<ValuationExplanation>(
            r#"{
                "valuation_summary": "s",
                "key_drivers": "d",
                "risk_factors": "r",
                "classification": "Strong Buy"
            }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_classification_labels_round_trip_through_serde() {
        for classification in ValuationClassification::ALL {
            let json = serde_json::to_value(classification).unwrap();
            assert_eq!(json.as_str(), Some(classification.label()));
        }
    }

    #[tokio::test]
    async fn test_mock_fetcher_reports_not_found() {
        let mut fetcher = MockMetricsFetcher::new();
        fetcher
            .expect_fetch_stock_raw()
            .returning(|ticker| Err(crate::ValuationError::NotFound(ticker.to_string())));

        let err = fetcher.fetch_stock_raw("NOPE").await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
