//! Pipeline orchestrator
//!
//! Sequences one valuation request: classify the company, fetch the stock
//! and its sector ETF concurrently, derive multiples, normalize, and ask for
//! a narrative explanation. Any collaborator failure aborts the request with
//! that single error; there is no partial result and no retry.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use valuationx_core::{
    ClassificationRequest, ComparisonResult, MetricsFetcher, NarrativeExplainer, RelativeNormalizer,
    Result, SectorClassifier, SectorDerivedMetrics, SectorSelection, StockDerivedMetrics,
    ValuationExplanation, derive_sector_multiples, derive_stock_multiples,
};

/// Complete output of one valuation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    pub sector_selection: SectorSelection,
    pub stock_metrics: StockDerivedMetrics,
    pub sector_metrics: SectorDerivedMetrics,
    pub comparison: ComparisonResult,
    pub explanation: ValuationExplanation,
}

/// Stock-vs-sector comparison without classification or explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorComparison {
    pub stock_metrics: StockDerivedMetrics,
    pub sector_metrics: SectorDerivedMetrics,
    pub comparison: ComparisonResult,
}

/// Fetches a stock and a sector ETF concurrently, then derives and normalizes
///
/// This is the part of the pipeline that needs no LLM collaborators.
#[derive(Clone)]
pub struct SectorComparator {
    fetcher: Arc<dyn MetricsFetcher>,
    normalizer: RelativeNormalizer,
}

impl SectorComparator {
    pub fn new(fetcher: Arc<dyn MetricsFetcher>) -> Self {
        Self {
            fetcher,
            normalizer: RelativeNormalizer::default(),
        }
    }

    /// Replace the default normalizer (threshold 0.15)
    pub fn with_normalizer(mut self, normalizer: RelativeNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn normalizer(&self) -> &RelativeNormalizer {
        &self.normalizer
    }

    /// Fetch, derive and normalize a stock against an explicit sector ETF
    #[instrument(skip(self))]
    pub async fn compare(&self, ticker: &str, etf_ticker: &str) -> Result<SectorComparison> {
        info!("Fetching stock and sector metrics");
        let (stock_raw, sector_raw) = tokio::try_join!(
            self.fetcher.fetch_stock_raw(ticker),
            self.fetcher.fetch_sector_raw(etf_ticker),
        )
        .inspect_err(|e| warn!(error = %e, kind = e.kind(), "Metric retrieval failed"))?;

        let stock_metrics = derive_stock_multiples(&stock_raw);
        let sector_metrics = derive_sector_multiples(&sector_raw);
        let comparison = self.normalizer.normalize(&stock_metrics, &sector_metrics);

        Ok(SectorComparison {
            stock_metrics,
            sector_metrics,
            comparison,
        })
    }
}

/// Runs valuation requests against injected collaborators
///
/// Holds no per-request state, so one pipeline can serve concurrent requests.
#[derive(Clone)]
pub struct ValuationPipeline {
    classifier: Arc<dyn SectorClassifier>,
    comparator: SectorComparator,
    explainer: Arc<dyn NarrativeExplainer>,
}

impl ValuationPipeline {
    pub fn new(
        classifier: Arc<dyn SectorClassifier>,
        fetcher: Arc<dyn MetricsFetcher>,
        explainer: Arc<dyn NarrativeExplainer>,
    ) -> Self {
        Self {
            classifier,
            comparator: SectorComparator::new(fetcher),
            explainer,
        }
    }

    /// Replace the default normalizer (threshold 0.15)
    pub fn with_normalizer(mut self, normalizer: RelativeNormalizer) -> Self {
        self.comparator = self.comparator.with_normalizer(normalizer);
        self
    }

    pub fn normalizer(&self) -> &RelativeNormalizer {
        self.comparator.normalizer()
    }

    /// Run the full pipeline for one company
    #[instrument(skip(self, request), fields(ticker = %request.ticker))]
    pub async fn analyze(&self, request: &ClassificationRequest) -> Result<ValuationReport> {
        info!("Classifying sector");
        let sector_selection = self
            .classifier
            .classify(request)
            .await
            .inspect_err(|e| warn!(error = %e, "Sector classification failed"))?;
        info!(primary_etf = %sector_selection.primary_etf, "Sector selected");

        let SectorComparison {
            stock_metrics,
            sector_metrics,
            comparison,
        } = self
            .comparator
            .compare(&request.ticker, &sector_selection.primary_etf)
            .await?;

        info!("Requesting narrative explanation");
        let explanation = self
            .explainer
            .explain(&stock_metrics, &sector_metrics, &comparison)
            .await
            .inspect_err(|e| warn!(error = %e, "Narrative explanation failed"))?;

        info!(classification = %explanation.classification, "Valuation complete");
        Ok(ValuationReport {
            sector_selection,
            stock_metrics,
            sector_metrics,
            comparison,
            explanation,
        })
    }

    /// Compare against an explicit sector ETF, skipping classification and explanation
    pub async fn compare(&self, ticker: &str, etf_ticker: &str) -> Result<SectorComparison> {
        self.comparator.compare(ticker, etf_ticker).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Barrier;
    use tokio::time::timeout;
    use valuationx_core::{
        MockMetricsFetcher, MockNarrativeExplainer, MockSectorClassifier, QualitySignal,
        SectorRawMetrics, StockRawMetrics, ValuationClassification, ValuationError, ValuationSignal,
    };

    fn selection(etf: &str) -> SectorSelection {
        SectorSelection {
            primary_etf: etf.to_string(),
            secondary_etf: None,
            rationale: "Integrated oil and gas".to_string(),
        }
    }

    fn xom_raw() -> StockRawMetrics {
        StockRawMetrics {
            ticker: Some("XOM".to_string()),
            pe_ratio: Some(10.0),
            ev_to_ebitda: Some(5.0),
            free_cash_flow: Some(12.0),
            market_cap: Some(100.0),
            dividend_yield: Some(0.035),
            operating_margin: Some(0.2),
            ..Default::default()
        }
    }

    fn xle_raw() -> SectorRawMetrics {
        SectorRawMetrics {
            etf_ticker: Some("XLE".to_string()),
            sector_name: Some("Energy".to_string()),
            pe_ratio: Some(14.0),
            ev_to_ebitda: Some(5.5),
            dividend_yield: Some(0.03),
            ..Default::default()
        }
    }

    fn explanation() -> ValuationExplanation {
        ValuationExplanation {
            valuation_summary: "Discount to sector on earnings.".to_string(),
            key_drivers: "Lower P/E".to_string(),
            risk_factors: "Oil prices".to_string(),
            classification: ValuationClassification::PotentialUndervaluation,
        }
    }

    fn working_fetcher() -> MockMetricsFetcher {
        let mut fetcher = MockMetricsFetcher::new();
        fetcher
            .expect_fetch_stock_raw()
            .withf(|ticker| ticker == "XOM")
            .times(1)
            .returning(|_| Ok(xom_raw()));
        fetcher
            .expect_fetch_sector_raw()
            .withf(|etf| etf == "XLE")
            .times(1)
            .returning(|_| Ok(xle_raw()));
        fetcher
    }

    fn pipeline(
        classifier: MockSectorClassifier,
        fetcher: MockMetricsFetcher,
        explainer: MockNarrativeExplainer,
    ) -> ValuationPipeline {
        ValuationPipeline::new(Arc::new(classifier), Arc::new(fetcher), Arc::new(explainer))
    }

    #[tokio::test]
    async fn test_full_run_assembles_report() {
        let mut classifier = MockSectorClassifier::new();
        classifier
            .expect_classify()
            .withf(|req| req.ticker == "XOM" && req.company_name == "Exxon Mobil")
            .times(1)
            .returning(|_| Ok(selection("XLE")));

        let mut explainer = MockNarrativeExplainer::new();
        explainer
            .expect_explain()
            .withf(|stock, sector, comparison| {
                stock.ticker.as_deref() == Some("XOM")
                    && sector.etf_ticker.as_deref() == Some("XLE")
                    && comparison.pe_signal == Some(ValuationSignal::SignificantlyCheaper)
            })
            .times(1)
            .returning(|_, _, _| Ok(explanation()));

        let report = pipeline(classifier, working_fetcher(), explainer)
            .analyze(&ClassificationRequest::new("XOM", "Exxon Mobil"))
            .await
            .unwrap();

        assert_eq!(report.sector_selection.primary_etf, "XLE");
        assert_eq!(report.stock_metrics.fcf_yield, Some(0.12));
        assert_eq!(report.sector_metrics.earnings_yield, Some(1.0 / 14.0));
        assert_eq!(report.comparison.ticker.as_deref(), Some("XOM"));
        assert_eq!(report.comparison.sector_name.as_deref(), Some("Energy"));
        assert_eq!(
            report.comparison.ev_ebitda_signal,
            Some(ValuationSignal::InLineWithSector)
        );
        assert_eq!(
            report.comparison.dividend_yield_vs_sector,
            Some(QualitySignal::AboveSector)
        );
        assert_eq!(report.comparison.operating_margin_vs_sector, None);
        assert_eq!(report.explanation, explanation());
    }

    #[tokio::test]
    async fn test_classification_failure_aborts_before_fetch() {
        let mut classifier = MockSectorClassifier::new();
        classifier
            .expect_classify()
            .returning(|_| Err(ValuationError::Classification("empty response".into())));

        let mut fetcher = MockMetricsFetcher::new();
        fetcher.expect_fetch_stock_raw().never();
        fetcher.expect_fetch_sector_raw().never();

        let mut explainer = MockNarrativeExplainer::new();
        explainer.expect_explain().never();

        let err = pipeline(classifier, fetcher, explainer)
            .analyze(&ClassificationRequest::new("XOM", "Exxon Mobil"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "classification");
    }

    #[tokio::test]
    async fn test_unknown_ticker_aborts_before_explain() {
        let mut classifier = MockSectorClassifier::new();
        classifier
            .expect_classify()
            .returning(|_| Ok(selection("XLE")));

        let mut fetcher = MockMetricsFetcher::new();
        fetcher
            .expect_fetch_stock_raw()
            .returning(|ticker| Err(ValuationError::NotFound(ticker.to_string())));
        fetcher
            .expect_fetch_sector_raw()
            .returning(|_| Ok(xle_raw()));

        let mut explainer = MockNarrativeExplainer::new();
        explainer.expect_explain().never();

        let err = pipeline(classifier, fetcher, explainer)
            .analyze(&ClassificationRequest::new("ZZZZ", "Nobody"))
            .await
            .unwrap_err();
        assert!(matches!(err, ValuationError::NotFound(ref t) if t == "ZZZZ"));
    }

    #[tokio::test]
    async fn test_invalid_etf_code_fails_at_fetch() {
        let mut classifier = MockSectorClassifier::new();
        classifier
            .expect_classify()
            .returning(|_| Ok(selection("XYZ")));

        let mut fetcher = MockMetricsFetcher::new();
        fetcher
            .expect_fetch_stock_raw()
            .returning(|_| Ok(xom_raw()));
        fetcher
            .expect_fetch_sector_raw()
            .withf(|etf| etf == "XYZ")
            .times(1)
            .returning(|etf| Err(ValuationError::NotFound(etf.to_string())));

        let mut explainer = MockNarrativeExplainer::new();
        explainer.expect_explain().never();

        let err = pipeline(classifier, fetcher, explainer)
            .analyze(&ClassificationRequest::new("XOM", "Exxon Mobil"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let mut classifier = MockSectorClassifier::new();
        classifier
            .expect_classify()
            .returning(|_| Ok(selection("XLE")));

        let mut fetcher = MockMetricsFetcher::new();
        fetcher
            .expect_fetch_stock_raw()
            .returning(|_| Ok(xom_raw()));
        fetcher
            .expect_fetch_sector_raw()
            .returning(|_| Err(ValuationError::Provider("HTTP 500".into())));

        let mut explainer = MockNarrativeExplainer::new();
        explainer.expect_explain().never();

        let err = pipeline(classifier, fetcher, explainer)
            .analyze(&ClassificationRequest::new("XOM", "Exxon Mobil"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "provider");
    }

    #[tokio::test]
    async fn test_explanation_failure_yields_no_report() {
        let mut classifier = MockSectorClassifier::new();
        classifier
            .expect_classify()
            .returning(|_| Ok(selection("XLE")));

        let mut explainer = MockNarrativeExplainer::new();
        explainer
            .expect_explain()
            .times(1)
            .returning(|_, _, _| Err(ValuationError::Explanation("not JSON".into())));

        let err = pipeline(classifier, working_fetcher(), explainer)
            .analyze(&ClassificationRequest::new("XOM", "Exxon Mobil"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "explanation");
    }

    #[tokio::test]
    async fn test_compare_skips_llm_collaborators() {
        let mut classifier = MockSectorClassifier::new();
        classifier.expect_classify().never();
        let mut explainer = MockNarrativeExplainer::new();
        explainer.expect_explain().never();

        let result = pipeline(classifier, working_fetcher(), explainer)
            .compare("XOM", "XLE")
            .await
            .unwrap();

        assert_eq!(result.comparison.sector_etf.as_deref(), Some("XLE"));
        assert_eq!(result.comparison.pe_signal, Some(ValuationSignal::SignificantlyCheaper));
        // fcf_yield 0.12 vs earnings_yield 1/14
        assert_eq!(
            result.comparison.fcf_yield_vs_sector,
            Some(QualitySignal::AboveSector)
        );
    }

    #[tokio::test]
    async fn test_custom_threshold() {
        let mut classifier = MockSectorClassifier::new();
        classifier.expect_classify().never();
        let mut explainer = MockNarrativeExplainer::new();
        explainer.expect_explain().never();

        // pe diff is about -28.6%
        let result = pipeline(classifier, working_fetcher(), explainer)
            .with_normalizer(RelativeNormalizer::new(0.3))
            .compare("XOM", "XLE")
            .await
            .unwrap();

        assert_eq!(result.comparison.pe_signal, Some(ValuationSignal::InLineWithSector));
    }

    #[tokio::test]
    async fn test_comparator_standalone() {
        let comparator = SectorComparator::new(Arc::new(working_fetcher()));
        assert_eq!(comparator.normalizer().threshold(), 0.15);

        let result = comparator.compare("XOM", "XLE").await.unwrap();
        assert_eq!(result.stock_metrics.ticker.as_deref(), Some("XOM"));
        assert_eq!(result.sector_metrics.sector_name.as_deref(), Some("Energy"));
    }

    /// Each fetch blocks until the other one has started
    struct RendezvousFetcher {
        barrier: Barrier,
    }

    #[async_trait]
    impl MetricsFetcher for RendezvousFetcher {
        async fn fetch_stock_raw(&self, _ticker: &str) -> Result<StockRawMetrics> {
            self.barrier.wait().await;
            Ok(xom_raw())
        }

        async fn fetch_sector_raw(&self, _etf_ticker: &str) -> Result<SectorRawMetrics> {
            self.barrier.wait().await;
            Ok(xle_raw())
        }
    }

    #[tokio::test]
    async fn test_stock_and_sector_fetches_overlap() {
        let comparator = SectorComparator::new(Arc::new(RendezvousFetcher {
            barrier: Barrier::new(2),
        }));

        let result = timeout(Duration::from_secs(2), comparator.compare("XOM", "XLE"))
            .await
            .expect("stock and sector fetches did not run concurrently")
            .unwrap();

        assert_eq!(result.comparison.ticker.as_deref(), Some("XOM"));
        assert_eq!(result.comparison.sector_etf.as_deref(), Some("XLE"));
    }
}
