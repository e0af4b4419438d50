//! Relative-valuation core for ValuationX
//!
//! This crate holds everything that is deterministic in the pipeline:
//!
//! - [`schema`]: the named, optional metric fields each record carries
//! - [`multiples`]: derivation of valuation ratios from raw provider metrics
//! - [`normalize`]: stock-vs-sector percent differences and signals
//! - [`sector`]: the eleven recognized sector ETFs
//! - [`collaborators`]: traits for the classifier, data fetcher and explainer
//!
//! Derivation and normalization are total functions; missing inputs become
//! missing outputs and nothing here returns an error.
//!
//! # Example
//!
//! ```
//! use valuationx_core::{
//!     derive_sector_multiples, derive_stock_multiples, normalize_relative_valuation,
//!     SectorRawMetrics, StockRawMetrics, ValuationSignal,
//! };
//!
//! let stock = derive_stock_multiples(&StockRawMetrics {
//!     ticker: Some("XOM".into()),
//!     pe_ratio: Some(10.0),
//!     ..Default::default()
//! });
//! let sector = derive_sector_multiples(&SectorRawMetrics {
//!     etf_ticker: Some("XLE".into()),
//!     pe_ratio: Some(14.0),
//!     ..Default::default()
//! });
//!
//! let comparison = normalize_relative_valuation(&stock, &sector);
//! assert_eq!(comparison.pe_signal, Some(ValuationSignal::SignificantlyCheaper));
//! ```

pub mod collaborators;
pub mod error;
pub mod multiples;
pub mod normalize;
pub mod schema;
pub mod sector;

pub use collaborators::{
    ClassificationRequest, MetricsFetcher, NarrativeExplainer, SectorClassifier, SectorSelection,
    ValuationClassification, ValuationExplanation,
};
pub use error::{Result, ValuationError};
pub use multiples::{derive_sector_multiples, derive_stock_multiples, safe_ratio};
pub use normalize::{
    ComparisonResult, DEFAULT_VALUATION_THRESHOLD, QualitySignal, RelativeNormalizer,
    ValuationSignal, normalize_relative_valuation, percent_diff, quality_signal, valuation_signal,
};
pub use schema::{
    FieldKind, MetricField, SECTOR_DERIVED_FIELDS, SECTOR_RAW_FIELDS, STOCK_DERIVED_FIELDS,
    STOCK_RAW_FIELDS, SectorDerivedMetrics, SectorRawMetrics, StockDerivedMetrics, StockRawMetrics,
};
pub use sector::{SectorEtf, UnknownSectorEtf};

#[cfg(any(test, feature = "mocks"))]
pub use collaborators::{MockMetricsFetcher, MockNarrativeExplainer, MockSectorClassifier};
