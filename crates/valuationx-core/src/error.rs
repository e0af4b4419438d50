//! Error types for the valuation pipeline

use thiserror::Error;

/// Result type alias for valuation operations
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Errors that abort a valuation request
///
/// Derivation and normalization never produce these; only the external
/// collaborators (classifier, metric fetchers, explainer) do.
#[derive(Debug, Error)]
pub enum ValuationError {
    /// The sector classifier produced no usable mapping
    #[error("Sector classification failed: {0}")]
    Classification(String),

    /// The data provider does not know the ticker
    #[error("Ticker not found: {0}")]
    NotFound(String),

    /// The data provider failed upstream
    #[error("Data provider error: {0}")]
    Provider(String),

    /// The narrative explainer returned no parsable result
    #[error("Narrative explanation failed: {0}")]
    Explanation(String),
}

impl ValuationError {
    /// Short machine-readable kind, used in logs and CLI output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Classification(_) => "classification",
            Self::NotFound(_) => "not_found",
            Self::Provider(_) => "provider",
            Self::Explanation(_) => "explanation",
        }
    }
}
