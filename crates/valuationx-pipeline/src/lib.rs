//! Valuation pipeline for ValuationX
//!
//! Wires the deterministic core to its external collaborators:
//!
//! - [`LlmSectorClassifier`] and [`LlmNarrativeExplainer`] implement the core
//!   collaborator traits on top of any [`LLMProvider`](valuationx_llm::LLMProvider)
//! - [`ValuationPipeline`] sequences classification, concurrent retrieval,
//!   derivation, normalization and explanation
//! - [`benchmark_all_sectors`] sweeps the whole sector-ETF universe
//!
//! ```no_run
//! use std::sync::Arc;
//! use valuationx_core::{ClassificationRequest, MetricsFetcher, RelativeNormalizer};
//! use valuationx_llm::LLMProvider;
//! use valuationx_pipeline::{
//!     LlmNarrativeExplainer, LlmSectorClassifier, PipelineConfig, ValuationPipeline,
//! };
//!
//! # async fn run(
//! #     llm: Arc<dyn LLMProvider>,
//! #     fetcher: Arc<dyn MetricsFetcher>,
//! # ) -> valuationx_core::Result<()> {
//! let config = PipelineConfig::default();
//! let pipeline = ValuationPipeline::new(
//!     Arc::new(LlmSectorClassifier::new(llm.clone(), &config)),
//!     fetcher,
//!     Arc::new(LlmNarrativeExplainer::new(llm, &config)),
//! )
//! .with_normalizer(RelativeNormalizer::new(config.valuation_threshold));
//!
//! let report = pipeline
//!     .analyze(&ClassificationRequest::new("XOM", "Exxon Mobil Corporation"))
//!     .await?;
//! println!("{}", report.explanation.classification);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod explainer;
pub mod orchestrator;
pub mod prompts;
pub mod sectors;

#[cfg(test)]
mod test_support;

pub use classifier::LlmSectorClassifier;
pub use config::{InvalidPipelineConfig, PipelineConfig, PipelineConfigBuilder};
pub use explainer::LlmNarrativeExplainer;
pub use orchestrator::{SectorComparator, SectorComparison, ValuationPipeline, ValuationReport};
pub use sectors::benchmark_all_sectors;
