//! LLM-backed narrative explainer

use crate::config::PipelineConfig;
use crate::prompts::{EXPLAINER_SYSTEM_PROMPT, explanation_prompt};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};
use valuationx_core::{
    ComparisonResult, NarrativeExplainer, Result, SectorDerivedMetrics, StockDerivedMetrics,
    ValuationError, ValuationExplanation,
};
use valuationx_llm::{CompletionRequest, LLMProvider, Message, parse_completion};

/// Explains a stock-vs-sector comparison by asking an LLM in JSON mode
pub struct LlmNarrativeExplainer {
    provider: Arc<dyn LLMProvider>,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl LlmNarrativeExplainer {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &PipelineConfig) -> Self {
        Self {
            provider,
            model: config.explainer_model.clone(),
            temperature: config.explainer_temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl NarrativeExplainer for LlmNarrativeExplainer {
    #[instrument(skip_all, fields(ticker = ?comparison.ticker, model = %self.model))]
    async fn explain(
        &self,
        stock: &StockDerivedMetrics,
        sector: &SectorDerivedMetrics,
        comparison: &ComparisonResult,
    ) -> Result<ValuationExplanation> {
        let prompt = explanation_prompt(stock, sector, comparison)
            .map_err(|e| ValuationError::Explanation(e.to_string()))?;

        let completion = CompletionRequest::builder(&self.model)
            .system(EXPLAINER_SYSTEM_PROMPT)
            .add_message(Message::user(prompt))
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .json_output()
            .build();

        let response = self
            .provider
            .complete(completion)
            .await
            .map_err(|e| ValuationError::Explanation(e.to_string()))?;

        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            total_tokens = response.usage.total(),
            "Explanation completion received"
        );

        let explanation: ValuationExplanation = parse_completion(&response)
            .map_err(|e| ValuationError::Explanation(e.to_string()))?;

        debug!(classification = %explanation.classification, "Explanation received");
        Ok(explanation)
    }
}
