//! LLM-backed sector classifier

use crate::config::PipelineConfig;
use crate::prompts::{CLASSIFIER_SYSTEM_PROMPT, classification_prompt};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};
use valuationx_core::{
    ClassificationRequest, Result, SectorClassifier, SectorSelection, ValuationError,
};
use valuationx_llm::{CompletionRequest, LLMProvider, Message, parse_completion};

/// Maps a company to a sector ETF by asking an LLM in JSON mode
pub struct LlmSectorClassifier {
    provider: Arc<dyn LLMProvider>,
    model: String,
    temperature: f32,
    max_tokens: usize,
}

impl LlmSectorClassifier {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &PipelineConfig) -> Self {
        Self {
            provider,
            model: config.classifier_model.clone(),
            temperature: config.classifier_temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl SectorClassifier for LlmSectorClassifier {
    #[instrument(skip(self, request), fields(ticker = %request.ticker, model = %self.model))]
    async fn classify(&self, request: &ClassificationRequest) -> Result<SectorSelection> {
        let prompt = classification_prompt(request)
            .map_err(|e| ValuationError::Classification(e.to_string()))?;

        let completion = CompletionRequest::builder(&self.model)
            .system(CLASSIFIER_SYSTEM_PROMPT)
            .add_message(Message::user(prompt))
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .json_output()
            .build();

        let response = self
            .provider
            .complete(completion)
            .await
            .map_err(|e| ValuationError::Classification(e.to_string()))?;

        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            total_tokens = response.usage.total(),
            "Classification completion received"
        );

        let selection: SectorSelection = parse_completion(&response)
            .map_err(|e| ValuationError::Classification(e.to_string()))?;

        debug!(primary_etf = %selection.primary_etf, "Sector selected");
        Ok(selection)
    }
}
