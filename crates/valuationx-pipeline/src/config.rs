//! Configuration for the LLM-backed pipeline stages

use thiserror::Error;
use valuationx_core::DEFAULT_VALUATION_THRESHOLD;

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Rejected pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid pipeline configuration: {0}")]
pub struct InvalidPipelineConfig(pub String);

/// Models, sampling and threshold settings for one pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Model used for sector classification
    pub classifier_model: String,

    /// Model used for the narrative explanation
    pub explainer_model: String,

    pub classifier_temperature: f32,
    pub explainer_temperature: f32,

    /// Token limit for each LLM call
    pub max_tokens: usize,

    /// Percent-difference magnitude that separates "in line" from cheaper/richer
    pub valuation_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            classifier_model: DEFAULT_MODEL.to_string(),
            explainer_model: DEFAULT_MODEL.to_string(),
            classifier_temperature: 0.2,
            explainer_temperature: 0.3,
            max_tokens: 1024,
            valuation_threshold: DEFAULT_VALUATION_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), InvalidPipelineConfig> {
        if self.classifier_model.trim().is_empty() || self.explainer_model.trim().is_empty() {
            return Err(InvalidPipelineConfig("model name must not be empty".to_string()));
        }

        if !self.valuation_threshold.is_finite() || self.valuation_threshold <= 0.0 {
            return Err(InvalidPipelineConfig(format!(
                "valuation_threshold must be a positive number, got {}",
                self.valuation_threshold
            )));
        }

        for temperature in [self.classifier_temperature, self.explainer_temperature] {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(InvalidPipelineConfig(format!(
                    "temperature must be between 0 and 2, got {temperature}"
                )));
            }
        }

        if self.max_tokens == 0 {
            return Err(InvalidPipelineConfig(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for PipelineConfig
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    classifier_model: Option<String>,
    explainer_model: Option<String>,
    classifier_temperature: Option<f32>,
    explainer_temperature: Option<f32>,
    max_tokens: Option<usize>,
    valuation_threshold: Option<f64>,
}

impl PipelineConfigBuilder {
    /// Use the same model for both LLM stages
    pub fn model(self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.classifier_model(model.clone()).explainer_model(model)
    }

    pub fn classifier_model(mut self, model: impl Into<String>) -> Self {
        self.classifier_model = Some(model.into());
        self
    }

    pub fn explainer_model(mut self, model: impl Into<String>) -> Self {
        self.explainer_model = Some(model.into());
        self
    }

    pub fn classifier_temperature(mut self, temperature: f32) -> Self {
        self.classifier_temperature = Some(temperature);
        self
    }

    pub fn explainer_temperature(mut self, temperature: f32) -> Self {
        self.explainer_temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn valuation_threshold(mut self, threshold: f64) -> Self {
        self.valuation_threshold = Some(threshold);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<PipelineConfig, InvalidPipelineConfig> {
        let defaults = PipelineConfig::default();

        let config = PipelineConfig {
            classifier_model: self.classifier_model.unwrap_or(defaults.classifier_model),
            explainer_model: self.explainer_model.unwrap_or(defaults.explainer_model),
            classifier_temperature: self
                .classifier_temperature
                .unwrap_or(defaults.classifier_temperature),
            explainer_temperature: self
                .explainer_temperature
                .unwrap_or(defaults.explainer_temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            valuation_threshold: self
                .valuation_threshold
                .unwrap_or(defaults.valuation_threshold),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.classifier_model, "gpt-4.1-mini");
        assert_eq!(config.classifier_temperature, 0.2);
        assert_eq!(config.explainer_temperature, 0.3);
        assert_eq!(config.valuation_threshold, 0.15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::builder()
            .model("llama-3.1-8b")
            .valuation_threshold(0.2)
            .max_tokens(600)
            .build()
            .unwrap();

        assert_eq!(config.classifier_model, "llama-3.1-8b");
        assert_eq!(config.explainer_model, "llama-3.1-8b");
        assert_eq!(config.valuation_threshold, 0.2);
        assert_eq!(config.max_tokens, 600);
    }

    #[test]
    fn test_threshold_validation() {
        for threshold in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let result = PipelineConfig::builder()
                .valuation_threshold(threshold)
                .build();
            assert!(result.is_err(), "threshold {threshold} should be rejected");
        }
    }

    #[test]
    fn test_empty_model_rejected() {
        assert!(PipelineConfig::builder().explainer_model(" ").build().is_err());
    }

    #[test]
    fn test_temperature_range() {
        assert!(PipelineConfig::builder()
            .classifier_temperature(2.5)
            .build()
            .is_err());
    }
}
