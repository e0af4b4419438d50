//! ValuationX command-line interface
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! valuationx analyze XOM --name "Exxon Mobil" --description "Integrated oil and gas"
//! valuationx compare AAPL XLK --format json
//! valuationx sectors
//! ```

mod cli;
mod render;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, OutputFormat};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use valuationx_core::{ClassificationRequest, MetricsFetcher, RelativeNormalizer};
use valuationx_llm::LLMProvider;
use valuationx_llm::providers::{OpenAIConfig, OpenAIProvider};
use valuationx_market::{MarketConfig, YahooMetricsFetcher};
use valuationx_pipeline::{
    LlmNarrativeExplainer, LlmSectorClassifier, PipelineConfig, SectorComparator, ValuationPipeline,
    benchmark_all_sectors,
};
use valuationx_utils::{AppConfig, LogFormat, init_tracing};

fn market_config(config: &AppConfig) -> anyhow::Result<MarketConfig> {
    let market = MarketConfig::builder()
        .requests_per_minute(config.analysis.yahoo_requests_per_minute)
        .request_timeout(Duration::from_secs(config.analysis.request_timeout_secs))
        .build()?;
    Ok(market)
}

fn pipeline_config(config: &AppConfig) -> anyhow::Result<PipelineConfig> {
    let pipeline = PipelineConfig::builder()
        .classifier_model(&config.llm.classifier_model)
        .explainer_model(&config.llm.explainer_model)
        .max_tokens(config.llm.max_tokens)
        .valuation_threshold(config.analysis.valuation_threshold)
        .build()?;
    Ok(pipeline)
}

fn llm_provider(config: &AppConfig) -> anyhow::Result<OpenAIProvider> {
    let api_key = config
        .llm
        .api_key
        .clone()
        .context("OPENAI_API_KEY is not set and no llm.api_key is configured")?;

    let provider = OpenAIProvider::with_config(
        OpenAIConfig::new(api_key)
            .with_api_base(&config.llm.api_base)
            .with_timeout(config.llm.timeout_secs),
    )?;
    Ok(provider)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_tracing(log_format, if cli.verbose { "debug" } else { "info" });

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!(?config.analysis, "Configuration loaded");

    let fetcher: Arc<dyn MetricsFetcher> =
        Arc::new(YahooMetricsFetcher::with_config(market_config(&config)?)?);
    let pipeline_config = pipeline_config(&config)?;
    let normalizer = RelativeNormalizer::new(pipeline_config.valuation_threshold);

    match cli.command {
        Command::Analyze {
            ticker,
            name,
            description,
        } => {
            let provider: Arc<dyn LLMProvider> = Arc::new(llm_provider(&config)?);
            let pipeline = ValuationPipeline::new(
                Arc::new(LlmSectorClassifier::new(provider.clone(), &pipeline_config)),
                fetcher,
                Arc::new(LlmNarrativeExplainer::new(provider, &pipeline_config)),
            )
            .with_normalizer(normalizer);

            let company_name = name.unwrap_or_else(|| ticker.clone());
            let mut request = ClassificationRequest::new(ticker, company_name);
            if let Some(description) = description {
                request = request.with_description(description);
            }

            info!(ticker = %request.ticker, "Running valuation");
            let report = pipeline
                .analyze(&request)
                .await
                .with_context(|| format!("Valuation of {} failed", request.ticker))?;

            match cli.format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Table => println!("{}", render::report_text(&report)),
            }
        }
        Command::Compare { ticker, etf } => {
            let result = SectorComparator::new(fetcher)
                .with_normalizer(normalizer)
                .compare(&ticker, &etf)
                .await
                .with_context(|| format!("Comparison of {ticker} against {etf} failed"))?;

            match cli.format {
                OutputFormat::Json => print_json(&result)?,
                OutputFormat::Table => println!("{}", render::comparison_table(&result)),
            }
        }
        Command::Sectors => {
            let results = benchmark_all_sectors(fetcher.as_ref()).await;
            match cli.format {
                OutputFormat::Json => print_json(&render::sectors_json(&results))?,
                OutputFormat::Table => println!("{}", render::sectors_table(&results)),
            }
        }
    }

    Ok(())
}
