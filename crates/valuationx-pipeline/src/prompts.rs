//! Prompt text for the LLM-backed stages
//!
//! System prompts are fixed strings; user prompts are MiniJinja templates
//! that embed pretty-printed JSON of the data the model may use.

use minijinja::{Environment, context};
use serde::Serialize;
use valuationx_core::{
    ClassificationRequest, ComparisonResult, SectorDerivedMetrics, SectorEtf, StockDerivedMetrics,
};

pub const CLASSIFIER_SYSTEM_PROMPT: &str = "\
You are a financial classification assistant.

Your task is to map a public company to the most appropriate
State Street Select Sector SPDR ETF.

Rules:
- Use ONLY the provided list of ETFs.
- Choose ONE primary ETF.
- Optionally choose ONE secondary ETF if justified.
- Do NOT invent financial data.
- Provide a concise rationale grounded in business model and revenue drivers.
- Output MUST be valid JSON.";

pub const EXPLAINER_SYSTEM_PROMPT: &str = "\
You are a financial analyst assistant.

Your role is to interpret relative valuation differences between
a stock and its sector ETF.

Rules:
- Use ONLY the metrics provided.
- Do NOT invent financial data.
- Do NOT provide investment advice.
- Explain potential drivers of valuation differences.
- Highlight risks and justifications.
- Output MUST be valid JSON.";

const CLASSIFY_TEMPLATE: &str = "\
Company Ticker: {{ ticker }}
Company Name: {{ company_name }}

Business Description:
{{ business_description }}

Available Sector ETFs:
{{ etf_universe }}

Respond in JSON with:
- primary_etf
- secondary_etf (or null)
- rationale";

const EXPLAIN_TEMPLATE: &str = "\
Stock Metrics:
{{ stock_metrics }}

Sector ETF Metrics:
{{ sector_metrics }}

Relative Comparison:
{{ comparison }}

Tasks:
1. Explain why the stock trades at a premium or discount vs the sector.
2. Assess whether the valuation difference appears justified.
3. Identify potential risks or structural factors.
4. Classify the situation as one of:
{%- for label in classifications %}
   - \"{{ label }}\"
{%- endfor %}

Respond in JSON with:
- valuation_summary
- key_drivers
- risk_factors
- classification";

/// Errors raised while rendering a prompt
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Render the sector-classification user prompt
pub fn classification_prompt(request: &ClassificationRequest) -> Result<String, PromptError> {
    let etf_universe = serde_json::to_string_pretty(&SectorEtf::universe_json())?;
    render(
        "classify_sector",
        CLASSIFY_TEMPLATE,
        context! {
            ticker => request.ticker,
            company_name => request.company_name,
            business_description => request.business_description.as_deref().unwrap_or_default(),
            etf_universe => etf_universe,
        },
    )
}

/// Render the valuation-explanation user prompt
pub fn explanation_prompt(
    stock: &StockDerivedMetrics,
    sector: &SectorDerivedMetrics,
    comparison: &ComparisonResult,
) -> Result<String, PromptError> {
    let classifications: Vec<&str> = valuationx_core::ValuationClassification::ALL
        .iter()
        .map(|c| c.label())
        .collect();

    render(
        "explain_valuation",
        EXPLAIN_TEMPLATE,
        context! {
            stock_metrics => pretty(stock)?,
            sector_metrics => pretty(sector)?,
            comparison => pretty(comparison)?,
            classifications => classifications,
        },
    )
}

fn pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

fn render(name: &str, source: &str, ctx: minijinja::Value) -> Result<String, PromptError> {
    let mut env = Environment::new();
    env.add_template(name, source)?;
    Ok(env.get_template(name)?.render(ctx)?)
}
