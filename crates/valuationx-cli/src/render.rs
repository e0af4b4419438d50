//! Table and JSON rendering of pipeline results

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};
use serde_json::{Value, json};
use std::fmt::Display;
use valuationx_core::{
    FieldKind, MetricField, Result, SECTOR_DERIVED_FIELDS, SectorDerivedMetrics, SectorEtf,
    SectorSelection, ValuationExplanation,
};
use valuationx_pipeline::{SectorComparison, ValuationReport};

const MISSING: &str = "-";

fn ratio(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.2}"))
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{:.1}%", v * 100.0))
}

fn signed_percent(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{:+.1}%", v * 100.0))
}

fn label<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

/// Multiples print as plain ratios, everything else is a fraction
fn metric_value(field: MetricField, value: Option<f64>) -> String {
    match field {
        MetricField::PeRatio
        | MetricField::ForwardPe
        | MetricField::PriceToBook
        | MetricField::EvToEbitda => ratio(value),
        _ => percent(value),
    }
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(header.iter().map(Cell::new));
    table
}

/// A stock field, the sector field it is measured against, and the outcome
struct ComparisonRow {
    stock_field: MetricField,
    sector_field: MetricField,
    diff_pct: Option<f64>,
    signal: String,
}

impl ComparisonRow {
    fn new(stock_field: MetricField, sector_field: MetricField, signal: String) -> Self {
        Self {
            stock_field,
            sector_field,
            diff_pct: None,
            signal,
        }
    }

    fn with_diff(mut self, diff_pct: Option<f64>) -> Self {
        self.diff_pct = diff_pct;
        self
    }

    fn title(&self) -> String {
        if self.stock_field == self.sector_field {
            self.stock_field.label().to_string()
        } else {
            format!(
                "{} (vs sector {})",
                self.stock_field.label(),
                self.sector_field.label()
            )
        }
    }
}

/// Side-by-side stock and sector metrics with the normalized signals
pub fn comparison_table(result: &SectorComparison) -> Table {
    let stock = &result.stock_metrics;
    let sector = &result.sector_metrics;
    let cmp = &result.comparison;

    let stock_name = cmp.ticker.as_deref().unwrap_or("Stock");
    let sector_name = cmp.sector_etf.as_deref().unwrap_or("Sector");

    let rows = [
        ComparisonRow::new(MetricField::PeRatio, MetricField::PeRatio, label(cmp.pe_signal))
            .with_diff(cmp.pe_diff_pct),
        ComparisonRow::new(
            MetricField::EvToEbitda,
            MetricField::EvToEbitda,
            label(cmp.ev_ebitda_signal),
        )
        .with_diff(cmp.ev_ebitda_diff_pct),
        ComparisonRow::new(
            MetricField::FcfYield,
            MetricField::EarningsYield,
            label(cmp.fcf_yield_vs_sector),
        ),
        ComparisonRow::new(
            MetricField::DividendYield,
            MetricField::DividendYield,
            label(cmp.dividend_yield_vs_sector),
        ),
        ComparisonRow::new(
            MetricField::RevenueGrowth,
            MetricField::RevenueGrowth,
            label(cmp.revenue_growth_vs_sector),
        ),
        ComparisonRow::new(
            MetricField::EarningsGrowth,
            MetricField::EarningsGrowth,
            label(cmp.earnings_growth_vs_sector),
        ),
        // The sector record has no operating margin, so its column stays empty
        ComparisonRow::new(
            MetricField::OperatingMargin,
            MetricField::OperatingMargin,
            label(cmp.operating_margin_vs_sector),
        ),
    ];

    let mut table = new_table(&["Metric", stock_name, sector_name, "Difference", "Signal"]);
    for row in rows {
        table.add_row(vec![
            row.title(),
            metric_value(row.stock_field, stock.numeric(row.stock_field)),
            metric_value(row.sector_field, sector.numeric(row.sector_field)),
            signed_percent(row.diff_pct),
            row.signal,
        ]);
    }
    table
}

fn selection_text(selection: &SectorSelection) -> String {
    let name = SectorEtf::sector_name_for(&selection.primary_etf).unwrap_or("unrecognized sector");
    let mut text = format!("Sector ETF: {} ({name})", selection.primary_etf);
    if let Some(secondary) = &selection.secondary_etf {
        text.push_str(&format!(", secondary {secondary}"));
    }
    text.push_str(&format!("\nRationale: {}", selection.rationale));
    text
}

fn explanation_text(explanation: &ValuationExplanation) -> String {
    format!(
        "Classification: {}\n\nSummary:\n{}\n\nKey drivers:\n{}\n\nRisk factors:\n{}",
        explanation.classification,
        explanation.valuation_summary,
        explanation.key_drivers,
        explanation.risk_factors
    )
}

/// Human-readable full report
pub fn report_text(report: &ValuationReport) -> String {
    let comparison = SectorComparison {
        stock_metrics: report.stock_metrics.clone(),
        sector_metrics: report.sector_metrics.clone(),
        comparison: report.comparison.clone(),
    };
    format!(
        "{}\n\n{}\n\n{}",
        selection_text(&report.sector_selection),
        comparison_table(&comparison),
        explanation_text(&report.explanation)
    )
}

/// One row per sector ETF; failures show the error in place
pub fn sectors_table(results: &[(SectorEtf, Result<SectorDerivedMetrics>)]) -> Table {
    let columns: Vec<MetricField> = SECTOR_DERIVED_FIELDS
        .iter()
        .copied()
        .filter(|field| field.kind() == FieldKind::Numeric)
        .collect();

    let mut header = vec!["ETF", "Sector"];
    header.extend(columns.iter().map(|field| field.label()));
    header.push("Status");
    let mut table = new_table(&header);

    for (etf, result) in results {
        let mut row = vec![etf.code().to_string(), etf.sector_name().to_string()];
        match result {
            Ok(metrics) => {
                row.extend(
                    columns
                        .iter()
                        .map(|&field| metric_value(field, metrics.numeric(field))),
                );
                row.push("ok".to_string());
            }
            Err(e) => {
                row.extend(std::iter::repeat_n(MISSING.to_string(), columns.len()));
                row.push(e.to_string());
            }
        }
        table.add_row(row);
    }
    table
}

/// JSON array for the sector sweep
pub fn sectors_json(results: &[(SectorEtf, Result<SectorDerivedMetrics>)]) -> Value {
    results
        .iter()
        .map(|(etf, result)| match result {
            Ok(metrics) => json!({ "etf": etf, "metrics": metrics }),
            Err(e) => json!({
                "etf": etf,
                "error": { "kind": e.kind(), "message": e.to_string() }
            }),
        })
        .collect()
}
