//! Relative normalization of stock metrics against sector metrics
//!
//! Every comparison is total: any missing operand produces a missing result,
//! so normalization never fails regardless of upstream data completeness.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::schema::{SectorDerivedMetrics, StockDerivedMetrics};

/// Default band around zero inside which a multiple is "in line"
pub const DEFAULT_VALUATION_THRESHOLD: f64 = 0.15;

/// Categorical reading of a percent difference between multiples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValuationSignal {
    #[serde(rename = "Significantly Cheaper")]
    SignificantlyCheaper,
    #[serde(rename = "Significantly More Expensive")]
    SignificantlyMoreExpensive,
    #[serde(rename = "In Line with Sector")]
    InLineWithSector,
}

impl ValuationSignal {
    pub fn label(self) -> &'static str {
        match self {
            Self::SignificantlyCheaper => "Significantly Cheaper",
            Self::SignificantlyMoreExpensive => "Significantly More Expensive",
            Self::InLineWithSector => "In Line with Sector",
        }
    }
}

impl fmt::Display for ValuationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Categorical reading of a higher-is-better style comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualitySignal {
    #[serde(rename = "Above Sector")]
    AboveSector,
    #[serde(rename = "Below Sector")]
    BelowSector,
    #[serde(rename = "In Line with Sector")]
    InLineWithSector,
}

impl QualitySignal {
    pub fn label(self) -> &'static str {
        match self {
            Self::AboveSector => "Above Sector",
            Self::BelowSector => "Below Sector",
            Self::InLineWithSector => "In Line with Sector",
        }
    }
}

impl fmt::Display for QualitySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Relative deviation of `stock_value` from `sector_value`
///
/// Negative means the stock's value is below the sector's. Missing if either
/// operand is missing or the sector value is zero.
pub fn percent_diff(stock_value: Option<f64>, sector_value: Option<f64>) -> Option<f64> {
    match (stock_value, sector_value) {
        (Some(stock), Some(sector)) if sector != 0.0 => Some((stock - sector) / sector),
        _ => None,
    }
}

/// Bucket a percent difference at `±threshold`
///
/// The outer buckets are closed: exactly `-threshold` is cheaper and exactly
/// `threshold` is more expensive.
pub fn valuation_signal(pct_diff: Option<f64>, threshold: f64) -> Option<ValuationSignal> {
    let pct = pct_diff?;
    Some(if pct <= -threshold {
        ValuationSignal::SignificantlyCheaper
    } else if pct >= threshold {
        ValuationSignal::SignificantlyMoreExpensive
    } else {
        ValuationSignal::InLineWithSector
    })
}

/// Compare a stock value with a sector value directly
pub fn quality_signal(
    stock_value: Option<f64>,
    sector_value: Option<f64>,
) -> Option<QualitySignal> {
    let (stock, sector) = (stock_value?, sector_value?);
    Some(if stock > sector {
        QualitySignal::AboveSector
    } else if stock < sector {
        QualitySignal::BelowSector
    } else {
        QualitySignal::InLineWithSector
    })
}

/// Normalized comparison of one stock against one sector ETF
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonResult {
    pub ticker: Option<String>,
    pub sector_etf: Option<String>,
    pub sector_name: Option<String>,

    // Valuation
    pub pe_diff_pct: Option<f64>,
    pub pe_signal: Option<ValuationSignal>,
    pub ev_ebitda_diff_pct: Option<f64>,
    pub ev_ebitda_signal: Option<ValuationSignal>,

    // Yield
    pub fcf_yield_vs_sector: Option<QualitySignal>,
    pub dividend_yield_vs_sector: Option<QualitySignal>,

    // Growth
    pub revenue_growth_vs_sector: Option<QualitySignal>,
    pub earnings_growth_vs_sector: Option<QualitySignal>,

    // Quality
    pub operating_margin_vs_sector: Option<QualitySignal>,
}

/// Produces a [`ComparisonResult`] from a stock/sector pair of derived metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeNormalizer {
    threshold: f64,
}

impl Default for RelativeNormalizer {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_VALUATION_THRESHOLD,
        }
    }
}

impl RelativeNormalizer {
    /// Create a normalizer with a custom valuation threshold
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Valuation threshold used for the P/E and EV/EBITDA signals
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compare a stock's derived metrics against its sector's
    pub fn normalize(
        &self,
        stock: &StockDerivedMetrics,
        sector: &SectorDerivedMetrics,
    ) -> ComparisonResult {
        let pe_diff_pct = percent_diff(stock.pe_ratio, sector.pe_ratio);
        let ev_ebitda_diff_pct = percent_diff(stock.ev_to_ebitda, sector.ev_to_ebitda);

        ComparisonResult {
            ticker: stock.ticker.clone(),
            sector_etf: sector.etf_ticker.clone(),
            sector_name: sector.sector_name.clone(),

            pe_diff_pct,
            pe_signal: valuation_signal(pe_diff_pct, self.threshold),
            ev_ebitda_diff_pct,
            ev_ebitda_signal: valuation_signal(ev_ebitda_diff_pct, self.threshold),

            // No sector FCF yield exists; sector earnings yield is the closest
            // cash-return proxy. Known approximation, kept as-is.
            fcf_yield_vs_sector: quality_signal(stock.fcf_yield, sector.earnings_yield),
            dividend_yield_vs_sector: quality_signal(stock.dividend_yield, sector.dividend_yield),

            revenue_growth_vs_sector: quality_signal(stock.revenue_growth, sector.revenue_growth),
            earnings_growth_vs_sector: quality_signal(
                stock.earnings_growth,
                sector.earnings_growth,
            ),

            // ETF-aggregate margins are not a usable proxy for one company
            operating_margin_vs_sector: quality_signal(stock.operating_margin, None),
        }
    }
}

/// Compare with the default threshold
pub fn normalize_relative_valuation(
    stock: &StockDerivedMetrics,
    sector: &SectorDerivedMetrics,
) -> ComparisonResult {
    RelativeNormalizer::default().normalize(stock, sector)
}
