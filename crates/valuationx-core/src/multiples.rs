//! Multiple derivation: raw provider metrics to derived valuation metrics
//!
//! Every computed field goes through [`safe_ratio`]; every other field is a
//! pass-through. A missing input yields a missing output, never an error.

use crate::schema::{SectorDerivedMetrics, SectorRawMetrics, StockDerivedMetrics, StockRawMetrics};

/// Divide `numerator` by `denominator`, or `None` if either is missing or
/// the denominator is zero
pub fn safe_ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// Derive valuation, yield, profitability, growth and dividend metrics for a stock
pub fn derive_stock_multiples(raw: &StockRawMetrics) -> StockDerivedMetrics {
    StockDerivedMetrics {
        ticker: raw.ticker.clone(),

        // Valuation
        pe_ratio: raw.pe_ratio,
        forward_pe: raw.forward_pe,
        price_to_book: raw.price_to_book,
        ev_to_ebitda: raw.ev_to_ebitda,

        // Yield-style
        fcf_yield: safe_ratio(raw.free_cash_flow, raw.market_cap),
        earnings_yield: safe_ratio(Some(1.0), raw.pe_ratio),

        // Profitability
        return_on_equity: raw.return_on_equity,
        operating_margin: raw.operating_margin,

        // Growth
        revenue_growth: raw.revenue_growth,
        earnings_growth: raw.earnings_growth,

        // Dividend
        dividend_yield: raw.dividend_yield,
        payout_ratio: raw.payout_ratio,
    }
}

/// Derive valuation, yield, growth and dividend metrics for a sector ETF
///
/// Sector cash flow is not reported at ETF level, so there is no FCF yield.
pub fn derive_sector_multiples(raw: &SectorRawMetrics) -> SectorDerivedMetrics {
    SectorDerivedMetrics {
        etf_ticker: raw.etf_ticker.clone(),
        sector_name: raw.sector_name.clone(),

        pe_ratio: raw.pe_ratio,
        forward_pe: raw.forward_pe,
        price_to_book: raw.price_to_book,
        ev_to_ebitda: raw.ev_to_ebitda,

        earnings_yield: safe_ratio(Some(1.0), raw.pe_ratio),

        revenue_growth: raw.revenue_growth,
        earnings_growth: raw.earnings_growth,

        dividend_yield: raw.dividend_yield,
        payout_ratio: raw.payout_ratio,
    }
}
