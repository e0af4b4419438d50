//! Metric schema shared by every pipeline stage
//!
//! The schema names each financial field once, tags it as numeric or
//! identifying, and fixes which fields each record carries. Every field is an
//! `Option`: an absent JSON key and an explicit `null` both deserialize to
//! `None`, and `None` is the only representation of "unknown". Nothing in the
//! pipeline substitutes zero or an empty string for a missing value.

use serde::{Deserialize, Serialize};

/// Semantic type of a metric field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Optional floating point value
    Numeric,
    /// Optional identifying string (ticker, name, sector label)
    Identifier,
}

/// Canonical field names used across raw and derived records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    // Identity
    Ticker,
    CompanyName,
    EtfTicker,
    SectorName,
    Sector,
    Industry,

    // Market data
    MarketCap,
    EnterpriseValue,
    SharesOutstanding,

    // Valuation multiples
    PeRatio,
    ForwardPe,
    PriceToBook,
    EvToEbitda,

    // Profitability
    ProfitMargin,
    OperatingMargin,
    ReturnOnEquity,
    ReturnOnAssets,

    // Growth
    RevenueGrowth,
    EarningsGrowth,

    // Cash flow
    FreeCashFlow,
    OperatingCashFlow,

    // Dividend
    DividendYield,
    PayoutRatio,

    // Yield-style (derived)
    FcfYield,
    EarningsYield,
}

impl MetricField {
    /// Canonical snake_case name, identical to the serialized record key
    pub fn name(self) -> &'static str {
        match self {
            Self::Ticker => "ticker",
            Self::CompanyName => "company_name",
            Self::EtfTicker => "etf_ticker",
            Self::SectorName => "sector_name",
            Self::Sector => "sector",
            Self::Industry => "industry",
            Self::MarketCap => "market_cap",
            Self::EnterpriseValue => "enterprise_value",
            Self::SharesOutstanding => "shares_outstanding",
            Self::PeRatio => "pe_ratio",
            Self::ForwardPe => "forward_pe",
            Self::PriceToBook => "price_to_book",
            Self::EvToEbitda => "ev_to_ebitda",
            Self::ProfitMargin => "profit_margin",
            Self::OperatingMargin => "operating_margin",
            Self::ReturnOnEquity => "return_on_equity",
            Self::ReturnOnAssets => "return_on_assets",
            Self::RevenueGrowth => "revenue_growth",
            Self::EarningsGrowth => "earnings_growth",
            Self::FreeCashFlow => "free_cash_flow",
            Self::OperatingCashFlow => "operating_cash_flow",
            Self::DividendYield => "dividend_yield",
            Self::PayoutRatio => "payout_ratio",
            Self::FcfYield => "fcf_yield",
            Self::EarningsYield => "earnings_yield",
        }
    }

    /// Human-readable label for reports
    pub fn label(self) -> &'static str {
        match self {
            Self::Ticker => "Ticker",
            Self::CompanyName => "Company",
            Self::EtfTicker => "Sector ETF",
            Self::SectorName => "Sector",
            Self::Sector => "Sector (provider)",
            Self::Industry => "Industry",
            Self::MarketCap => "Market Cap",
            Self::EnterpriseValue => "Enterprise Value",
            Self::SharesOutstanding => "Shares Outstanding",
            Self::PeRatio => "P/E",
            Self::ForwardPe => "Forward P/E",
            Self::PriceToBook => "Price/Book",
            Self::EvToEbitda => "EV/EBITDA",
            Self::ProfitMargin => "Profit Margin",
            Self::OperatingMargin => "Operating Margin",
            Self::ReturnOnEquity => "Return on Equity",
            Self::ReturnOnAssets => "Return on Assets",
            Self::RevenueGrowth => "Revenue Growth",
            Self::EarningsGrowth => "Earnings Growth",
            Self::FreeCashFlow => "Free Cash Flow",
            Self::OperatingCashFlow => "Operating Cash Flow",
            Self::DividendYield => "Dividend Yield",
            Self::PayoutRatio => "Payout Ratio",
            Self::FcfYield => "FCF Yield",
            Self::EarningsYield => "Earnings Yield",
        }
    }

    /// Semantic type of the field
    pub fn kind(self) -> FieldKind {
        match self {
            Self::Ticker
            | Self::CompanyName
            | Self::EtfTicker
            | Self::SectorName
            | Self::Sector
            | Self::Industry => FieldKind::Identifier,
            _ => FieldKind::Numeric,
        }
    }
}

/// Fields carried by [`StockRawMetrics`], in declaration order
pub const STOCK_RAW_FIELDS: &[MetricField] = &[
    MetricField::Ticker,
    MetricField::CompanyName,
    MetricField::MarketCap,
    MetricField::EnterpriseValue,
    MetricField::SharesOutstanding,
    MetricField::PeRatio,
    MetricField::ForwardPe,
    MetricField::PriceToBook,
    MetricField::EvToEbitda,
    MetricField::ProfitMargin,
    MetricField::OperatingMargin,
    MetricField::ReturnOnEquity,
    MetricField::ReturnOnAssets,
    MetricField::RevenueGrowth,
    MetricField::EarningsGrowth,
    MetricField::FreeCashFlow,
    MetricField::OperatingCashFlow,
    MetricField::DividendYield,
    MetricField::PayoutRatio,
    MetricField::Sector,
    MetricField::Industry,
];

/// Fields carried by [`SectorRawMetrics`], in declaration order
pub const SECTOR_RAW_FIELDS: &[MetricField] = &[
    MetricField::EtfTicker,
    MetricField::SectorName,
    MetricField::MarketCap,
    MetricField::EnterpriseValue,
    MetricField::PeRatio,
    MetricField::ForwardPe,
    MetricField::PriceToBook,
    MetricField::EvToEbitda,
    MetricField::DividendYield,
    MetricField::PayoutRatio,
    MetricField::RevenueGrowth,
    MetricField::EarningsGrowth,
];

/// Fields carried by [`StockDerivedMetrics`], in declaration order
pub const STOCK_DERIVED_FIELDS: &[MetricField] = &[
    MetricField::Ticker,
    MetricField::PeRatio,
    MetricField::ForwardPe,
    MetricField::PriceToBook,
    MetricField::EvToEbitda,
    MetricField::FcfYield,
    MetricField::EarningsYield,
    MetricField::ReturnOnEquity,
    MetricField::OperatingMargin,
    MetricField::RevenueGrowth,
    MetricField::EarningsGrowth,
    MetricField::DividendYield,
    MetricField::PayoutRatio,
];

/// Fields carried by [`SectorDerivedMetrics`], in declaration order
pub const SECTOR_DERIVED_FIELDS: &[MetricField] = &[
    MetricField::EtfTicker,
    MetricField::SectorName,
    MetricField::PeRatio,
    MetricField::ForwardPe,
    MetricField::PriceToBook,
    MetricField::EvToEbitda,
    MetricField::EarningsYield,
    MetricField::RevenueGrowth,
    MetricField::EarningsGrowth,
    MetricField::DividendYield,
    MetricField::PayoutRatio,
];

/// Raw provider metrics for a single stock
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockRawMetrics {
    pub ticker: Option<String>,
    pub company_name: Option<String>,

    pub market_cap: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub shares_outstanding: Option<f64>,

    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub ev_to_ebitda: Option<f64>,

    pub profit_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,

    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,

    pub free_cash_flow: Option<f64>,
    pub operating_cash_flow: Option<f64>,

    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,

    pub sector: Option<String>,
    pub industry: Option<String>,
}

/// Raw provider metrics for a sector ETF
///
/// No per-company profitability or cash-flow fields: ETF-level aggregates of
/// those are not reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorRawMetrics {
    pub etf_ticker: Option<String>,
    pub sector_name: Option<String>,

    pub market_cap: Option<f64>,
    pub enterprise_value: Option<f64>,

    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub ev_to_ebitda: Option<f64>,

    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,

    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
}

/// Derived valuation metrics for a stock
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockDerivedMetrics {
    pub ticker: Option<String>,

    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub ev_to_ebitda: Option<f64>,

    pub fcf_yield: Option<f64>,
    pub earnings_yield: Option<f64>,

    pub return_on_equity: Option<f64>,
    pub operating_margin: Option<f64>,

    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,

    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
}

/// Derived valuation metrics for a sector ETF
///
/// Narrower than [`StockDerivedMetrics`]: there is no sector FCF yield,
/// return on equity or operating margin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorDerivedMetrics {
    pub etf_ticker: Option<String>,
    pub sector_name: Option<String>,

    pub pe_ratio: Option<f64>,
    pub forward_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub ev_to_ebitda: Option<f64>,

    pub earnings_yield: Option<f64>,

    pub revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,

    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
}

impl StockDerivedMetrics {
    /// Look up a numeric field by schema name
    ///
    /// Returns `None` both for missing values and for fields this record does
    /// not declare.
    pub fn numeric(&self, field: MetricField) -> Option<f64> {
        match field {
            MetricField::PeRatio => self.pe_ratio,
            MetricField::ForwardPe => self.forward_pe,
            MetricField::PriceToBook => self.price_to_book,
            MetricField::EvToEbitda => self.ev_to_ebitda,
            MetricField::FcfYield => self.fcf_yield,
            MetricField::EarningsYield => self.earnings_yield,
            MetricField::ReturnOnEquity => self.return_on_equity,
            MetricField::OperatingMargin => self.operating_margin,
            MetricField::RevenueGrowth => self.revenue_growth,
            MetricField::EarningsGrowth => self.earnings_growth,
            MetricField::DividendYield => self.dividend_yield,
            MetricField::PayoutRatio => self.payout_ratio,
            _ => None,
        }
    }
}

impl SectorDerivedMetrics {
    /// Look up a numeric field by schema name
    ///
    /// Returns `None` both for missing values and for fields this record does
    /// not declare.
    pub fn numeric(&self, field: MetricField) -> Option<f64> {
        match field {
            MetricField::PeRatio => self.pe_ratio,
            MetricField::ForwardPe => self.forward_pe,
            MetricField::PriceToBook => self.price_to_book,
            MetricField::EvToEbitda => self.ev_to_ebitda,
            MetricField::EarningsYield => self.earnings_yield,
            MetricField::RevenueGrowth => self.revenue_growth,
            MetricField::EarningsGrowth => self.earnings_growth,
            MetricField::DividendYield => self.dividend_yield,
            MetricField::PayoutRatio => self.payout_ratio,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    fn serialized_keys<T: Serialize>(record: &T) -> Vec<String> {
        let value = serde_json::to_value(record).unwrap();
        let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn schema_keys(fields: &[MetricField]) -> Vec<String> {
        let mut keys: Vec<String> = fields.iter().map(|f| f.name().to_string()).collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_record_keys_match_schema() {
        assert_eq!(
            serialized_keys(&StockRawMetrics::default()),
            schema_keys(STOCK_RAW_FIELDS)
        );
        assert_eq!(
            serialized_keys(&SectorRawMetrics::default()),
            schema_keys(SECTOR_RAW_FIELDS)
        );
        assert_eq!(
            serialized_keys(&StockDerivedMetrics::default()),
            schema_keys(STOCK_DERIVED_FIELDS)
        );
        assert_eq!(
            serialized_keys(&SectorDerivedMetrics::default()),
            schema_keys(SECTOR_DERIVED_FIELDS)
        );
    }

    #[test]
    fn test_field_name_matches_serde_name() {
        for field in STOCK_RAW_FIELDS.iter().chain(STOCK_DERIVED_FIELDS) {
            let serialized = serde_json::to_value(field).unwrap();
            assert_eq!(serialized.as_str(), Some(field.name()));
        }
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(MetricField::Ticker.kind(), FieldKind::Identifier);
        assert_eq!(MetricField::SectorName.kind(), FieldKind::Identifier);
        assert_eq!(MetricField::PeRatio.kind(), FieldKind::Numeric);
        assert_eq!(MetricField::FcfYield.kind(), FieldKind::Numeric);
    }

    #[test]
    fn test_absent_and_null_are_both_missing() {
        let absent: StockRawMetrics = serde_json::from_str(r#"{"ticker": "XOM"}"#).unwrap();
        let null: StockRawMetrics =
            serde_json::from_str(r#"{"ticker": "XOM", "pe_ratio": null}"#).unwrap();

        assert_eq!(absent.pe_ratio, None);
        assert_eq!(absent, null);
    }

    #[test]
    fn test_missing_serializes_as_null() {
        let value = serde_json::to_value(SectorDerivedMetrics::default()).unwrap();
        assert!(value["earnings_yield"].is_null());
    }

    #[test]
    fn test_numeric_lookup_respects_record_shape() {
        let stock = StockDerivedMetrics {
            operating_margin: Some(0.2),
            ..Default::default()
        };
        let sector = SectorDerivedMetrics {
            pe_ratio: Some(14.0),
            ..Default::default()
        };

        assert_eq!(stock.numeric(MetricField::OperatingMargin), Some(0.2));
        assert_eq!(sector.numeric(MetricField::PeRatio), Some(14.0));
        // Not part of the sector record
        assert_eq!(sector.numeric(MetricField::OperatingMargin), None);
        assert_eq!(sector.numeric(MetricField::FcfYield), None);
    }
}
