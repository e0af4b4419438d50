//! [`MetricsFetcher`] backed by Yahoo Finance

use crate::api::{SummaryFields, YahooClient};
use crate::config::MarketConfig;
use crate::error::Result;
use async_trait::async_trait;
use tracing::{info, instrument};
use valuationx_core::{MetricsFetcher, SectorEtf, SectorRawMetrics, StockRawMetrics};

/// Map quoteSummary fields onto a stock record
pub fn stock_metrics_from_summary(ticker: &str, fields: &SummaryFields) -> StockRawMetrics {
    StockRawMetrics {
        ticker: Some(ticker.trim().to_uppercase()),
        company_name: fields.text("longName"),

        market_cap: fields.number("marketCap"),
        enterprise_value: fields.number("enterpriseValue"),
        shares_outstanding: fields.number("sharesOutstanding"),

        pe_ratio: fields.number("trailingPE"),
        forward_pe: fields.number("forwardPE"),
        price_to_book: fields.number("priceToBook"),
        ev_to_ebitda: fields.number("enterpriseToEbitda"),

        profit_margin: fields.number("profitMargins"),
        operating_margin: fields.number("operatingMargins"),
        return_on_equity: fields.number("returnOnEquity"),
        return_on_assets: fields.number("returnOnAssets"),

        revenue_growth: fields.number("revenueGrowth"),
        earnings_growth: fields.number("earningsGrowth"),

        free_cash_flow: fields.number("freeCashflow"),
        operating_cash_flow: fields.number("operatingCashflow"),

        dividend_yield: fields.number("dividendYield"),
        payout_ratio: fields.number("payoutRatio"),

        sector: fields.text("sector"),
        industry: fields.text("industry"),
    }
}

/// Map quoteSummary fields onto a sector ETF record
///
/// The sector name comes from the ETF universe, not from Yahoo.
pub fn sector_metrics_from_summary(etf_ticker: &str, fields: &SummaryFields) -> SectorRawMetrics {
    let code = etf_ticker.trim().to_uppercase();
    SectorRawMetrics {
        sector_name: SectorEtf::sector_name_for(&code).map(str::to_string),
        etf_ticker: Some(code),

        market_cap: fields.number("marketCap"),
        enterprise_value: fields.number("enterpriseValue"),

        pe_ratio: fields.number("trailingPE"),
        forward_pe: fields.number("forwardPE"),
        price_to_book: fields.number("priceToBook"),
        ev_to_ebitda: fields.number("enterpriseToEbitda"),

        dividend_yield: fields.number("dividendYield"),
        payout_ratio: fields.number("payoutRatio"),

        revenue_growth: fields.number("revenueGrowth"),
        earnings_growth: fields.number("earningsGrowth"),
    }
}

/// Fetches raw stock and sector metrics from Yahoo Finance
#[derive(Debug)]
pub struct YahooMetricsFetcher {
    client: YahooClient,
}

impl YahooMetricsFetcher {
    pub fn new(client: YahooClient) -> Self {
        Self { client }
    }

    pub fn with_config(config: MarketConfig) -> Result<Self> {
        Ok(Self::new(YahooClient::with_config(config)?))
    }

    pub fn client(&self) -> &YahooClient {
        &self.client
    }
}

#[async_trait]
impl MetricsFetcher for YahooMetricsFetcher {
    #[instrument(skip(self))]
    async fn fetch_stock_raw(&self, ticker: &str) -> valuationx_core::Result<StockRawMetrics> {
        let fields = self.client.quote_summary(ticker).await?;
        info!(fields = fields.len(), "Fetched stock metrics");
        Ok(stock_metrics_from_summary(ticker, &fields))
    }

    #[instrument(skip(self))]
    async fn fetch_sector_raw(
        &self,
        etf_ticker: &str,
    ) -> valuationx_core::Result<SectorRawMetrics> {
        let fields = self.client.quote_summary(etf_ticker).await?;
        info!(fields = fields.len(), "Fetched sector ETF metrics");
        Ok(sector_metrics_from_summary(etf_ticker, &fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::quote_summary::fixtures;
    use valuationx_core::ValuationError;

    #[test]
    fn test_stock_mapping() {
        let fields = SummaryFields::parse("XOM", fixtures::XOM).unwrap();
        let raw = stock_metrics_from_summary("xom", &fields);

        assert_eq!(raw.ticker.as_deref(), Some("XOM"));
        assert_eq!(raw.company_name.as_deref(), Some("Exxon Mobil Corporation"));
        assert_eq!(raw.market_cap, Some(480_000_000_000.0));
        assert_eq!(raw.enterprise_value, Some(500_000_000_000.0));
        assert_eq!(raw.shares_outstanding, Some(4_000_000_000.0));
        assert_eq!(raw.pe_ratio, Some(12.5));
        assert_eq!(raw.forward_pe, Some(11.2));
        assert_eq!(raw.price_to_book, Some(2.1));
        assert_eq!(raw.ev_to_ebitda, Some(6.4));
        assert_eq!(raw.profit_margin, Some(0.1));
        assert_eq!(raw.operating_margin, Some(0.15));
        assert_eq!(raw.return_on_equity, Some(0.18));
        assert_eq!(raw.return_on_assets, Some(0.08));
        assert_eq!(raw.revenue_growth, Some(0.04));
        assert_eq!(raw.earnings_growth, Some(-0.02));
        assert_eq!(raw.free_cash_flow, Some(36_000_000_000.0));
        assert_eq!(raw.operating_cash_flow, Some(55_000_000_000.0));
        assert_eq!(raw.dividend_yield, Some(0.034));
        assert_eq!(raw.payout_ratio, Some(0.42));
        assert_eq!(raw.sector.as_deref(), Some("Energy"));
        assert_eq!(raw.industry.as_deref(), Some("Oil & Gas Integrated"));
    }

    #[test]
    fn test_sector_mapping() {
        let fields = SummaryFields::parse("XLE", fixtures::XLE).unwrap();
        let raw = sector_metrics_from_summary(" xle", &fields);

        assert_eq!(raw.etf_ticker.as_deref(), Some("XLE"));
        assert_eq!(raw.sector_name.as_deref(), Some("Energy"));
        assert_eq!(raw.pe_ratio, Some(14.0));
        assert_eq!(raw.price_to_book, Some(2.0));
        assert_eq!(raw.market_cap, None);
        assert_eq!(raw.dividend_yield, None);
        assert_eq!(raw.ev_to_ebitda, None);
    }

    #[test]
    fn test_unrecognized_etf_has_no_sector_name() {
        let fields = SummaryFields::parse("XLE", fixtures::XLE).unwrap();
        let raw = sector_metrics_from_summary("SPY", &fields);
        assert_eq!(raw.etf_ticker.as_deref(), Some("SPY"));
        assert_eq!(raw.sector_name, None);
    }

    #[test]
    fn test_mapping_feeds_derivation() {
        let fields = SummaryFields::parse("XOM", fixtures::XOM).unwrap();
        let derived = valuationx_core::derive_stock_multiples(&stock_metrics_from_summary(
            "XOM", &fields,
        ));
        assert_eq!(derived.fcf_yield, Some(36.0 / 480.0));
        assert_eq!(derived.earnings_yield, Some(1.0 / 12.5));
    }

    #[tokio::test]
    async fn test_blank_ticker_maps_to_not_found() {
        let fetcher = YahooMetricsFetcher::with_config(MarketConfig::default()).unwrap();
        let err = fetcher.fetch_stock_raw("").await.unwrap_err();
        assert!(matches!(err, ValuationError::NotFound(_)));
    }

    #[tokio::test]
    #[ignore = "requires network access to Yahoo Finance"]
    async fn test_live_fetch_sector() {
        let fetcher = YahooMetricsFetcher::with_config(MarketConfig::default()).unwrap();
        let raw = fetcher.fetch_sector_raw("XLE").await.unwrap();
        assert_eq!(raw.sector_name.as_deref(), Some("Energy"));
    }

    #[tokio::test]
    #[ignore = "requires network access to Yahoo Finance"]
    async fn test_live_unknown_ticker() {
        let fetcher = YahooMetricsFetcher::with_config(MarketConfig::default()).unwrap();
        let err = fetcher.fetch_stock_raw("ZZZZZZZZ").await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }
}
