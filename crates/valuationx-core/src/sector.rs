//! The recognized sector-ETF universe (SPDR Select Sector ETFs)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the eleven Select Sector SPDR ETFs used as benchmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectorEtf {
    #[serde(rename = "XLC")]
    CommunicationServices,
    #[serde(rename = "XLY")]
    ConsumerDiscretionary,
    #[serde(rename = "XLP")]
    ConsumerStaples,
    #[serde(rename = "XLE")]
    Energy,
    #[serde(rename = "XLF")]
    Financials,
    #[serde(rename = "XLV")]
    HealthCare,
    #[serde(rename = "XLI")]
    Industrials,
    #[serde(rename = "XLB")]
    Materials,
    #[serde(rename = "XLRE")]
    RealEstate,
    #[serde(rename = "XLK")]
    Technology,
    #[serde(rename = "XLU")]
    Utilities,
}

impl SectorEtf {
    /// All eleven ETFs in the order they are offered to the classifier
    pub const ALL: [SectorEtf; 11] = [
        SectorEtf::CommunicationServices,
        SectorEtf::ConsumerDiscretionary,
        SectorEtf::ConsumerStaples,
        SectorEtf::Energy,
        SectorEtf::Financials,
        SectorEtf::HealthCare,
        SectorEtf::Industrials,
        SectorEtf::Materials,
        SectorEtf::RealEstate,
        SectorEtf::Technology,
        SectorEtf::Utilities,
    ];

    /// ETF ticker code
    pub fn code(self) -> &'static str {
        match self {
            SectorEtf::CommunicationServices => "XLC",
            SectorEtf::ConsumerDiscretionary => "XLY",
            SectorEtf::ConsumerStaples => "XLP",
            SectorEtf::Energy => "XLE",
            SectorEtf::Financials => "XLF",
            SectorEtf::HealthCare => "XLV",
            SectorEtf::Industrials => "XLI",
            SectorEtf::Materials => "XLB",
            SectorEtf::RealEstate => "XLRE",
            SectorEtf::Technology => "XLK",
            SectorEtf::Utilities => "XLU",
        }
    }

    /// Sector name the ETF tracks
    pub fn sector_name(self) -> &'static str {
        match self {
            SectorEtf::CommunicationServices => "Communication Services",
            SectorEtf::ConsumerDiscretionary => "Consumer Discretionary",
            SectorEtf::ConsumerStaples => "Consumer Staples",
            SectorEtf::Energy => "Energy",
            SectorEtf::Financials => "Financials",
            SectorEtf::HealthCare => "Health Care",
            SectorEtf::Industrials => "Industrials",
            SectorEtf::Materials => "Materials",
            SectorEtf::RealEstate => "Real Estate",
            SectorEtf::Technology => "Technology",
            SectorEtf::Utilities => "Utilities",
        }
    }

    /// Look up an ETF by ticker code, ignoring case and surrounding whitespace
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|etf| etf.code().eq_ignore_ascii_case(code))
    }

    /// Sector name for a ticker code, if the code is recognized
    pub fn sector_name_for(code: &str) -> Option<&'static str> {
        Self::from_code(code).map(SectorEtf::sector_name)
    }

    /// `{code: sector name}` map, as offered to the classifier
    pub fn universe_json() -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = Self::ALL
            .into_iter()
            .map(|etf| (etf.code().to_string(), etf.sector_name().into()))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl fmt::Display for SectorEtf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unrecognized ETF code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognized sector ETF: {0}")]
pub struct UnknownSectorEtf(pub String);

impl FromStr for SectorEtf {
    type Err = UnknownSectorEtf;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownSectorEtf(s.to_string()))
    }
}
