//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Benchmark a stock's valuation multiples against its sector ETF
#[derive(Debug, Parser)]
#[command(name = "valuationx", version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Path to a JSON config file (default: ./valuationx.json if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true, default_value_t = false)]
    pub json_logs: bool,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify, compare and explain a stock against its sector
    Analyze {
        /// Stock ticker, e.g. XOM
        ticker: String,

        /// Company name given to the classifier (defaults to the ticker)
        #[arg(long)]
        name: Option<String>,

        /// Business description given to the classifier
        #[arg(long)]
        description: Option<String>,
    },

    /// Compare a stock against an explicit sector ETF, without the LLM
    Compare {
        /// Stock ticker, e.g. XOM
        ticker: String,

        /// Sector ETF ticker, e.g. XLE
        etf: String,
    },

    /// Fetch derived metrics for all eleven sector ETFs
    Sectors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "valuationx",
            "analyze",
            "XOM",
            "--name",
            "Exxon Mobil",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Analyze {
                ticker,
                name,
                description,
            } => {
                assert_eq!(ticker, "XOM");
                assert_eq!(name.as_deref(), Some("Exxon Mobil"));
                assert_eq!(description, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_compare() {
        let cli = Cli::try_parse_from(["valuationx", "compare", "AAPL", "XLK"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Table);
        assert!(matches!(
            cli.command,
            Command::Compare { ref ticker, ref etf } if ticker == "AAPL" && etf == "XLK"
        ));
    }

    #[test]
    fn test_compare_requires_etf() {
        assert!(Cli::try_parse_from(["valuationx", "compare", "AAPL"]).is_err());
    }
}
