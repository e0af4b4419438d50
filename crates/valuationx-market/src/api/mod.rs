//! Yahoo Finance API access

pub mod quote_summary;
pub mod yahoo;

pub use quote_summary::{MODULES, SummaryFields};
pub use yahoo::YahooClient;
