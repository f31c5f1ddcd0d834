//! Transport implementations of the analyzer contract.

pub mod http_analyzer;
pub mod wire;

pub use http_analyzer::HttpAnalyzer;
