//! Analyzer contract.
//!
//! - `result`: the tagged result of one exchange (`AnalyzeResult`)
//! - `analyzer`: the `Analyzer` trait implemented by transport crates

mod analyzer;
mod result;

pub use analyzer::Analyzer;
pub use result::{AnalysisReply, AnalysisStatus, AnalyzeResult};
