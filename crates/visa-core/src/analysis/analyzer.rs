//! Trait for analyzer back ends.
//!
//! Implemented by `HttpAnalyzer` in the `visa-interaction` crate. The
//! conversation store only depends on this trait, so tests can swap in
//! scripted analyzers.

use std::sync::Arc;

use crate::conversation::Attachment;
use crate::error::Result;

use super::result::AnalyzeResult;

/// Interprets one user turn and reports visa-relevant status.
///
/// Returning `Err` signals a failure the caller must recover from; the HTTP
/// implementation never does, since it folds transport problems into
/// [`AnalyzeResult::Error`].
#[async_trait::async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, content: &str, file: Option<Arc<Attachment>>) -> Result<AnalyzeResult>;
}

#[async_trait::async_trait]
impl<T: Analyzer + ?Sized> Analyzer for Arc<T> {
    async fn analyze(&self, content: &str, file: Option<Arc<Attachment>>) -> Result<AnalyzeResult> {
        (**self).analyze(content, file).await
    }
}
