use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{SummarizerBackend, SummarizerConfig};
use crate::services::huggingface::HuggingFaceSummarizer;
use crate::services::length_policy::LengthBounds;
use crate::services::llm_provider::RigSummarizer;

/// A loaded summarization engine.
///
/// Implementations decode deterministically: the same text and bounds always
/// produce the same summary. Errors are returned as-is, never retried.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, SummarizerError>;

    /// Short name for logs and the health endpoint.
    fn name(&self) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    #[error("summarizer request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("summarizer returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("summarizer returned no summary")]
    EmptyResponse,

    #[error("LLM provider error: {0}")]
    Provider(String),
}

/// Builds the process-wide engine handle from configuration.
pub fn from_config(config: &SummarizerConfig) -> Result<Arc<dyn Summarizer>> {
    let summarizer: Arc<dyn Summarizer> = match config.backend {
        SummarizerBackend::Huggingface => Arc::new(HuggingFaceSummarizer::new(config)?),
        SummarizerBackend::Rig => Arc::new(RigSummarizer::new(config)?),
    };
    tracing::info!("Summarizer ready: {}", summarizer.name());
    Ok(summarizer)
}
