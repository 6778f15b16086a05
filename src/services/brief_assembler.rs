use std::sync::Arc;

use serde::Serialize;

use crate::services::length_policy::LengthBounds;
use crate::services::summarizer::{Summarizer, SummarizerError};

pub const FRAGMENT_SEPARATOR: &str = "\n\n";

/// The assembled summary plus how much of the document it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Brief {
    pub text: String,
    pub chunks_total: usize,
    pub chunks_summarized: usize,
    /// Chunks past the per-brief cap; never sent to the summarizer.
    pub chunks_omitted: usize,
}

impl Brief {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

pub struct BriefAssembler {
    summarizer: Arc<dyn Summarizer>,
    max_chunks_per_brief: usize,
}

impl BriefAssembler {
    pub fn new(summarizer: Arc<dyn Summarizer>, max_chunks_per_brief: usize) -> Self {
        Self {
            summarizer,
            max_chunks_per_brief,
        }
    }

    pub fn max_chunks_per_brief(&self) -> usize {
        self.max_chunks_per_brief
    }

    /// Summarizes the leading chunks one at a time, in order, and joins the
    /// fragments with a blank line. The first summarizer error aborts the brief.
    pub async fn assemble(
        &self,
        chunks: &[String],
        bounds: LengthBounds,
    ) -> Result<Brief, SummarizerError> {
        let selected = &chunks[..chunks.len().min(self.max_chunks_per_brief)];
        let omitted = chunks.len() - selected.len();
        if omitted > 0 {
            tracing::warn!(
                "Summarizing {} of {} chunks, {omitted} omitted",
                selected.len(),
                chunks.len()
            );
        }

        let mut fragments = Vec::with_capacity(selected.len());
        for (index, chunk) in selected.iter().enumerate() {
            tracing::info!(
                "Summarizing chunk {}/{} ({} chars)",
                index + 1,
                selected.len(),
                chunk.chars().count()
            );
            let fragment = self.summarizer.summarize(chunk, bounds).await.map_err(|e| {
                tracing::error!("Chunk {} failed, aborting brief: {e}", index + 1);
                e
            })?;
            fragments.push(fragment);
        }

        Ok(Brief {
            text: fragments.join(FRAGMENT_SEPARATOR),
            chunks_total: chunks.len(),
            chunks_summarized: selected.len(),
            chunks_omitted: omitted,
        })
    }
}
