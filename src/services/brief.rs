use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::BriefConfig;
use crate::services::brief_assembler::{Brief, BriefAssembler};
use crate::services::chunk_planner;
use crate::services::length_policy::SummaryLength;
use crate::services::pdf::{ExtractedText, ExtractionError, TextExtractor};
use crate::services::summarizer::{Summarizer, SummarizerError};

pub const EMPTY_CONTENT_WARNING: &str = "No readable text found in the PDF.";

#[derive(Debug, thiserror::Error)]
pub enum BriefError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Summarization(#[from] SummarizerError),
}

#[derive(Debug)]
pub enum BriefOutcome {
    Ready { id: Uuid, brief: Brief },
    /// Extraction worked but no page had text; nothing was summarized.
    Empty { id: Uuid },
}

/// Runs one upload through extract, plan, summarize and join.
pub struct BriefService {
    extractor: Arc<dyn TextExtractor>,
    summarizer: Arc<dyn Summarizer>,
    assembler: BriefAssembler,
    prompt_prefix: String,
    chunk_width: usize,
}

impl BriefService {
    pub fn new(
        config: &BriefConfig,
        extractor: Arc<dyn TextExtractor>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            extractor,
            assembler: BriefAssembler::new(summarizer.clone(), config.max_chunks_per_brief),
            summarizer,
            prompt_prefix: config.prompt_prefix.clone(),
            chunk_width: config.chunk_width,
        }
    }

    pub fn summarizer_name(&self) -> String {
        self.summarizer.name()
    }

    pub async fn generate(
        &self,
        bytes: Vec<u8>,
        length: SummaryLength,
    ) -> Result<BriefOutcome, BriefError> {
        let id = Uuid::new_v4();
        let span = tracing::info_span!("brief", brief_id = %id, length = length.label());
        self.run(id, bytes, length).instrument(span).await
    }

    async fn run(
        &self,
        id: Uuid,
        bytes: Vec<u8>,
        length: SummaryLength,
    ) -> Result<BriefOutcome, BriefError> {
        let text = ExtractedText::from_pages(self.extractor.extract_pages(bytes).await?);
        if text.is_empty() {
            tracing::warn!("{EMPTY_CONTENT_WARNING}");
            return Ok(BriefOutcome::Empty { id });
        }
        tracing::info!("Text extracted from {} page(s)", text.pages().len());

        let chunks = chunk_planner::plan(&self.prompt_prefix, &text.body(), self.chunk_width);
        tracing::info!(
            "Planned {} chunk(s), summarizing up to {}",
            chunks.len(),
            self.assembler.max_chunks_per_brief()
        );

        let brief = self.assembler.assemble(&chunks, length.bounds()).await?;
        tracing::info!("Brief ready ({} chars)", brief.text.len());

        Ok(BriefOutcome::Ready { id, brief })
    }
}
