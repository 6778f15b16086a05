use serde::{Deserialize, Serialize};

use crate::services::brief::{BriefOutcome, EMPTY_CONTENT_WARNING};
use crate::services::length_policy::SummaryLength;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum BriefResponse {
    Ready {
        brief_id: String,
        brief: String,
        length: String,
        chunks_total: usize,
        chunks_summarized: usize,
        chunks_omitted: usize,
        generated_at: String,
    },
    /// No page had extractable text. The UI shows the warning and offers no download.
    Empty { brief_id: String, warning: String },
}

impl BriefResponse {
    pub fn from_outcome(outcome: BriefOutcome, length: SummaryLength) -> Self {
        match outcome {
            BriefOutcome::Ready { id, brief } => BriefResponse::Ready {
                brief_id: id.to_string(),
                brief: brief.text,
                length: length.label().to_string(),
                chunks_total: brief.chunks_total,
                chunks_summarized: brief.chunks_summarized,
                chunks_omitted: brief.chunks_omitted,
                generated_at: chrono::Utc::now().to_rfc3339(),
            },
            BriefOutcome::Empty { id } => BriefResponse::Empty {
                brief_id: id.to_string(),
                warning: EMPTY_CONTENT_WARNING.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LengthOptionResponse {
    pub id: SummaryLength,
    pub label: &'static str,
    pub max_length: u32,
    pub min_length: u32,
}

impl From<SummaryLength> for LengthOptionResponse {
    fn from(length: SummaryLength) -> Self {
        let bounds = length.bounds();
        Self {
            id: length,
            label: length.label(),
            max_length: bounds.max_length,
            min_length: bounds.min_length,
        }
    }
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DownloadRequest {
    pub brief: String,
}
