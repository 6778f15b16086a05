use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::services::brief::BriefError;
use crate::services::length_policy::UnknownLengthLabel;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Could not read the PDF: {0}")]
    Extraction(String),

    #[error("Summarization failed: {0}")]
    Summarization(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

impl From<BriefError> for AppError {
    fn from(err: BriefError) -> Self {
        match err {
            BriefError::Extraction(e) => AppError::Extraction(e.to_string()),
            BriefError::Summarization(e) => AppError::Summarization(e.to_string()),
        }
    }
}

// An unknown label can only come from a client that bypassed the UI's fixed
// option list, so it surfaces as a server fault rather than a 400.
impl From<UnknownLengthLabel> for AppError {
    fn from(err: UnknownLengthLabel) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Extraction(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::Summarization(msg) => {
                tracing::error!("Summarization failed: {msg}");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = axum::Json(ErrorResponse {
            error: message,
            status: status.as_u16(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::pdf::ExtractionError;
    use crate::services::summarizer::SummarizerError;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Validation("no file".into()), StatusCode::BAD_REQUEST),
            (
                AppError::from(BriefError::Extraction(ExtractionError::Unreadable(
                    "bad xref".into(),
                ))),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::from(BriefError::Summarization(SummarizerError::EmptyResponse)),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::from(UnknownLengthLabel("Huge".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
