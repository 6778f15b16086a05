use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::dto::brief::{BriefResponse, DownloadRequest};
use crate::errors::AppError;
use crate::services::length_policy::SummaryLength;
use crate::state::AppState;

pub const DOWNLOAD_FILENAME: &str = "policy_summary.txt";

fn is_pdf(content_type: &str, filename: &str) -> bool {
    content_type == "application/pdf"
        || (content_type == "application/octet-stream"
            && filename.to_lowercase().ends_with(".pdf"))
}

#[cfg_attr(feature = "openapi", utoipa::path(post, path = "/api/briefs", tag = "Briefs", request_body(content_type = "multipart/form-data", description = "`file`: the PDF, `length`: a summary length label"), responses((status = 200, body = BriefResponse), (status = 400, body = crate::errors::ErrorResponse), (status = 422, body = crate::errors::ErrorResponse), (status = 502, body = crate::errors::ErrorResponse))))]
pub async fn create_brief(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BriefResponse>, AppError> {
    let mut file: Option<Bytes> = None;
    let mut length_label: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart data: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("unnamed.pdf").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/pdf")
                    .to_string();

                if !is_pdf(&content_type, &filename) {
                    return Err(AppError::Validation(
                        "Only PDF files are supported".to_string(),
                    ));
                }

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                tracing::info!("Received '{filename}' ({} bytes)", data.len());
                file = Some(data);
            }
            Some("length") => {
                let label = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read length: {e}")))?;
                length_label = Some(label);
            }
            _ => {}
        }
    }

    let data = file.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let length = match length_label {
        Some(label) => SummaryLength::from_label(&label)?,
        None => SummaryLength::default(),
    };

    let outcome = state.briefs.generate(data.to_vec(), length).await?;
    Ok(Json(BriefResponse::from_outcome(outcome, length)))
}

/// Serves a brief back as `policy_summary.txt`, byte for byte.
#[cfg_attr(feature = "openapi", utoipa::path(post, path = "/api/briefs/download", tag = "Briefs", request_body = DownloadRequest, responses((status = 200, content_type = "text/plain", body = String), (status = 400, body = crate::errors::ErrorResponse))))]
pub async fn download_brief(Json(payload): Json<DownloadRequest>) -> Result<Response, AppError> {
    if payload.brief.trim().is_empty() {
        return Err(AppError::Validation(
            "There is no summary to download".to_string(),
        ));
    }

    let disposition = format!("attachment; filename=\"{DOWNLOAD_FILENAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        payload.brief,
    )
        .into_response())
}
