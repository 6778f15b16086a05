use axum::Json;

use crate::dto::brief::LengthOptionResponse;
use crate::services::length_policy::SummaryLength;

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/length-options", tag = "Briefs", responses((status = 200, body = Vec<LengthOptionResponse>))))]
pub async fn list_length_options() -> Json<Vec<LengthOptionResponse>> {
    Json(SummaryLength::ALL.into_iter().map(Into::into).collect())
}
