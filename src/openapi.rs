use utoipa::OpenApi;

use crate::dto::brief::{BriefResponse, DownloadRequest, LengthOptionResponse};
use crate::errors::ErrorResponse;
use crate::routes::health::HealthResponse;
use crate::services::length_policy::{LengthBounds, SummaryLength};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Policy Brief API",
        version = "0.1.0",
        description = "Upload a policy PDF and get a plain-language brief back, as JSON or as a text download."
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::options::list_length_options,
        crate::routes::briefs::create_brief,
        crate::routes::briefs::download_brief,
    ),
    components(schemas(
        BriefResponse,
        DownloadRequest,
        LengthOptionResponse,
        LengthBounds,
        SummaryLength,
        HealthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Briefs", description = "Summary generation and download"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_brief_routes() {
        let spec = ApiDoc::openapi();
        assert!(spec.paths.paths.contains_key("/api/briefs"));
        assert!(spec.paths.paths.contains_key("/api/briefs/download"));
    }
}
