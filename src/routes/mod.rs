pub mod briefs;
pub mod health;
pub mod options;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/length-options", get(options::list_length_options))
        .route("/api/briefs", post(briefs::create_brief))
        .route("/api/briefs/download", post(briefs::download_brief))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes()));

    #[cfg(feature = "openapi")]
    {
        use utoipa::OpenApi;
        app = app.merge(utoipa_redoc::Redoc::with_url(
            "/api/docs",
            crate::openapi::ApiDoc::openapi(),
        ));
    }

    app = if state.config.features.ui_enabled {
        app.fallback_service(ServeDir::new(&state.config.server.static_dir))
    } else {
        app.fallback(not_found)
    };

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
