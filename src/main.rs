use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use policy_brief::config::AppConfig;
use policy_brief::routes;
use policy_brief::services::brief::BriefService;
use policy_brief::services::pdf::PdfTextExtractor;
use policy_brief::services::summarizer;
use policy_brief::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded (env: {})", std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into()));

    // Loaded once here and shared by every request.
    let summarizer =
        summarizer::from_config(&config.summarizer).context("Failed to initialise summarizer")?;

    let extractor = Arc::new(PdfTextExtractor::new(Duration::from_secs(
        config.brief.extraction_timeout_secs,
    )));

    let briefs = BriefService::new(&config.brief, extractor, summarizer);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = routes::router(AppState::new(config, briefs));

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
