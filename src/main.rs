use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use bill_extractor::application::services::{
    ExtractionOptions, ExtractionService, ModelSelector,
};
use bill_extractor::infrastructure::http::HttpDocumentFetcher;
use bill_extractor::infrastructure::imaging::PdfiumDocumentRenderer;
use bill_extractor::infrastructure::llm::GeminiClient;
use bill_extractor::infrastructure::observability::{TracingConfig, init_tracing};
use bill_extractor::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(
        TracingConfig::new(environment.as_str(), settings.logging.json)
            .with_filter(settings.logging.filter.clone()),
        settings.server.port,
    )
    .context("Failed to initialize tracing")?;

    if settings.gemini.api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set, every extraction will fail until it is");
    }

    let fetcher = Arc::new(HttpDocumentFetcher::new(
        &settings.download.user_agent,
        Duration::from_secs(settings.download.timeout_secs),
        settings.download.max_download_bytes,
    ));
    let renderer = Arc::new(PdfiumDocumentRenderer::new(
        settings.rendering.pdf_dpi,
        settings.rendering.max_dimension,
        settings.rendering.jpeg_quality,
    ));
    let vision_client = Arc::new(GeminiClient::new(
        &settings.gemini.base_url,
        &settings.gemini.api_key,
        Duration::from_secs(settings.gemini.timeout_secs),
    ));

    let scratch_dir = settings
        .scratch_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&scratch_dir)
        .with_context(|| format!("Failed to create scratch dir {}", scratch_dir.display()))?;

    // Discovery lists the catalog here once; the ranked result is reused per request.
    let model_selector = ModelSelector::new(settings.gemini.selection.clone());
    let startup_candidates = model_selector.candidates(vision_client.as_ref()).await;

    tracing::info!(
        selection = ?model_selector.selection(),
        candidates = ?startup_candidates,
        scratch_dir = %scratch_dir.display(),
        "Extraction pipeline configured"
    );

    let extraction_service = Arc::new(ExtractionService::new(
        fetcher,
        renderer,
        vision_client,
        model_selector,
        ExtractionOptions {
            scratch_dir,
            max_attempts: settings.gemini.max_attempts,
            render_timeout: Duration::from_secs(settings.rendering.timeout_secs),
        },
    ));

    let router = create_router(AppState::new(extraction_service));

    let ip: IpAddr = settings
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server host {}", settings.server.host))?;
    let addr = SocketAddr::new(ip, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
