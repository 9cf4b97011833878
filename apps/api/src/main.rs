mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::{ExtractionStrategy, PdftoppmRasterizer, TextExtractor, VisionOcr};
use crate::llm_client::{GenerativeModel, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let client = LlmClient::new(
        config.google_api_key.clone(),
        config.gemini_model.clone(),
        config.model_timeout_secs,
    )?;
    info!("LLM client initialized (model: {})", client.model());
    let llm: Arc<dyn GenerativeModel> = Arc::new(client);

    // Initialize the extraction chain
    let mut extractor = TextExtractor::new(config.extraction_order.clone());
    if config.extraction_order.uses(ExtractionStrategy::Vision) {
        let rasterizer = Arc::new(
            PdftoppmRasterizer::new(config.raster_dpi).with_binary(config.pdftoppm_path.clone()),
        );
        extractor = extractor.with_vision(VisionOcr::new(llm.clone(), rasterizer));
    }
    info!(
        "Extraction order: {} (max upload {} bytes)",
        extractor.policy(),
        config.max_upload_bytes
    );

    // Build app state
    let state = AppState {
        llm,
        extractor: Arc::new(extractor),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
