use std::sync::Arc;

use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::llm_client::GenerativeModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; requests never write to it.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// The one model client, shared by analysis and the vision extraction strategy.
    pub llm: Arc<dyn GenerativeModel>,
    pub extractor: Arc<TextExtractor>,
}
