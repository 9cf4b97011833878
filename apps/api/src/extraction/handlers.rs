//! Axum route handlers for the Extraction API.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::errors::{AppError, EXTRACTION_FAILED_MESSAGE};
use crate::extraction::{ExtractedText, ExtractionStrategy};
use crate::models::upload::read_upload_form;
use crate::state::AppState;

/// How the resume text was obtained, without the text itself.
#[derive(Debug, Serialize)]
pub struct ExtractionSummary {
    pub ok: bool,
    pub strategy: Option<ExtractionStrategy>,
    pub page_count: usize,
    pub char_count: usize,
}

impl From<&ExtractedText> for ExtractionSummary {
    fn from(extracted: &ExtractedText) -> Self {
        Self {
            ok: extracted.ok,
            strategy: extracted.strategy,
            page_count: extracted.pages,
            char_count: extracted.char_count(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    #[serde(flatten)]
    pub summary: ExtractionSummary,
    pub text_preview: String,
    pub warning: Option<&'static str>,
}

/// POST /api/v1/extract
///
/// Runs the fallback chain on the uploaded `resume` and returns a preview.
/// An unreadable file is not an error here: `ok` is false and `warning` is set.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let form = read_upload_form(multipart, state.config.max_upload_bytes).await?;
    let resume = form.require_resume()?;

    let extracted = state.extractor.extract(resume.data.clone()).await;
    info!(
        "extract: {} bytes -> ok={} strategy={:?}",
        resume.data.len(),
        extracted.ok,
        extracted.strategy
    );

    Ok(Json(ExtractResponse {
        summary: ExtractionSummary::from(&extracted),
        text_preview: extracted.preview(state.config.preview_chars).to_string(),
        warning: (!extracted.ok).then_some(EXTRACTION_FAILED_MESSAGE),
    }))
}
