//! Axum route handlers for the Analysis API.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::analysis::{analyze, AnalysisResult, AnalysisTask, TaskInstruction};
use crate::errors::AppError;
use crate::extraction::handlers::ExtractionSummary;
use crate::models::upload::{read_upload_form, UploadForm};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TaskInfo {
    pub name: &'static str,
    pub title: &'static str,
    pub instruction: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub task: String,
    pub title: String,
    pub result: AnalysisResult,
    pub resume_preview: String,
    pub extraction: ExtractionSummary,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/tasks
pub async fn handle_list_tasks() -> Json<Vec<TaskInfo>> {
    Json(
        AnalysisTask::ALL
            .iter()
            .map(|task| TaskInfo {
                name: task.name(),
                title: task.title(),
                instruction: task.instruction(),
            })
            .collect(),
    )
}

/// POST /api/v1/analyze
///
/// Multipart fields: `job_description`, `resume` (PDF), and either `task`
/// (a preset name) or `instruction` (free text). With neither, runs `full_report`.
///
/// Input problems are rejected before any model call. Model failures are not
/// errors: they come back as text in `result`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let form = read_upload_form(multipart, state.config.max_upload_bytes).await?;
    let job_desc = form.require_job_description()?;
    let resume = form.require_resume()?;
    let task = resolve_task(&form)?;

    let extracted = state.extractor.extract(resume.data.clone()).await;
    if !extracted.ok {
        return Err(AppError::ExtractionFailed);
    }

    let result = analyze(state.llm.as_ref(), job_desc, &extracted.text, &task).await;

    Ok(Json(AnalyzeResponse {
        task: task.name().to_string(),
        title: task.title().to_string(),
        result,
        resume_preview: extracted.preview(state.config.preview_chars).to_string(),
        extraction: ExtractionSummary::from(&extracted),
    }))
}

fn resolve_task(form: &UploadForm) -> Result<TaskInstruction, AppError> {
    let task = form.task.as_deref().map(str::trim);
    let is_custom = task.is_some_and(|name| name.eq_ignore_ascii_case("custom"));
    match (task, form.instruction.as_deref()) {
        (None, Some(instruction)) => Ok(TaskInstruction::Freeform(instruction.to_string())),
        (Some(_), Some(instruction)) if is_custom => {
            Ok(TaskInstruction::Freeform(instruction.to_string()))
        }
        (Some(_), None) if is_custom => Err(AppError::Validation(
            "A custom task needs an instruction.".to_string(),
        )),
        (Some(name), _) => name
            .parse::<AnalysisTask>()
            .map(TaskInstruction::Preset)
            .map_err(AppError::Validation),
        (None, None) => Ok(TaskInstruction::Preset(AnalysisTask::FullReport)),
    }
}
