//! Analysis Requester: asks the model to compare a resume with a job description.
//!
//! `analyze` always returns displayable text: the model's answer verbatim, the
//! empty-resume sentinel, or an error string carrying the failure detail.

use serde::Serialize;
use tracing::{info, warn};

use crate::llm_client::GenerativeModel;

pub mod handlers;
pub mod prompts;
pub mod tasks;

pub use prompts::EMPTY_RESUME_SENTINEL;
pub use tasks::{AnalysisTask, TaskInstruction};

/// The model's answer as displayed to the user, or a sentinel/error text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnalysisResult(pub String);

/// Builds the full prompt for one request.
pub fn build_prompt(job_desc: &str, resume_text: &str, task: &TaskInstruction) -> String {
    match task {
        TaskInstruction::Preset(AnalysisTask::FullReport) => {
            prompts::full_report_prompt(job_desc, resume_text)
        }
        TaskInstruction::Preset(AnalysisTask::MatchPercentage) => prompts::task_prompt(
            job_desc,
            resume_text,
            &prompts::match_percentage_instruction(),
        ),
        TaskInstruction::Preset(preset) => {
            prompts::task_prompt(job_desc, resume_text, preset.instruction())
        }
        TaskInstruction::Freeform(instruction) => {
            prompts::task_prompt(job_desc, resume_text, instruction)
        }
    }
}

pub async fn analyze(
    model: &dyn GenerativeModel,
    job_desc: &str,
    resume_text: &str,
    task: &TaskInstruction,
) -> AnalysisResult {
    if resume_text.trim().is_empty() {
        warn!("analyze: empty resume text, not calling the model");
        return AnalysisResult(EMPTY_RESUME_SENTINEL.to_string());
    }

    let prompt = build_prompt(job_desc, resume_text, task);
    match model.generate(&prompt).await {
        Ok(text) => {
            info!("analyze: {} answered with {} chars", task.name(), text.len());
            AnalysisResult(text)
        }
        Err(e) => {
            warn!("analyze: {} failed: {e}", task.name());
            AnalysisResult(format!("Error from generative model service: {e}"))
        }
    }
}
