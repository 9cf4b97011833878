// All prompt text for the Analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::FIRST_LINE_PERCENTAGE;

pub const SUMMARY_INSTRUCTION: &str = "Summarize this resume and highlight strengths.";

pub const SKILL_IMPROVEMENTS_INSTRUCTION: &str =
    "Suggest specific skills I should learn to better match the job description.";

pub const MISSING_KEYWORDS_INSTRUCTION: &str =
    "List important keywords from the job description that are missing in my resume.";

pub const MATCH_PERCENTAGE_INSTRUCTION: &str =
    "Compare the job description and resume, and give a percentage match for ATS systems. \
    Provide just a percentage value with short reasoning.";

/// Shown instead of calling the model when extraction produced nothing.
pub const EMPTY_RESUME_SENTINEL: &str =
    "⚠️ Resume text could not be extracted. Please try another PDF.";

/// Task template. Replace: {job_desc}, {resume_text}, {task}
const TASK_PROMPT_TEMPLATE: &str = "Job Description:
{job_desc}

Candidate Resume:
{resume_text}

Task: {task}";

/// Full report template. Replace: {job_desc}, {resume_text}, {first_line_rule}
const FULL_REPORT_PROMPT_TEMPLATE: &str = "You are an ATS (Applicant Tracking System). \
Compare the candidate's resume against the job description and give a detailed analysis.

Job Description:
{job_desc}

Candidate Resume:
{resume_text}

Tasks:
1. Provide a **percentage match** between the resume and the job description (0–100%).
2. List the **key strengths** of the resume that align with the job description.
3. Highlight the **missing skills/keywords** that ATS would look for but are not found in the resume.
4. Give **actionable recommendations** for improving the resume to increase the ATS score.

Important:
- {first_line_rule}
- Then give the detailed explanation.
- Keep the response clear and structured.";

/// Renders the shared template. User text is interpolated as-is.
pub fn task_prompt(job_desc: &str, resume_text: &str, task: &str) -> String {
    fill(
        TASK_PROMPT_TEMPLATE,
        &[
            ("{job_desc}", job_desc),
            ("{resume_text}", resume_text),
            ("{task}", task),
        ],
    )
}

/// The match-percentage instruction with the first-line convention appended.
pub fn match_percentage_instruction() -> String {
    format!("{MATCH_PERCENTAGE_INSTRUCTION} {FIRST_LINE_PERCENTAGE}")
}

pub fn full_report_prompt(job_desc: &str, resume_text: &str) -> String {
    fill(
        FULL_REPORT_PROMPT_TEMPLATE,
        &[
            ("{job_desc}", job_desc),
            ("{resume_text}", resume_text),
            ("{first_line_rule}", FIRST_LINE_PERCENTAGE),
        ],
    )
}

/// Single pass over the template; substituted values are never rescanned,
/// so braces in user text come through untouched.
fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    'scan: while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        for (placeholder, value) in vars {
            if let Some(after) = tail.strip_prefix(placeholder) {
                out.push_str(value);
                rest = after;
                continue 'scan;
            }
        }
        out.push('{');
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}
