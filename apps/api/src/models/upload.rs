//! Multipart form shared by the extract and analyze endpoints.

use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    fn is_pdf(&self) -> bool {
        let by_name = self
            .file_name
            .as_deref()
            .map(|n| n.to_ascii_lowercase().ends_with(".pdf"))
            .unwrap_or(false);
        let by_type = self.content_type.as_deref() == Some("application/pdf");
        by_name || by_type || (self.file_name.is_none() && self.content_type.is_none())
    }
}

/// Fields: `job_description`, `task`, `instruction`, `resume` (file).
#[derive(Debug, Default)]
pub struct UploadForm {
    pub job_description: Option<String>,
    pub task: Option<String>,
    pub instruction: Option<String>,
    pub resume: Option<UploadedFile>,
}

impl UploadForm {
    pub fn require_job_description(&self) -> Result<&str, AppError> {
        self.job_description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("Please provide a job description.".to_string()))
    }

    pub fn require_resume(&self) -> Result<&UploadedFile, AppError> {
        self.resume
            .as_ref()
            .ok_or_else(|| AppError::Validation("Please upload a resume (PDF).".to_string()))
    }
}

/// Reads the whole form, rejecting non-PDF files and files over `max_bytes`.
pub async fn read_upload_form(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "job_description" => form.job_description = Some(field.text().await.map_err(multipart_error)?),
            "task" => form.task = non_blank(field.text().await.map_err(multipart_error)?),
            "instruction" => form.instruction = non_blank(field.text().await.map_err(multipart_error)?),
            "resume" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;

                // Browsers send an unnamed, empty part when no file was picked.
                if data.is_empty() && file_name.as_deref() == Some("") {
                    continue;
                }

                if data.len() > max_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "Resume exceeds the {max_bytes} byte upload limit"
                    )));
                }

                let file = UploadedFile {
                    file_name,
                    content_type,
                    data,
                };
                if !file.is_pdf() {
                    return Err(AppError::Validation(
                        "Invalid file type. Only PDF resumes are supported.".to_string(),
                    ));
                }
                form.resume = Some(file);
            }
            _ => {
                let _ = field.bytes().await.map_err(multipart_error)?;
            }
        }
    }

    Ok(form)
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Malformed upload: {}", e.body_text()))
    }
}
