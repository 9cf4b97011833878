pub mod health;
pub mod ui;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::extraction::handlers as extraction;
use crate::state::AppState;

/// Room for the text fields that travel with the resume in one form.
const FORM_OVERHEAD_BYTES: usize = 256 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(ui::index_handler))
        .route("/health", get(health::health_handler))
        .route("/api/v1/tasks", get(analysis::handle_list_tasks))
        .route("/api/v1/extract", post(extraction::handle_extract))
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::fixtures::pdf_with_pages;
    use crate::extraction::{ExtractionPolicy, TextExtractor};
    use crate::llm_client::testing::StubModel;

    const BOUNDARY: &str = "ats-test-boundary";

    enum Part<'a> {
        Text(&'a str),
        File(&'a str, Vec<u8>),
        FileTyped(&'a str, &'a str, Vec<u8>),
    }

    fn multipart(fields: Vec<(&str, Part<'_>)>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, part) in fields {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(file_name, data) => {
                    write_file_part(&mut body, name, file_name, "application/pdf", &data);
                }
                Part::FileTyped(file_name, content_type, data) => {
                    write_file_part(&mut body, name, file_name, content_type, &data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn write_file_part(
        body: &mut Vec<u8>,
        name: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) {
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
    }

    fn app(model: Arc<StubModel>) -> Router {
        build_router(AppState {
            config: Config::for_tests(),
            llm: model,
            extractor: Arc::new(TextExtractor::new(ExtractionPolicy::default())),
        })
    }

    async fn post_form(app: Router, uri: &str, body: Vec<u8>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let response = app(Arc::new(StubModel::replying("")))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let response = app(Arc::new(StubModel::replying("")))
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/api/v1/analyze"));
    }

    #[tokio::test]
    async fn test_tasks_lists_every_preset() {
        let response = app(Arc::new(StubModel::replying("")))
            .oneshot(Request::get("/api/v1/tasks").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let tasks: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(tasks.as_array().unwrap().len(), 5);
        assert_eq!(tasks[3]["name"], "match_percentage");
    }

    #[tokio::test]
    async fn test_analyze_end_to_end_match_percentage() {
        let model = Arc::new(StubModel::replying("ATS Match: 82%\nGood Go overlap."));
        let body = multipart(vec![
            (
                "job_description",
                Part::Text("Seeking a backend engineer with Go experience"),
            ),
            ("task", Part::Text("match_percentage")),
            (
                "resume",
                Part::File(
                    "resume.pdf",
                    pdf_with_pages(&["5 years Go and Rust backend development"]),
                ),
            ),
        ]);

        let (status, json) = post_form(app(model.clone()), "/api/v1/analyze", body).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["result"].as_str().unwrap().starts_with("ATS Match: 82%"));
        assert_eq!(json["task"], "match_percentage");
        assert_eq!(json["title"], "ATS Match Percentage");
        assert_eq!(json["extraction"]["strategy"], "text_layer");
        assert!(json["resume_preview"]
            .as_str()
            .unwrap()
            .contains("5 years Go and Rust backend development"));
        assert_eq!(model.text_calls(), 1);
    }

    #[tokio::test]
    async fn test_analyze_service_failure_is_still_ok_with_error_text() {
        let model = Arc::new(StubModel::failing(500, "backend exploded"));
        let body = multipart(vec![
            ("job_description", Part::Text("Go engineer")),
            ("task", Part::Text("summary")),
            ("resume", Part::File("cv.pdf", pdf_with_pages(&["Go developer"]))),
        ]);

        let (status, json) = post_form(app(model), "/api/v1/analyze", body).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["result"].as_str().unwrap().contains("backend exploded"));
    }

    #[tokio::test]
    async fn test_analyze_without_job_description_makes_no_call() {
        let model = Arc::new(StubModel::replying("unused"));
        let body = multipart(vec![(
            "resume",
            Part::File("resume.pdf", pdf_with_pages(&["Go developer"])),
        )]);

        let (status, json) = post_form(app(model.clone()), "/api/v1/analyze", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(model.text_calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_without_file_makes_no_call() {
        let model = Arc::new(StubModel::replying("unused"));
        let body = multipart(vec![("job_description", Part::Text("Go engineer"))]);

        let (status, json) = post_form(app(model.clone()), "/api/v1/analyze", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"]["message"].as_str().unwrap().contains("resume"));
        assert_eq!(model.text_calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_empty_file_warns_without_call() {
        let model = Arc::new(StubModel::replying("unused"));
        let body = multipart(vec![
            ("job_description", Part::Text("Go engineer")),
            ("resume", Part::File("resume.pdf", Vec::new())),
        ]);

        let (status, json) = post_form(app(model.clone()), "/api/v1/analyze", body).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["code"], "EXTRACTION_FAILED");
        assert_eq!(model.text_calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_unreadable_pdf_warns_without_call() {
        let model = Arc::new(StubModel::replying("unused"));
        let body = multipart(vec![
            ("job_description", Part::Text("Go engineer")),
            ("resume", Part::File("resume.pdf", b"not really a pdf".to_vec())),
        ]);

        let (status, _) = post_form(app(model.clone()), "/api/v1/analyze", body).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(model.text_calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_rejects_non_pdf_upload() {
        let model = Arc::new(StubModel::replying("unused"));
        let body = multipart(vec![
            ("job_description", Part::Text("Go engineer")),
            (
                "resume",
                Part::FileTyped(
                    "resume.docx",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                    b"PK\x03\x04".to_vec(),
                ),
            ),
        ]);

        let (status, _) = post_form(app(model.clone()), "/api/v1/analyze", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(model.text_calls(), 0);
    }

    #[tokio::test]
    async fn test_extract_returns_preview() {
        let body = multipart(vec![(
            "resume",
            Part::File("resume.pdf", pdf_with_pages(&["Jane Doe", "Rust engineer"])),
        )]);

        let (status, json) =
            post_form(app(Arc::new(StubModel::replying(""))), "/api/v1/extract", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
        assert_eq!(json["page_count"], 2);
        assert!(json["warning"].is_null());
        assert!(json["text_preview"].as_str().unwrap().contains("Rust engineer"));
    }

    #[tokio::test]
    async fn test_extract_unreadable_file_sets_warning() {
        let body = multipart(vec![(
            "resume",
            Part::File("resume.pdf", b"garbage".to_vec()),
        )]);

        let (status, json) =
            post_form(app(Arc::new(StubModel::replying(""))), "/api/v1/extract", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], false);
        assert_eq!(json["text_preview"], "");
        assert!(json["warning"].as_str().unwrap().contains("scanned"));
    }
}
