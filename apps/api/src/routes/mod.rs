pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/analyze", post(handlers::handle_analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{test_config, Config};
    use crate::screening::pipeline::AnalysisPipeline;
    use crate::screening::validation::sample_analysis;
    use crate::testing::{resume_text, ScriptedModel, StubExtractor};

    const BOUNDARY: &str = "screener-test-boundary";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File {
            name: &'a str,
            filename: &'a str,
            content_type: &'a str,
            bytes: &'a [u8],
        },
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n")
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    filename,
                    content_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn analyze_request(parts: &[Part<'_>]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn resume_part(content_type: &'static str) -> Part<'static> {
        Part::File {
            name: "cv_pdf",
            filename: "resume.pdf",
            content_type,
            bytes: b"%PDF-1.7 stub",
        }
    }

    fn app(model: Arc<ScriptedModel>, extractor: Arc<StubExtractor>) -> Router {
        app_with_config(test_config(), model, extractor)
    }

    fn app_with_config(
        config: Config,
        model: Arc<ScriptedModel>,
        extractor: Arc<StubExtractor>,
    ) -> Router {
        let state = AppState {
            config,
            pipeline: Arc::new(AnalysisPipeline::new(model, extractor)),
        };
        build_router(state)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_model() {
        let app = app(
            Arc::new(ScriptedModel::new(vec![])),
            Arc::new(StubExtractor::with_text(resume_text())),
        );

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["model"], "scripted-model");
    }

    #[tokio::test]
    async fn test_analyze_returns_model_object() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(
            Value::Object(sample_analysis()).to_string()
        )]));
        let app = app(model.clone(), Arc::new(StubExtractor::with_text(resume_text())));

        let response = app
            .oneshot(analyze_request(&[
                Part::Text("position_title", "Senior Rust Engineer"),
                Part::Text("position_description", "Own the ingest pipeline."),
                resume_part("application/pdf"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, Value::Object(sample_analysis()));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_analyze_description_is_optional() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(
            Value::Object(sample_analysis()).to_string()
        )]));
        let app = app(model.clone(), Arc::new(StubExtractor::with_text(resume_text())));

        let response = app
            .oneshot(analyze_request(&[
                Part::Text("position_title", "Data Engineer"),
                resume_part("application/pdf"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let conversation = &model.conversations()[0];
        assert!(conversation[1].content.contains("Position Description:\n(empty)\n"));
    }

    #[tokio::test]
    async fn test_analyze_short_title_is_400() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let app = app(model.clone(), Arc::new(StubExtractor::with_text(resume_text())));

        let response = app
            .oneshot(analyze_request(&[
                Part::Text("position_title", " QA "),
                resume_part("application/pdf"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert_eq!(body["error"]["message"], "position_title too short");
        assert_eq!(body["detail"], "INVALID_INPUT: position_title too short");
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_wrong_file_type_is_400() {
        let extractor = Arc::new(StubExtractor::with_text(resume_text()));
        let app = app(Arc::new(ScriptedModel::new(vec![])), extractor.clone());

        let response = app
            .oneshot(analyze_request(&[
                Part::Text("position_title", "Senior Rust Engineer"),
                resume_part("text/plain"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["code"],
            "UNSUPPORTED_FILE_TYPE"
        );
        assert_eq!(extractor.calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_missing_file_is_400() {
        let app = app(
            Arc::new(ScriptedModel::new(vec![])),
            Arc::new(StubExtractor::with_text(resume_text())),
        );

        let response = app
            .oneshot(analyze_request(&[Part::Text(
                "position_title",
                "Senior Rust Engineer",
            )]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert_eq!(body["error"]["message"], "cv_pdf is required");
    }

    #[tokio::test]
    async fn test_analyze_non_multipart_body_is_400() {
        let app = app(
            Arc::new(ScriptedModel::new(vec![])),
            Arc::new(StubExtractor::with_text(resume_text())),
        );

        let response = app
            .oneshot(
                Request::post("/analyze")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn test_analyze_invalid_model_output_is_500() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok("I cannot help with that.".to_string()),
            Ok("Still not JSON.".to_string()),
        ]));
        let app = app(model.clone(), Arc::new(StubExtractor::with_text(resume_text())));

        let response = app
            .oneshot(analyze_request(&[
                Part::Text("position_title", "Senior Rust Engineer"),
                resume_part("application/pdf"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "ANALYSIS_FAILED");
        assert_eq!(body["detail"], "ANALYSIS_FAILED: invalid JSON from model");
        assert_eq!(model.calls(), 2);
    }

    #[tokio::test]
    async fn test_analyze_scanned_pdf_is_400() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let app = app(model.clone(), Arc::new(StubExtractor::with_text("   \n  ")));

        let response = app
            .oneshot(analyze_request(&[
                Part::Text("position_title", "Senior Rust Engineer"),
                resume_part("application/pdf"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["code"],
            "NO_EXTRACTABLE_TEXT"
        );
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_oversized_upload_is_400() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let extractor = Arc::new(StubExtractor::with_text(resume_text()));
        let config = Config {
            max_upload_bytes: 64,
            ..test_config()
        };
        let app = app_with_config(config, model.clone(), extractor.clone());

        let resume = vec![b'x'; 4096];
        let response = app
            .oneshot(analyze_request(&[
                Part::Text("position_title", "Senior Rust Engineer"),
                Part::File {
                    name: "cv_pdf",
                    filename: "resume.pdf",
                    content_type: "application/pdf",
                    bytes: &resume,
                },
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "INVALID_INPUT");
        assert_eq!(extractor.calls(), 0);
        assert_eq!(model.calls(), 0);
    }
}
