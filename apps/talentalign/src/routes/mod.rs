pub mod analyze;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Web form
        .route("/", get(analyze::handle_form))
        .route("/analyze", post(analyze::handle_form_submit))
        // JSON API
        .route("/api/v1/analyze", post(analyze::handle_analyze_json))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::analyzer::ResumeAnalyzer;
    use crate::analysis::similarity::{HashEmbedder, SimilarityScorer};
    use crate::llm_client::{Generation, TextGenerator};

    struct CannedGenerator;

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Generation {
            Generation::Text("1. Solid Python delivery record\n2. Cloud deployment on AWS".to_string())
        }
    }

    fn app() -> Router {
        let scorer = SimilarityScorer::new(Arc::new(HashEmbedder::default()));
        let analyzer = ResumeAnalyzer::new(scorer, Arc::new(CannedGenerator));
        build_router(AppState {
            analyzer: Arc::new(analyzer),
        })
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_form_page_renders() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(r#"<form method="post" action="/analyze">"#));
    }

    #[tokio::test]
    async fn test_form_submit_renders_results() {
        let form = "resume=Python+developer+with+AWS&job=Python+developer+with+Kubernetes";
        let response = app()
            .oneshot(
                Request::post("/analyze")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(form))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains(r#"<div id="score">"#));
        assert!(html.contains("• kubernetes"));
        assert!(html.contains("1. Solid Python delivery record"));
    }

    #[tokio::test]
    async fn test_form_submit_blank_field_shows_notice() {
        let response = app()
            .oneshot(
                Request::post("/analyze")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("resume=Python+developer&job=+"))
                    .unwrap(),
            )
            .await
            .unwrap();

        let html = body_string(response).await;
        assert!(html.contains("Please fill in both fields!"));
        assert!(!html.contains(r#"<div id="score">"#));
    }

    #[tokio::test]
    async fn test_json_analyze_returns_match_result() {
        let payload = json!({
            "resume_text": "Experienced Python developer with AWS and Docker skills",
            "job_text": "Looking for Python developer with Kubernetes experience"
        });
        let response = app()
            .oneshot(
                Request::post("/api/v1/analyze")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["missing_skills"], json!(["kubernetes"]));
        assert_eq!(body["skills_match"], json!(["developer", "python"]));
        assert_eq!(body["strengths"][1], "Cloud deployment on AWS");
    }

    #[tokio::test]
    async fn test_json_analyze_accepts_blank_input() {
        let payload = json!({"resume_text": "", "job_text": "Rust engineer"});
        let response = app()
            .oneshot(
                Request::post("/api/v1/analyze")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["match_score"], 0.0);
        assert_eq!(body["skills_match"], json!([]));
        assert_eq!(body["missing_skills"], json!(["engineer", "rust"]));
    }

    #[tokio::test]
    async fn test_json_analyze_rejects_malformed_body() {
        let response = app()
            .oneshot(
                Request::post("/api/v1/analyze")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"resume_text": "Rust"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}
