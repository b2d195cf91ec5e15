pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::generation::requests::MAX_RESUME_BYTES;
use crate::state::AppState;

/// Room for the text fields and multipart framing around a maximum-size resume.
const COVER_LETTER_BODY_LIMIT: usize = MAX_RESUME_BYTES + 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/interview-questions",
            post(handlers::handle_interview_questions),
        )
        .route("/api/study-plan", post(handlers::handle_study_plan))
        .route(
            "/api/generate-cover-letter",
            post(handlers::handle_cover_letter)
                .layer(DefaultBodyLimit::max(COVER_LETTER_BODY_LIMIT)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::llm_client::testing::ScriptedClient;
    use crate::llm_client::LlmError;

    const MINIMAL_PLAN: &str = r#"{"weeklySchedule":[{"week":1,"topics":["x"]}],"estimatedCompletionTime":"1 week","prerequisites":[],"additionalResources":[]}"#;
    const BOUNDARY: &str = "job-buddy-boundary";

    fn router(client: &Arc<ScriptedClient>, development: bool) -> Router {
        build_router(AppState::new(client.clone(), development))
    }

    fn json_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Builds a multipart body from text fields and an optional
    /// (file name, content type, bytes) resume part.
    fn multipart_request(
        fields: &[(&str, &str)],
        resume: Option<(&str, &str, &[u8])>,
    ) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, content_type, bytes)) = resume {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/generate-cover-letter")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let client = ScriptedClient::replying("");
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(router(&client, false), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_study_plan_missing_job_description_skips_completion() {
        let client = ScriptedClient::replying(MINIMAL_PLAN);
        let (status, body) = send(
            router(&client, false),
            json_request("/api/study-plan", r#"{"goals": "Learn Rust"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Goals and job description are required"}));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_study_plan_unparseable_body() {
        let client = ScriptedClient::replying(MINIMAL_PLAN);
        let (status, body) = send(
            router(&client, false),
            json_request("/api/study-plan", "goals=Learn"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request format");
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_study_plan_success() {
        let client = ScriptedClient::replying(&format!(
            "Here is your plan:\n```json\n{MINIMAL_PLAN}\n```\nGood luck!"
        ));
        let (status, body) = send(
            router(&client, false),
            json_request(
                "/api/study-plan",
                r#"{"goals": "Learn Rust", "jobDescription": "Backend engineer", "availableTime": "5h/week"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["weeklySchedule"][0]["week"], 1);
        assert_eq!(body["weeklySchedule"][0]["topics"], json!(["x"]));
        assert_eq!(body["estimatedCompletionTime"], "1 week");

        let prompt = &client.prompts()[0];
        assert!(prompt.contains("Learn Rust"));
        assert!(prompt.contains("Backend engineer"));
        assert!(prompt.contains("5h/week"));
    }

    #[tokio::test]
    async fn test_study_plan_without_json_fails_after_one_call() {
        let client = ScriptedClient::scripted(vec![
            Ok("I could not come up with a plan.".to_string()),
            Ok(MINIMAL_PLAN.to_string()),
        ]);
        let (status, body) = send(
            router(&client, false),
            json_request(
                "/api/study-plan",
                r#"{"goals": "g", "jobDescription": "jd"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "No valid JSON found in model response"}));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_study_plan_schema_mismatch_with_details_in_development() {
        let client = ScriptedClient::replying(
            r#"{"weeklySchedule":"not an array","estimatedCompletionTime":"1 week","prerequisites":[],"additionalResources":[]}"#,
        );
        let (status, body) = send(
            router(&client, true),
            json_request(
                "/api/study-plan",
                r#"{"goals": "g", "jobDescription": "jd"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Model response did not match the expected format"
        );
        let details = body["details"].as_str().unwrap();
        assert!(details.contains("$.weeklySchedule"), "{details}");
    }

    #[tokio::test]
    async fn test_study_plan_service_unavailable() {
        let client = ScriptedClient::failing(LlmError::Api {
            status: 503,
            message: "The model is overloaded".to_string(),
        });
        let (status, body) = send(
            router(&client, false),
            json_request(
                "/api/study-plan",
                r#"{"goals": "g", "jobDescription": "jd"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "AI model temporarily unavailable");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_interview_questions_success() {
        let client = ScriptedClient::replying(
            r#"{"questions":[{"type":"behavioral","questions":[{"question":"Tell me about a conflict.","hint":"Use STAR"}]}]}"#,
        );
        let (status, body) = send(
            router(&client, false),
            json_request(
                "/api/interview-questions",
                r#"{"jobDescription": "Team lead", "category": "managerial"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["questions"][0]["type"], "behavioral");
        assert_eq!(body["questions"][0]["questions"][0]["hint"], "Use STAR");
        assert!(client.prompts()[0].contains("Job Category: managerial"));
    }

    #[tokio::test]
    async fn test_interview_questions_requires_job_description() {
        let client = ScriptedClient::replying("{}");
        let (status, body) = send(
            router(&client, false),
            json_request("/api/interview-questions", r#"{"jobDescription": "  "}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Job description is required");
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_cover_letter_success_ignores_resume_contents() {
        let client = ScriptedClient::replying("Dear Hiring Manager,\nI am excited...");
        let request = multipart_request(
            &[("jobDescription", "Platform engineer at Acme")],
            Some(("cv.pdf", "application/pdf", b"%PDF-1.4 secret resume body".as_slice())),
        );
        let (status, body) = send(router(&client, false), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["coverLetter"], "Dear Hiring Manager,\nI am excited...");

        let prompt = &client.prompts()[0];
        assert!(prompt.contains("Platform engineer at Acme"));
        assert!(!prompt.contains("secret resume body"));
    }

    #[tokio::test]
    async fn test_cover_letter_requires_resume() {
        let client = ScriptedClient::replying("letter");
        let request = multipart_request(&[("jobDescription", "jd")], None);
        let (status, body) = send(router(&client, false), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Resume and job description are required");
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_cover_letter_rejects_unsupported_file_type() {
        let client = ScriptedClient::replying("letter");
        let request = multipart_request(
            &[("jobDescription", "jd")],
            Some(("photo.png", "image/png", b"\x89PNG".as_slice())),
        );
        let (status, body) = send(router(&client, false), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Resume must be a PDF, DOC, or DOCX file");
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_cover_letter_rejects_resume_over_size_limit() {
        let client = ScriptedClient::replying("letter");
        let oversized = vec![b'a'; MAX_RESUME_BYTES + 10];
        let request = multipart_request(
            &[("jobDescription", "jd")],
            Some(("cv.pdf", "application/pdf", oversized.as_slice())),
        );
        let (status, body) = send(router(&client, false), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Resume file must be 10MB or smaller");
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_cover_letter_rejects_body_over_route_limit() {
        let client = ScriptedClient::replying("letter");
        let oversized = vec![b'a'; COVER_LETTER_BODY_LIMIT + 1024 * 1024];
        let request = multipart_request(
            &[("jobDescription", "jd")],
            Some(("cv.pdf", "application/pdf", oversized.as_slice())),
        );
        let (status, body) = send(router(&client, false), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Resume file must be 10MB or smaller");
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_cover_letter_rejects_json_body() {
        let client = ScriptedClient::replying("letter");
        let (status, body) = send(
            router(&client, false),
            json_request("/api/generate-cover-letter", r#"{"jobDescription": "jd"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request format");
    }
}
