use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use crate::pipeline::Pipeline;
use crate::result::{PipelineReport, RunTrace};

#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    pub input: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SolveResponse {
    pub success: bool,
    pub outcome: String,
    pub output: Option<String>,
    pub reason: Option<String>,
    pub trace: Option<RunTrace>,
    pub error: Option<String>,
}

impl SolveResponse {
    fn failure(outcome: &str, error: String) -> Self {
        Self {
            success: false,
            outcome: outcome.to_string(),
            output: None,
            reason: None,
            trace: None,
            error: Some(error),
        }
    }
}

pub async fn handle_health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
}

pub async fn handle_solve(
    State(pipeline): State<Arc<Pipeline>>,
    Json(req): Json<SolveRequest>,
) -> Json<SolveResponse> {
    if req.input.trim().is_empty() {
        return Json(SolveResponse::failure("error", "input required".to_string()));
    }

    match pipeline.process_traced(&req.input).await {
        Ok(report) => Json(to_response(report)),
        Err(err) => {
            error!(error = %err, "pipeline failed");
            Json(SolveResponse::failure("error", err.to_string()))
        }
    }
}

fn to_response(report: PipelineReport) -> SolveResponse {
    SolveResponse {
        success: report.outcome.is_accepted(),
        outcome: report.outcome.kind().to_string(),
        output: report.outcome.output().map(str::to_string),
        reason: report.outcome.reason().map(str::to_string),
        trace: Some(report.trace),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::server::router;
    use crate::testing::MockProvider;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn post_solve(pipeline: Pipeline, body: serde_json::Value) -> SolveResponse {
        let app = router(Arc::new(pipeline));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/solve")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = router(Arc::new(Pipeline::with_provider(Arc::new(MockProvider::new()))));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn blank_input_is_rejected() {
        let pipeline = Pipeline::with_provider(Arc::new(MockProvider::new()));
        let resp = post_solve(pipeline, json!({"input": "  "})).await;

        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("input required"));
    }

    #[tokio::test]
    async fn accepted_solution_is_returned_with_trace() {
        let provider = MockProvider::with_responses(vec![
            r#"{"is_homework_request": false, "rationale": "explanation"}"#.to_string(),
            "2x = 8, so x = 4".to_string(),
            r#"{"is_valid": true, "explanation": "numeric"}"#.to_string(),
        ]);
        let pipeline = Pipeline::with_provider(Arc::new(provider));
        let resp = post_solve(pipeline, json!({"input": "how can you explain 2x + 3 = 11?"})).await;

        assert!(resp.success);
        assert_eq!(resp.outcome, "accepted");
        assert_eq!(resp.output.as_deref(), Some("2x = 8, so x = 4"));
        assert_eq!(resp.trace.unwrap().steps.len(), 3);
    }

    #[tokio::test]
    async fn homework_is_blocked() {
        let provider = MockProvider::with_responses(vec![
            r#"{"is_homework_request": true, "rationale": "copied problem"}"#.to_string(),
        ]);
        let pipeline = Pipeline::with_provider(Arc::new(provider));
        let resp = post_solve(pipeline, json!({"input": "Solve: 5x - 2 = 18"})).await;

        assert!(!resp.success);
        assert_eq!(resp.outcome, "blocked_by_input");
        assert_eq!(resp.reason.as_deref(), Some("copied problem"));
        assert!(resp.error.is_none());
    }

    #[tokio::test]
    async fn provider_failure_is_reported_as_error() {
        let pipeline = Pipeline::with_provider(Arc::new(MockProvider::new()));
        let resp = post_solve(pipeline, json!({"input": "what is 1 + 1?"})).await;

        assert!(!resp.success);
        assert_eq!(resp.outcome, "error");
        assert!(resp.error.is_some());
    }
}
