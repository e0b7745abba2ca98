pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::assist::handlers as assist;
use crate::evaluation::handlers as evaluations;
use crate::report::handlers as report;
use crate::state::AppState;

/// Uploaded lesson plans may be scanned PDFs.
const UPLOAD_BODY_LIMIT: usize = 16 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Rubrics
        .route(
            "/api/v1/rubrics/:rubric_type",
            get(evaluations::handle_get_rubric),
        )
        // Evaluations
        .route(
            "/api/v1/evaluations",
            get(evaluations::handle_list_evaluations)
                .post(evaluations::handle_save_evaluation)
                .delete(evaluations::handle_clear_evaluations),
        )
        .route(
            "/api/v1/evaluations/:id",
            get(evaluations::handle_get_evaluation).delete(evaluations::handle_delete_evaluation),
        )
        .route(
            "/api/v1/evaluations/:id/summary",
            get(evaluations::handle_evaluation_summary),
        )
        .route(
            "/api/v1/evaluations/:id/report",
            get(report::handle_get_report),
        )
        .route("/api/v1/validate", post(evaluations::handle_validate))
        .route("/api/v1/dashboard", get(evaluations::handle_dashboard))
        .route("/api/v1/export", get(evaluations::handle_export))
        .route("/api/v1/import", post(evaluations::handle_import))
        // AI assist
        .route(
            "/api/v1/assist/lesson-plan",
            post(assist::handle_extract_lesson_plan),
        )
        .route(
            "/api/v1/assist/lesson-plan/upload",
            post(assist::handle_upload_lesson_plan).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/v1/assist/justification",
            post(assist::handle_draft_justification),
        )
        .route("/api/v1/assist/analysis", post(assist::handle_draft_analysis))
        .route("/api/v1/assist/summary", post(assist::handle_summarize))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    use super::*;
    use crate::assist::{
        AnalysisRequest, AssistError, AssistService, DraftedText, LessonPlanInfo,
        LlmAssistService, SummaryRequest,
    };
    use crate::llm_client::{LlmClient, LlmSettings, DEFAULT_MODEL};
    use crate::report::{PageConfig, TextReportRenderer};
    use crate::rubric::{RubricItem, RubricType, Score};
    use crate::store::EvaluationStore;

    /// Canned assist backend: echoes inputs so tests can see what reached it.
    struct FakeAssist;

    #[async_trait]
    impl AssistService for FakeAssist {
        async fn extract_lesson_plan_info(
            &self,
            text: &str,
        ) -> Result<LessonPlanInfo, AssistError> {
            if text.trim().is_empty() {
                return Err(AssistError::InvalidInput("lesson plan text cannot be empty".into()));
            }
            Ok(LessonPlanInfo {
                lesson_topic: Some(text.lines().next().unwrap_or_default().to_string()),
                confidence_score: 0.9,
                ..LessonPlanInfo::default()
            })
        }

        async fn draft_justification(
            &self,
            item: &RubricItem,
            score: Score,
            _subject_name: &str,
            observation_context: &str,
        ) -> Result<DraftedText, AssistError> {
            Ok(DraftedText::from_model(
                format!("{} scored {}", item.code, score.label()),
                0.8,
                !observation_context.contains("nothing"),
            ))
        }

        async fn draft_analysis_for_items(
            &self,
            request: AnalysisRequest<'_>,
        ) -> Result<BTreeMap<String, DraftedText>, AssistError> {
            Ok(request
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let drafted = if i == 0 {
                        DraftedText::missing()
                    } else {
                        DraftedText::from_model(format!("Analysis of {}", item.code), 0.9, true)
                    };
                    (item.id.to_string(), drafted)
                })
                .collect())
        }

        async fn summarize_evaluation(
            &self,
            request: SummaryRequest<'_>,
        ) -> Result<String, AssistError> {
            Ok(format!("{} items summarized", request.scores.len()))
        }
    }

    fn app_with(assist: Arc<dyn AssistService>) -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState {
            store: Arc::new(Mutex::new(EvaluationStore::new(
                dir.path().join("evaluations.json"),
            ))),
            assist,
            renderer: Arc::new(TextReportRenderer::new(PageConfig::default())),
        };
        (build_router(state), dir)
    }

    fn app() -> (Router, TempDir) {
        app_with(Arc::new(FakeAssist))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    fn complete_field_evaluation(id: &str) -> Value {
        let set = RubricType::FieldEvaluation.rubric_set();
        let scores: serde_json::Map<String, Value> =
            set.items.iter().map(|i| (i.id.to_string(), json!(3))).collect();
        let justifications: serde_json::Map<String, Value> = set
            .items
            .iter()
            .map(|i| (i.id.to_string(), json!("Clear evidence in notes")))
            .collect();
        let dispositions: serde_json::Map<String, Value> = set
            .dispositions
            .iter()
            .map(|d| (d.id.to_string(), json!(3)))
            .collect();
        json!({
            "id": id,
            "student_name": "Jordan Lee",
            "evaluator_name": "Dr. Smith",
            "subject_area": "Mathematics",
            "observation_date": "2026-03-14",
            "rubric_type": "field_evaluation",
            "scores": scores,
            "justifications": justifications,
            "disposition_scores": dispositions
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "practicum");
    }

    #[tokio::test]
    async fn test_get_rubric() {
        let (app, _dir) = app();
        let (status, body) = send(&app, "GET", "/api/v1/rubrics/field_evaluation", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"].as_array().unwrap().len(), 8);
        assert_eq!(body["dispositions"].as_array().unwrap().len(), 6);

        let (status, body) = send(&app, "GET", "/api/v1/rubrics/ster", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["dispositions"].as_array().unwrap().is_empty());

        let (status, body) = send(&app, "GET", "/api/v1/rubrics/unknown", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_submit_then_read_back() {
        let (app, _dir) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/evaluations",
            Some(json!({"evaluation": complete_field_evaluation("eval-1"), "action": "submit"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["created"], true);
        assert_eq!(body["evaluation"]["status"], "completed");
        assert_eq!(body["evaluation"]["total_score"], 24);
        assert!(body["assessment"]["issues"].as_array().unwrap().is_empty());

        let (status, body) = send(&app, "GET", "/api/v1/evaluations/eval-1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["student_name"], "Jordan Lee");

        let (_, body) = send(&app, "GET", "/api/v1/evaluations?status=completed", None).await;
        assert_eq!(body["count"], 1);
        let (_, body) = send(&app, "GET", "/api/v1/evaluations?rubric_type=ster", None).await;
        assert_eq!(body["count"], 0);

        let (status, body) = send(&app, "GET", "/api/v1/evaluations/eval-1/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["assessment"]["summary"]["total"], 24);
        assert_eq!(body["assessment"]["eligible_for_completion"], true);
    }

    #[tokio::test]
    async fn test_resave_replaces_and_incomplete_submit_needs_improvement() {
        let (app, _dir) = app();
        send(
            &app,
            "POST",
            "/api/v1/evaluations",
            Some(json!({"evaluation": complete_field_evaluation("eval-2")})),
        )
        .await;

        let mut evaluation = complete_field_evaluation("eval-2");
        evaluation["scores"]["fe_feedback"] = json!(1);
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/evaluations",
            Some(json!({"evaluation": evaluation, "action": "submit"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["created"], false);
        assert_eq!(body["evaluation"]["status"], "needs_improvement");
        assert_eq!(body["assessment"]["issues"][0]["rule"], "below_minimum");

        let (_, body) = send(&app, "GET", "/api/v1/evaluations", None).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["evaluations"][0]["scores"]["fe_feedback"], 1);
    }

    #[tokio::test]
    async fn test_save_rejects_foreign_items_and_bad_levels() {
        let (app, _dir) = app();
        let mut evaluation = complete_field_evaluation("eval-3");
        evaluation["scores"]["ster_planning"] = json!(2);
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/evaluations",
            Some(json!({"evaluation": evaluation})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let mut evaluation = complete_field_evaluation("eval-3");
        evaluation["scores"]["fe_feedback"] = json!(5);
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/evaluations",
            Some(json!({"evaluation": evaluation})),
        )
        .await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let (app, _dir) = app();
        let (status, body) = send(&app, "DELETE", "/api/v1/evaluations/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        for id in ["a", "b"] {
            send(
                &app,
                "POST",
                "/api/v1/evaluations",
                Some(json!({"evaluation": complete_field_evaluation(id)})),
            )
            .await;
        }
        let (status, body) = send(&app, "DELETE", "/api/v1/evaluations/a", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], true);

        let (status, _) = send(&app, "DELETE", "/api/v1/evaluations", None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send(&app, "GET", "/api/v1/evaluations", None).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_validate_does_not_persist() {
        let (app, _dir) = app();
        let mut form = complete_field_evaluation("unsaved");
        form["justifications"] = json!({});
        let (status, body) = send(&app, "POST", "/api/v1/validate", Some(form)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["eligible_for_completion"], false);
        assert_eq!(body["issues"][0]["rule"], "missing_justifications");

        let (_, body) = send(&app, "GET", "/api/v1/evaluations", None).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_export_import_round_trip_skips_existing() {
        let (source, _dir) = app();
        send(
            &source,
            "POST",
            "/api/v1/evaluations",
            Some(json!({"evaluation": complete_field_evaluation("keep"), "action": "submit"})),
        )
        .await;
        let (status, bundle) = send(&source, "GET", "/api/v1/export", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bundle["version"], "1.0");
        assert_eq!(bundle["evaluations"].as_array().unwrap().len(), 1);

        let (other, _other_dir) = app();
        let (status, body) = send(&other, "POST", "/api/v1/import", Some(bundle.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imported"], 1);
        assert_eq!(body["skipped"], 0);

        let (_, body) = send(&other, "POST", "/api/v1/import", Some(bundle)).await;
        assert_eq!(body["imported"], 0);
        assert_eq!(body["skipped"], 1);

        let (status, body) =
            send(&other, "POST", "/api/v1/import", Some(json!({"records": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_IMPORT");
    }

    #[tokio::test]
    async fn test_dashboard() {
        let (app, _dir) = app();
        send(
            &app,
            "POST",
            "/api/v1/evaluations",
            Some(json!({"evaluation": complete_field_evaluation("d1"), "action": "submit"})),
        )
        .await;
        let (status, body) = send(&app, "GET", "/api/v1/dashboard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_evaluations"], 1);
        assert_eq!(body["by_status"]["completed"], 1);
        assert_eq!(body["completion_rate"], 1.0);
    }

    #[tokio::test]
    async fn test_report_download() {
        let (app, _dir) = app();
        send(
            &app,
            "POST",
            "/api/v1/evaluations",
            Some(json!({"evaluation": complete_field_evaluation("r1"), "action": "submit"})),
        )
        .await;

        let request = Request::builder()
            .uri("/api/v1/evaluations/r1/report")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"evaluation_Jordan_Lee_r1"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("Total score: 24 / 24"));

        let (status, _) = send(&app, "GET", "/api/v1/evaluations/nope/report", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_assist_justification_and_analysis() {
        let (app, _dir) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/assist/justification",
            Some(json!({
                "rubric_type": "field_evaluation",
                "item_id": "fe_feedback",
                "score": 2,
                "observation_context": "Gave written feedback on exit tickets"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "FE8 scored 2 - Meets Expectations");
        assert!(body.get("warning").is_none());

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/assist/justification",
            Some(json!({
                "rubric_type": "ster",
                "item_id": "fe_feedback",
                "score": 2,
                "observation_context": "x"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/assist/analysis",
            Some(json!({
                "rubric_type": "field_evaluation",
                "item_ids": ["fe_learning_objectives", "fe_feedback"],
                "observation_notes": "Objectives posted; feedback given."
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analyses"].as_object().unwrap().len(), 2);
        assert_eq!(
            body["analyses"]["fe_learning_objectives"]["warning"],
            "insufficient_evidence"
        );
        assert_eq!(body["needs_review"], json!(["fe_learning_objectives"]));
    }

    #[tokio::test]
    async fn test_assist_summary_and_lesson_plan() {
        let (app, _dir) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/assist/summary",
            Some(json!({"rubric_type": "ster", "scores": {"ster_planning": 2, "ster_reflection": "not_observed"}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "2 items summarized");

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/assist/summary",
            Some(json!({"rubric_type": "ster"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/assist/lesson-plan",
            Some(json!({"text": "Fractions on a number line\nGrade 4"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lesson_plan"]["lesson_topic"], "Fractions on a number line");
    }

    #[tokio::test]
    async fn test_lesson_plan_upload() {
        let (app, _dir) = app();
        let boundary = "XBOUNDARY";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"plan.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             Photosynthesis lab\r\nGrade 7\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/assist/lesson-plan/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["lesson_plan"]["lesson_topic"], "Photosynthesis lab");
    }

    #[tokio::test]
    async fn test_assist_without_api_key_is_service_unavailable() {
        let llm = LlmClient::new(LlmSettings {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(1),
            max_attempts: 1,
        });
        let (app, _dir) = app_with(Arc::new(LlmAssistService(llm)));
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/assist/lesson-plan",
            Some(json!({"text": "A lesson"})),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "ASSIST_NOT_CONFIGURED");

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/assist/lesson-plan",
            Some(json!({"text": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
