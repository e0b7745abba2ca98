//! Axum route handlers for the AI Assist API.

use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assist::lesson_plan::{document_to_text, LessonPlanInfo};
use crate::assist::{AnalysisRequest, DraftedText, SummaryRequest};
use crate::errors::AppError;
use crate::rubric::{DispositionLevel, RubricItem, RubricType, Score};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LessonPlanTextRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct LessonPlanResponse {
    pub lesson_plan: LessonPlanInfo,
    pub extracted_chars: usize,
}

#[derive(Debug, Deserialize)]
pub struct JustificationRequest {
    pub rubric_type: RubricType,
    pub item_id: String,
    pub score: Score,
    #[serde(default)]
    pub subject_name: String,
    pub observation_context: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisRequestBody {
    pub rubric_type: RubricType,
    /// Empty means every item in the rubric set.
    #[serde(default)]
    pub item_ids: Vec<String>,
    pub observation_notes: String,
    #[serde(default)]
    pub subject_name: String,
    #[serde(default)]
    pub lesson_plan: Option<LessonPlanInfo>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analyses: BTreeMap<String, DraftedText>,
    /// Item ids whose drafts carry a warning.
    pub needs_review: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequestBody {
    pub rubric_type: RubricType,
    #[serde(default)]
    pub scores: BTreeMap<String, Score>,
    #[serde(default)]
    pub justifications: BTreeMap<String, String>,
    #[serde(default)]
    pub disposition_scores: BTreeMap<String, DispositionLevel>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/assist/lesson-plan
pub async fn handle_extract_lesson_plan(
    State(state): State<AppState>,
    Json(request): Json<LessonPlanTextRequest>,
) -> Result<Json<LessonPlanResponse>, AppError> {
    let lesson_plan = state.assist.extract_lesson_plan_info(&request.text).await?;
    Ok(Json(LessonPlanResponse {
        lesson_plan,
        extracted_chars: request.text.chars().count(),
    }))
}

/// POST /api/v1/assist/lesson-plan/upload
///
/// Multipart form with a single `file` field (PDF or plain text).
pub async fn handle_upload_lesson_plan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<LessonPlanResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("could not read uploaded file: {e}")))?;

        info!(
            "Lesson plan upload: {} ({} bytes)",
            file_name.as_deref().unwrap_or("<unnamed>"),
            bytes.len()
        );
        let text = document_to_text(file_name.as_deref(), content_type.as_deref(), bytes).await?;
        let lesson_plan = state.assist.extract_lesson_plan_info(&text).await?;
        return Ok(Json(LessonPlanResponse {
            lesson_plan,
            extracted_chars: text.chars().count(),
        }));
    }

    Err(AppError::Validation(
        "multipart body must contain a 'file' field".to_string(),
    ))
}

/// POST /api/v1/assist/justification
pub async fn handle_draft_justification(
    State(state): State<AppState>,
    Json(request): Json<JustificationRequest>,
) -> Result<Json<DraftedText>, AppError> {
    let set = request.rubric_type.rubric_set();
    let item = set.item(&request.item_id).ok_or_else(|| {
        AppError::Validation(format!(
            "unknown rubric item '{}' for rubric type '{}'",
            request.item_id,
            request.rubric_type.as_str()
        ))
    })?;

    let drafted = state
        .assist
        .draft_justification(
            item,
            request.score,
            &request.subject_name,
            &request.observation_context,
        )
        .await?;
    Ok(Json(drafted))
}

/// POST /api/v1/assist/analysis
pub async fn handle_draft_analysis(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequestBody>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let set = request.rubric_type.rubric_set();
    let items: Vec<&'static RubricItem> = if request.item_ids.is_empty() {
        set.items.iter().collect()
    } else {
        request
            .item_ids
            .iter()
            .map(|id| {
                set.item(id).ok_or_else(|| {
                    AppError::Validation(format!(
                        "unknown rubric item '{id}' for rubric type '{}'",
                        request.rubric_type.as_str()
                    ))
                })
            })
            .collect::<Result<_, _>>()?
    };

    let analyses = state
        .assist
        .draft_analysis_for_items(AnalysisRequest {
            items: &items,
            observation_notes: &request.observation_notes,
            subject_name: &request.subject_name,
            rubric_type: request.rubric_type,
            lesson_plan: request.lesson_plan.as_ref(),
        })
        .await?;

    let needs_review = analyses
        .iter()
        .filter(|(_, d)| d.needs_review())
        .map(|(id, _)| id.clone())
        .collect();

    Ok(Json(AnalysisResponse {
        analyses,
        needs_review,
    }))
}

/// POST /api/v1/assist/summary
pub async fn handle_summarize(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequestBody>,
) -> Result<Json<SummaryResponse>, AppError> {
    if request.scores.is_empty() {
        return Err(AppError::Validation(
            "at least one score is required to summarize".to_string(),
        ));
    }

    let summary = state
        .assist
        .summarize_evaluation(SummaryRequest {
            scores: &request.scores,
            justifications: &request.justifications,
            disposition_scores: &request.disposition_scores,
            rubric_type: request.rubric_type,
        })
        .await?;
    Ok(Json(SummaryResponse { summary }))
}
