//! Axum route handlers for rubrics, evaluations, dashboard, and import/export.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::evaluation::lifecycle::{assess, check_form, prepare_record, Assessment, SaveAction};
use crate::evaluation::models::{EvaluationForm, EvaluationInput, EvaluationRecord, EvaluationStatus};
use crate::evaluation::stats::{compute_dashboard, DashboardStats};
use crate::rubric::{RubricSet, RubricType};
use crate::state::AppState;
use crate::store::transfer::{export_bundle, parse_import_str, ExportBundle};
use crate::store::SaveOutcome;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<EvaluationStatus>,
    pub rubric_type: Option<RubricType>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub evaluations: Vec<EvaluationRecord>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub evaluation: EvaluationInput,
    #[serde(default)]
    pub action: SaveAction,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub evaluation: EvaluationRecord,
    pub created: bool,
    pub assessment: Assessment,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub id: String,
    pub status: EvaluationStatus,
    pub assessment: Assessment,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub skipped: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/rubrics/:rubric_type
pub async fn handle_get_rubric(Path(rubric_type): Path<String>) -> Result<Json<RubricSet>, AppError> {
    let rubric_type: RubricType = rubric_type.parse().map_err(AppError::NotFound)?;
    Ok(Json(rubric_type.rubric_set()))
}

/// GET /api/v1/evaluations
///
/// Optional `status` and `rubric_type` query filters.
pub async fn handle_list_evaluations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let mut store = state.store.lock().await;
    let evaluations: Vec<EvaluationRecord> = store
        .records()?
        .iter()
        .filter(|r| query.status.map_or(true, |s| r.status == s))
        .filter(|r| query.rubric_type.map_or(true, |t| r.form.rubric_type == t))
        .cloned()
        .collect();

    Ok(Json(ListResponse {
        count: evaluations.len(),
        evaluations,
    }))
}

/// POST /api/v1/evaluations
///
/// Saves a draft or submits for completion. Submissions that fail validation are still
/// stored, as `needs_improvement`, with the issues returned in `assessment`.
pub async fn handle_save_evaluation(
    State(state): State<AppState>,
    Json(request): Json<SaveRequest>,
) -> Result<Json<SaveResponse>, AppError> {
    check_form(&request.evaluation.form).map_err(AppError::Validation)?;

    let mut store = state.store.lock().await;
    let existing = match request
        .evaluation
        .id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
    {
        Some(id) => store.get(id)?,
        None => None,
    };

    let (record, assessment) =
        prepare_record(request.evaluation, request.action, existing.as_ref(), Utc::now());
    let outcome = store.save(record.clone())?;

    info!(
        "Saved evaluation {} as {} ({} issue(s))",
        record.id,
        record.status.label(),
        assessment.issues.len()
    );

    Ok(Json(SaveResponse {
        evaluation: record,
        created: outcome == SaveOutcome::Created,
        assessment,
    }))
}

/// GET /api/v1/evaluations/:id
pub async fn handle_get_evaluation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EvaluationRecord>, AppError> {
    let record = state
        .store
        .lock()
        .await
        .get(&id)?
        .ok_or_else(|| AppError::NotFound(format!("evaluation '{id}'")))?;
    Ok(Json(record))
}

/// DELETE /api/v1/evaluations/:id
pub async fn handle_delete_evaluation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = state.store.lock().await.delete_by_id(&id)?;
    if !deleted {
        return Err(AppError::NotFound(format!("evaluation '{id}'")));
    }
    Ok(Json(DeleteResponse { deleted }))
}

/// DELETE /api/v1/evaluations
pub async fn handle_clear_evaluations(
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.store.lock().await.clear_all()?;
    Ok(Json(DeleteResponse { deleted: true }))
}

/// GET /api/v1/evaluations/:id/summary
pub async fn handle_evaluation_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SummaryResponse>, AppError> {
    let record = state
        .store
        .lock()
        .await
        .get(&id)?
        .ok_or_else(|| AppError::NotFound(format!("evaluation '{id}'")))?;

    Ok(Json(SummaryResponse {
        assessment: assess(&record.form),
        id: record.id,
        status: record.status,
    }))
}

/// POST /api/v1/validate
///
/// Aggregates and validates an unsaved form. Nothing is persisted.
pub async fn handle_validate(
    Json(form): Json<EvaluationForm>,
) -> Result<Json<Assessment>, AppError> {
    check_form(&form).map_err(AppError::Validation)?;
    Ok(Json(assess(&form)))
}

/// GET /api/v1/dashboard
///
/// Reads the file directly; a corrupt file shows as an empty dashboard.
pub async fn handle_dashboard(State(state): State<AppState>) -> Json<DashboardStats> {
    let records = state.store.lock().await.load_all_or_empty();
    Json(compute_dashboard(&records))
}

/// GET /api/v1/export
pub async fn handle_export(State(state): State<AppState>) -> Result<Json<ExportBundle>, AppError> {
    let records = state.store.lock().await.records()?.to_vec();
    info!("Exporting {} evaluation(s)", records.len());
    Ok(Json(export_bundle(records, Utc::now())))
}

/// POST /api/v1/import
///
/// Takes the raw body so malformed JSON surfaces as an import format error.
/// Records whose id already exists are skipped.
pub async fn handle_import(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>, AppError> {
    let incoming = parse_import_str(&body)?;
    let total = incoming.len();
    let imported = state.store.lock().await.import_merge(incoming)?;

    Ok(Json(ImportResponse {
        imported,
        skipped: total - imported,
    }))
}
