use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::errors::AppError;
use crate::report::{EvaluationView, RenderError};
use crate::state::AppState;

/// GET /api/v1/evaluations/:id/report
///
/// Renders the stored evaluation and returns it as a download.
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let record = state
        .store
        .lock()
        .await
        .get(&id)?
        .ok_or_else(|| AppError::NotFound(format!("evaluation '{id}'")))?;

    let renderer = state.renderer.clone();
    let report = tokio::task::spawn_blocking(move || {
        let view = EvaluationView::from_record(&record);
        renderer.render(&view)
    })
    .await
    .map_err(|e| RenderError::Failed(format!("render task failed: {e}")))??;

    info!(
        "Rendered report for evaluation {id} ({} bytes)",
        report.bytes.len()
    );

    let disposition = format!("attachment; filename=\"{}\"", report.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, report.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    )
        .into_response())
}
