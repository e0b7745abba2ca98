use std::sync::Arc;

use tokio::sync::Mutex;

use crate::assist::AssistService;
use crate::report::ReportRenderer;
use crate::store::EvaluationStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Single writer: every read-modify-write holds this lock for its whole duration.
    pub store: Arc<Mutex<EvaluationStore>>,
    /// Pluggable assist backend. Default: LlmAssistService.
    pub assist: Arc<dyn AssistService>,
    pub renderer: Arc<dyn ReportRenderer>,
}
