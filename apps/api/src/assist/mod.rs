//! AI Assist: lesson-plan extraction and evidence-based drafting.
//!
//! `AppState` holds an `Arc<dyn AssistService>`. `LlmAssistService` is the production backend;
//! tests swap in a fake. Every drafted text comes back as a `DraftedText` carrying its own
//! confidence and warning, so callers never scan prose for markers.

pub mod handlers;
pub mod lesson_plan;
pub mod prompts;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{LlmClient, LlmError};
use crate::rubric::{DispositionLevel, RubricItem, RubricType, Score};

pub use lesson_plan::LessonPlanInfo;

/// Below this confidence a draft with evidence is still flagged for review.
pub const LOW_CONFIDENCE_THRESHOLD: f32 = 0.5;

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("AI assist is not configured: {0}")]
    NotConfigured(String),

    #[error("Lesson plan extraction failed: {0}")]
    Extraction(String),

    #[error("Text generation failed: {0}")]
    Generation(String),

    #[error("{0}")]
    InvalidInput(String),
}

impl AssistError {
    fn extraction(e: LlmError) -> Self {
        match e {
            LlmError::NotConfigured => AssistError::NotConfigured(e.to_string()),
            other => AssistError::Extraction(other.to_string()),
        }
    }

    fn generation(e: LlmError) -> Self {
        match e {
            LlmError::NotConfigured => AssistError::NotConfigured(e.to_string()),
            other => AssistError::Generation(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistWarning {
    /// The notes held no evidence for this item.
    InsufficientEvidence,
    /// Evidence was found but the model reported low confidence.
    LowConfidence,
}

/// Model-drafted text plus the signal needed to decide whether a human must review it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftedText {
    pub text: String,
    /// 0.0 – 1.0
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<AssistWarning>,
}

impl DraftedText {
    pub fn from_model(text: String, confidence: f32, evidence_found: bool) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let warning = if !evidence_found || text.trim().is_empty() {
            Some(AssistWarning::InsufficientEvidence)
        } else if confidence < LOW_CONFIDENCE_THRESHOLD {
            Some(AssistWarning::LowConfidence)
        } else {
            None
        };
        Self {
            text: text.trim().to_string(),
            confidence,
            warning,
        }
    }

    /// Placeholder for an item the model skipped entirely.
    pub fn missing() -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
            warning: Some(AssistWarning::InsufficientEvidence),
        }
    }

    pub fn needs_review(&self) -> bool {
        self.warning.is_some()
    }
}

/// Inputs for drafting analyses across several rubric items at once.
pub struct AnalysisRequest<'a> {
    pub items: &'a [&'static RubricItem],
    pub observation_notes: &'a str,
    pub subject_name: &'a str,
    pub rubric_type: RubricType,
    pub lesson_plan: Option<&'a LessonPlanInfo>,
}

/// Inputs for summarizing a scored evaluation.
pub struct SummaryRequest<'a> {
    pub scores: &'a BTreeMap<String, Score>,
    pub justifications: &'a BTreeMap<String, String>,
    pub disposition_scores: &'a BTreeMap<String, DispositionLevel>,
    pub rubric_type: RubricType,
}

/// The assist boundary. Implement this to swap backends without touching handlers.
#[async_trait]
pub trait AssistService: Send + Sync {
    async fn extract_lesson_plan_info(&self, text: &str) -> Result<LessonPlanInfo, AssistError>;

    async fn draft_justification(
        &self,
        item: &RubricItem,
        score: Score,
        subject_name: &str,
        observation_context: &str,
    ) -> Result<DraftedText, AssistError>;

    /// Returns one entry per requested item.
    async fn draft_analysis_for_items(
        &self,
        request: AnalysisRequest<'_>,
    ) -> Result<BTreeMap<String, DraftedText>, AssistError>;

    async fn summarize_evaluation(&self, request: SummaryRequest<'_>)
        -> Result<String, AssistError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmAssistService
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct JustificationResponse {
    justification: String,
    #[serde(default)]
    confidence: Option<f32>,
    /// Missing or null means the model did not flag a lack of evidence.
    #[serde(default)]
    evidence_found: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ItemAnalysis {
    item_id: String,
    text: String,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    evidence_found: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    analyses: Vec<ItemAnalysis>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: String,
}

pub struct LlmAssistService(pub LlmClient);

#[async_trait]
impl AssistService for LlmAssistService {
    async fn extract_lesson_plan_info(&self, text: &str) -> Result<LessonPlanInfo, AssistError> {
        require_text(text, "lesson plan text")?;
        let prompt = prompts::lesson_plan_prompt(text);
        let info: LessonPlanInfo = self
            .0
            .call_json(&prompt, prompts::LESSON_PLAN_SYSTEM)
            .await
            .map_err(AssistError::extraction)?;
        Ok(info.normalized())
    }

    async fn draft_justification(
        &self,
        item: &RubricItem,
        score: Score,
        subject_name: &str,
        observation_context: &str,
    ) -> Result<DraftedText, AssistError> {
        require_text(observation_context, "observation context")?;
        let prompt =
            prompts::justification_prompt(item, score, subject_name, observation_context);
        let response: JustificationResponse = self
            .0
            .call_json(&prompt, prompts::DRAFTING_SYSTEM)
            .await
            .map_err(AssistError::generation)?;
        Ok(DraftedText::from_model(
            response.justification,
            response.confidence.unwrap_or_default(),
            response.evidence_found.unwrap_or(true),
        ))
    }

    async fn draft_analysis_for_items(
        &self,
        request: AnalysisRequest<'_>,
    ) -> Result<BTreeMap<String, DraftedText>, AssistError> {
        require_text(request.observation_notes, "observation notes")?;
        if request.items.is_empty() {
            return Ok(BTreeMap::new());
        }

        let prompt = prompts::analysis_prompt(&request);
        let response: AnalysisResponse = self
            .0
            .call_json(&prompt, prompts::DRAFTING_SYSTEM)
            .await
            .map_err(AssistError::generation)?;

        let drafted = collect_analyses(request.items, response.analyses);
        let flagged = drafted.values().filter(|d| d.needs_review()).count();
        info!(
            "Drafted {} item analyses ({} flagged for review)",
            drafted.len(),
            flagged
        );
        Ok(drafted)
    }

    async fn summarize_evaluation(
        &self,
        request: SummaryRequest<'_>,
    ) -> Result<String, AssistError> {
        let prompt = prompts::summary_prompt(&request);
        let response: SummaryResponse = self
            .0
            .call_json(&prompt, prompts::DRAFTING_SYSTEM)
            .await
            .map_err(AssistError::generation)?;
        Ok(response.summary.trim().to_string())
    }
}

fn require_text(text: &str, what: &str) -> Result<(), AssistError> {
    if text.trim().is_empty() {
        return Err(AssistError::InvalidInput(format!("{what} cannot be empty")));
    }
    Ok(())
}

/// Keeps one entry per requested item: analyses for unknown ids are dropped, items the model
/// skipped get `DraftedText::missing()`.
fn collect_analyses(
    items: &[&'static RubricItem],
    analyses: Vec<ItemAnalysis>,
) -> BTreeMap<String, DraftedText> {
    let mut drafted: BTreeMap<String, DraftedText> = BTreeMap::new();
    for analysis in analyses {
        if !items.iter().any(|item| item.id == analysis.item_id) {
            warn!("Model returned analysis for unrequested item {}", analysis.item_id);
            continue;
        }
        drafted.entry(analysis.item_id).or_insert_with(|| {
            DraftedText::from_model(
                analysis.text,
                analysis.confidence.unwrap_or_default(),
                analysis.evidence_found.unwrap_or(true),
            )
        });
    }
    for item in items {
        drafted
            .entry(item.id.to_string())
            .or_insert_with(DraftedText::missing);
    }
    drafted
}
