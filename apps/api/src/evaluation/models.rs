use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::assist::{DraftedText, LessonPlanInfo};
use crate::rubric::{DispositionLevel, RubricType, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Draft,
    Completed,
    NeedsImprovement,
}

impl EvaluationStatus {
    pub fn label(self) -> &'static str {
        match self {
            EvaluationStatus::Draft => "Draft",
            EvaluationStatus::Completed => "Completed",
            EvaluationStatus::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Everything an evaluator fills in. Shared by the save request and the stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationForm {
    pub student_name: String,
    pub evaluator_name: String,
    #[serde(default)]
    pub school_name: Option<String>,
    #[serde(default)]
    pub subject_area: Option<String>,
    #[serde(default)]
    pub grade_level: Option<String>,
    #[serde(default)]
    pub observation_date: Option<NaiveDate>,
    pub rubric_type: RubricType,
    #[serde(default)]
    pub scores: BTreeMap<String, Score>,
    #[serde(default)]
    pub justifications: BTreeMap<String, String>,
    #[serde(default)]
    pub disposition_scores: BTreeMap<String, DispositionLevel>,
    #[serde(default)]
    pub disposition_comments: BTreeMap<String, String>,
    #[serde(default)]
    pub observation_notes: Option<String>,
    #[serde(default)]
    pub lesson_plan: Option<LessonPlanInfo>,
    #[serde(default)]
    pub ai_analyses: BTreeMap<String, DraftedText>,
    #[serde(default)]
    pub ai_summary: Option<String>,
}

/// A persisted evaluation. Re-saving with the same `id` overwrites the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: String,
    #[serde(flatten)]
    pub form: EvaluationForm,
    #[serde(default)]
    pub total_score: u32,
    pub status: EvaluationStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Save payload: a form plus the id of the record it replaces, if any.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(flatten)]
    pub form: EvaluationForm,
}
