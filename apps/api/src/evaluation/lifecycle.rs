//! Evaluation lifecycle: turns a submitted form into a stored record.
//!
//! Drafts are stored as-is. Submissions run the validator: a clean result is `completed`,
//! anything else is still stored but tagged `needs_improvement`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::evaluation::aggregate::{
    summarize, summarize_dispositions, DispositionSummary, ScoreSummary,
};
use crate::evaluation::models::{
    EvaluationForm, EvaluationInput, EvaluationRecord, EvaluationStatus,
};
use crate::evaluation::validation::{validate, ValidationIssue};
use crate::rubric::RubricSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveAction {
    #[default]
    Draft,
    Submit,
}

/// Aggregates and validation issues for one form.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub summary: ScoreSummary,
    /// `None` when the rubric set has no dispositions.
    pub dispositions: Option<DispositionSummary>,
    pub issues: Vec<ValidationIssue>,
    pub eligible_for_completion: bool,
}

pub fn assess(form: &EvaluationForm) -> Assessment {
    let set = form.rubric_type.rubric_set();
    let issues = validate(
        &form.scores,
        &form.justifications,
        &form.disposition_scores,
        set.items,
        set.dispositions,
    );
    Assessment {
        summary: summarize(&form.scores),
        dispositions: (!set.dispositions.is_empty())
            .then(|| summarize_dispositions(&form.disposition_scores)),
        eligible_for_completion: issues.is_empty(),
        issues,
    }
}

/// Rejects forms that cannot be stored at all: blank names, or ids that are not part of
/// the selected rubric set. Completion rules are not checked here.
pub fn check_form(form: &EvaluationForm) -> Result<(), String> {
    if form.student_name.trim().is_empty() {
        return Err("student_name cannot be empty".to_string());
    }
    if form.evaluator_name.trim().is_empty() {
        return Err("evaluator_name cannot be empty".to_string());
    }

    let set = form.rubric_type.rubric_set();
    let keyed_items = form
        .scores
        .keys()
        .chain(form.justifications.keys())
        .chain(form.ai_analyses.keys());
    if let Some(unknown) = keyed_items.into_iter().find(|id| set.item(id).is_none()) {
        return Err(unknown_id(&set, "rubric item", unknown));
    }

    let keyed_dispositions = form
        .disposition_scores
        .keys()
        .chain(form.disposition_comments.keys());
    if let Some(unknown) = keyed_dispositions
        .into_iter()
        .find(|id| set.disposition(id).is_none())
    {
        return Err(unknown_id(&set, "disposition", unknown));
    }

    Ok(())
}

fn unknown_id(set: &RubricSet, kind: &str, id: &str) -> String {
    format!(
        "unknown {kind} '{id}' for rubric type '{}'",
        set.rubric_type.as_str()
    )
}

/// Builds the record to persist for `input`.
///
/// `existing` is the stored record with the same id, if any; its `created_at` is kept.
pub fn prepare_record(
    input: EvaluationInput,
    action: SaveAction,
    existing: Option<&EvaluationRecord>,
    now: DateTime<Utc>,
) -> (EvaluationRecord, Assessment) {
    let assessment = assess(&input.form);

    let (status, completed_at) = match action {
        SaveAction::Draft => (EvaluationStatus::Draft, None),
        SaveAction::Submit if assessment.eligible_for_completion => {
            (EvaluationStatus::Completed, Some(now))
        }
        SaveAction::Submit => (EvaluationStatus::NeedsImprovement, None),
    };

    let id = input
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let record = EvaluationRecord {
        id,
        total_score: assessment.summary.total,
        form: input.form,
        status,
        created_at: existing.map_or(now, |r| r.created_at),
        completed_at,
    };

    (record, assessment)
}
