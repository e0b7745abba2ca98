//! Flat, render-ready projection of a stored evaluation.

use serde::Serialize;

use crate::evaluation::aggregate::{DispositionSummary, ScoreSummary};
use crate::evaluation::lifecycle::assess;
use crate::evaluation::models::EvaluationRecord;
use crate::rubric::CompetencyLevel;

#[derive(Debug, Clone, Serialize)]
pub struct ItemRow {
    pub code: &'static str,
    pub title: &'static str,
    pub area: &'static str,
    /// `"Not Scored"` when the item has no score.
    pub score_label: String,
    pub level_description: Option<&'static str>,
    pub justification: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispositionRow {
    pub name: &'static str,
    pub level_label: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationView {
    pub id: String,
    pub rubric_title: &'static str,
    pub student_name: String,
    pub evaluator_name: String,
    pub school_name: Option<String>,
    pub subject_area: Option<String>,
    pub grade_level: Option<String>,
    pub observation_date: Option<String>,
    pub status_label: &'static str,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub items: Vec<ItemRow>,
    pub summary: ScoreSummary,
    pub max_total: u32,
    pub dispositions: Vec<DispositionRow>,
    pub disposition_summary: Option<DispositionSummary>,
    pub issues: Vec<String>,
    pub ai_summary: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl EvaluationView {
    /// Rows follow catalog order; every item and disposition in the set gets a row.
    pub fn from_record(record: &EvaluationRecord) -> Self {
        let form = &record.form;
        let set = form.rubric_type.rubric_set();
        let assessment = assess(form);

        let items = set
            .items
            .iter()
            .map(|item| {
                let score = form.scores.get(item.id).copied();
                ItemRow {
                    code: item.code,
                    title: item.title,
                    area: item.area,
                    score_label: score.map_or_else(|| "Not Scored".to_string(), |s| s.label()),
                    level_description: score
                        .and_then(|s| s.level())
                        .map(|level| item.level_description(level)),
                    justification: non_blank(form.justifications.get(item.id)),
                }
            })
            .collect();

        let dispositions = set
            .dispositions
            .iter()
            .map(|d| DispositionRow {
                name: d.name,
                level_label: form
                    .disposition_scores
                    .get(d.id)
                    .map_or_else(
                        || "Not Scored".to_string(),
                        |l| format!("{} - {}", l.value(), l.label()),
                    ),
                comment: non_blank(form.disposition_comments.get(d.id)),
            })
            .collect();

        EvaluationView {
            id: record.id.clone(),
            rubric_title: set.title,
            student_name: form.student_name.clone(),
            evaluator_name: form.evaluator_name.clone(),
            school_name: non_blank(form.school_name.as_ref()),
            subject_area: non_blank(form.subject_area.as_ref()),
            grade_level: non_blank(form.grade_level.as_ref()),
            observation_date: form.observation_date.map(|d| d.format("%B %-d, %Y").to_string()),
            status_label: record.status.label(),
            created_at: record.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            completed_at: record
                .completed_at
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string()),
            items,
            summary: assessment.summary,
            max_total: set.items.len() as u32 * u32::from(CompetencyLevel::MAX),
            dispositions,
            disposition_summary: assessment.dispositions,
            issues: assessment.issues.iter().map(ToString::to_string).collect(),
            ai_summary: non_blank(form.ai_summary.as_ref()),
        }
    }
}
