//! Dashboard statistics across all stored evaluations.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::evaluation::models::{EvaluationRecord, EvaluationStatus};
use crate::rubric::RubricType;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusCounts {
    pub draft: usize,
    pub completed: usize,
    pub needs_improvement: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RubricTypeCounts {
    pub field_evaluation: usize,
    pub ster: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemAverage {
    pub mean: f64,
    pub scored: usize,
    pub not_observed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_evaluations: usize,
    pub by_status: StatusCounts,
    pub by_rubric_type: RubricTypeCounts,
    /// Mean `total_score` over submitted (non-draft) evaluations.
    pub average_total_score: Option<f64>,
    /// Completed share of submitted evaluations, 0.0 – 1.0.
    pub completion_rate: Option<f64>,
    /// Per item id, numeric scores only.
    pub item_averages: BTreeMap<String, ItemAverage>,
}

pub fn compute_dashboard(records: &[EvaluationRecord]) -> DashboardStats {
    let mut by_status = StatusCounts::default();
    let mut by_rubric_type = RubricTypeCounts::default();
    let mut submitted_totals = Vec::new();
    let mut item_sums: BTreeMap<String, (u32, usize, usize)> = BTreeMap::new();

    for record in records {
        match record.status {
            EvaluationStatus::Draft => by_status.draft += 1,
            EvaluationStatus::Completed => by_status.completed += 1,
            EvaluationStatus::NeedsImprovement => by_status.needs_improvement += 1,
        }
        match record.form.rubric_type {
            RubricType::FieldEvaluation => by_rubric_type.field_evaluation += 1,
            RubricType::Ster => by_rubric_type.ster += 1,
        }
        if record.status != EvaluationStatus::Draft {
            submitted_totals.push(record.total_score);
        }

        for (item_id, score) in &record.form.scores {
            let entry = item_sums.entry(item_id.clone()).or_default();
            match score.level() {
                Some(level) => {
                    entry.0 += u32::from(level.value());
                    entry.1 += 1;
                }
                None => entry.2 += 1,
            }
        }
    }

    let submitted = submitted_totals.len();
    let average_total_score = (submitted > 0)
        .then(|| f64::from(submitted_totals.iter().sum::<u32>()) / submitted as f64);
    let completion_rate = (submitted > 0).then(|| by_status.completed as f64 / submitted as f64);

    let item_averages = item_sums
        .into_iter()
        .map(|(id, (sum, scored, not_observed))| {
            let mean = if scored == 0 {
                0.0
            } else {
                f64::from(sum) / scored as f64
            };
            (
                id,
                ItemAverage {
                    mean,
                    scored,
                    not_observed,
                },
            )
        })
        .collect();

    DashboardStats {
        total_evaluations: records.len(),
        by_status,
        by_rubric_type,
        average_total_score,
        completion_rate,
        item_averages,
    }
}
