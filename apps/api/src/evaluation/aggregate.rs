//! Score aggregation: totals, averages, level distributions and the minimum-level check.
//!
//! Pure functions over the in-memory score maps. `NotObserved` entries are counted separately
//! and never contribute to the total, the average, or `meets_minimum`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::rubric::{CompetencyLevel, DispositionLevel, Score};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub total: u32,
    /// Number of numeric scores (excludes `not_observed`).
    pub scored_count: usize,
    pub average: f64,
    /// Count per level 0..=3; every level is present, possibly with 0.
    pub distribution: BTreeMap<u8, usize>,
    pub not_observed: usize,
    /// True iff every numeric score is at least `CompetencyLevel::PASSING`.
    /// Vacuously true with no numeric scores; completeness is the validator's job.
    pub meets_minimum: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispositionSummary {
    pub total: u32,
    pub scored_count: usize,
    pub average: f64,
    /// Count per level 1..=4.
    pub distribution: BTreeMap<u8, usize>,
    pub meets_minimum: bool,
}

pub fn summarize(scores: &BTreeMap<String, Score>) -> ScoreSummary {
    let mut distribution: BTreeMap<u8, usize> =
        CompetencyLevel::all().map(|l| (l.value(), 0)).collect();
    let mut not_observed = 0;
    let mut levels = Vec::with_capacity(scores.len());

    for score in scores.values() {
        match score.level() {
            Some(level) => {
                *distribution.entry(level.value()).or_default() += 1;
                levels.push(level);
            }
            None => not_observed += 1,
        }
    }

    let total: u32 = levels.iter().map(|l| u32::from(l.value())).sum();

    ScoreSummary {
        total,
        scored_count: levels.len(),
        average: mean(total, levels.len()),
        distribution,
        not_observed,
        meets_minimum: levels.iter().all(|&l| l >= CompetencyLevel::PASSING),
    }
}

pub fn summarize_dispositions(scores: &BTreeMap<String, DispositionLevel>) -> DispositionSummary {
    let mut distribution: BTreeMap<u8, usize> =
        DispositionLevel::all().map(|l| (l.value(), 0)).collect();
    for level in scores.values() {
        *distribution.entry(level.value()).or_default() += 1;
    }

    let total: u32 = scores.values().map(|l| u32::from(l.value())).sum();

    DispositionSummary {
        total,
        scored_count: scores.len(),
        average: mean(total, scores.len()),
        distribution,
        meets_minimum: scores.values().all(|&l| l >= DispositionLevel::PASSING),
    }
}

fn mean(total: u32, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        f64::from(total) / count as f64
    }
}
