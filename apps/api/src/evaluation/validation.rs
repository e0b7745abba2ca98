use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::rubric::{CompetencyLevel, Disposition, DispositionLevel, RubricItem, Score};

/// Completion rules, in the order their issues are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    MissingScores,
    BelowMinimum,
    MissingJustifications,
    MissingDispositions,
    DispositionsBelowMinimum,
}

/// One violated rule with every offending id, sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub rule: ValidationRule,
    pub ids: Vec<String>,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids = self.ids.join(", ");
        match self.rule {
            ValidationRule::MissingScores => write!(f, "Missing scores for: {ids}"),
            ValidationRule::BelowMinimum => write!(
                f,
                "Scores below the required minimum of {} ({}): {ids}",
                CompetencyLevel::PASSING.value(),
                CompetencyLevel::PASSING.label()
            ),
            ValidationRule::MissingJustifications => write!(
                f,
                "Justification required for items scored {} or higher: {ids}",
                CompetencyLevel::PASSING.value()
            ),
            ValidationRule::MissingDispositions => {
                write!(f, "Missing disposition scores for: {ids}")
            }
            ValidationRule::DispositionsBelowMinimum => write!(
                f,
                "Disposition scores below the required minimum of {} ({}): {ids}",
                DispositionLevel::PASSING.value(),
                DispositionLevel::PASSING.label()
            ),
        }
    }
}

impl Serialize for ValidationIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationIssue", 3)?;
        state.serialize_field("rule", &self.rule)?;
        state.serialize_field("ids", &self.ids)?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Checks the completion rules for an evaluation against the active rubric set.
///
/// An empty result means the evaluation may be marked completed. Failures are advisory:
/// callers still persist the record, tagged `needs_improvement`.
///
/// Justifications are required only for items scored at or above the passing level;
/// low scores and `not_observed` items need none.
pub fn validate(
    scores: &BTreeMap<String, Score>,
    justifications: &BTreeMap<String, String>,
    disposition_scores: &BTreeMap<String, DispositionLevel>,
    items: &[RubricItem],
    dispositions: &[Disposition],
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let missing = sorted(
        items
            .iter()
            .filter(|item| !scores.contains_key(item.id))
            .map(|item| item.id.to_string()),
    );
    push_issue(&mut issues, ValidationRule::MissingScores, missing);

    let numeric: Vec<(&String, CompetencyLevel)> = scores
        .iter()
        .filter_map(|(id, score)| score.level().map(|level| (id, level)))
        .collect();

    let below_minimum = sorted(
        numeric
            .iter()
            .filter(|(_, level)| *level < CompetencyLevel::PASSING)
            .map(|(id, _)| id.to_string()),
    );
    push_issue(&mut issues, ValidationRule::BelowMinimum, below_minimum);

    let unjustified = sorted(
        numeric
            .iter()
            .filter(|(_, level)| *level >= CompetencyLevel::PASSING)
            .filter(|(id, _)| {
                justifications
                    .get(id.as_str())
                    .map_or(true, |text| text.trim().is_empty())
            })
            .map(|(id, _)| id.to_string()),
    );
    push_issue(&mut issues, ValidationRule::MissingJustifications, unjustified);

    if !dispositions.is_empty() {
        let missing_dispositions = sorted(
            dispositions
                .iter()
                .filter(|d| !disposition_scores.contains_key(d.id))
                .map(|d| d.id.to_string()),
        );
        push_issue(
            &mut issues,
            ValidationRule::MissingDispositions,
            missing_dispositions,
        );
    }

    let low_dispositions = sorted(
        disposition_scores
            .iter()
            .filter(|(_, level)| **level < DispositionLevel::PASSING)
            .map(|(id, _)| id.clone()),
    );
    push_issue(
        &mut issues,
        ValidationRule::DispositionsBelowMinimum,
        low_dispositions,
    );

    issues
}

fn sorted(ids: impl Iterator<Item = String>) -> Vec<String> {
    let mut ids: Vec<String> = ids.collect();
    ids.sort();
    ids
}

fn push_issue(issues: &mut Vec<ValidationIssue>, rule: ValidationRule, ids: Vec<String>) {
    if !ids.is_empty() {
        issues.push(ValidationIssue { rule, ids });
    }
}
