// All LLM prompts for the assist module.
// Reuses cross-cutting fragments from llm_client::prompts.

use std::fmt::Write;

use crate::assist::{AnalysisRequest, SummaryRequest};
use crate::llm_client::prompts::{EVIDENCE_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::rubric::{CompetencyLevel, RubricItem, Score};

/// System prompt for lesson-plan extraction.
pub const LESSON_PLAN_SYSTEM: &str = "You are an assistant that reads teacher lesson plans \
    and extracts structured metadata for a university field-placement supervisor. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// System prompt shared by justification, analysis and summary drafting.
pub const DRAFTING_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// Lesson-plan extraction prompt. Replace `{lesson_plan_text}` before sending.
pub const LESSON_PLAN_PROMPT_TEMPLATE: &str = r#"Extract information from the lesson plan below.

Return a JSON object with this EXACT schema. Use null for anything the document does not state;
do NOT guess.
{
  "teacher_name": "Jordan Lee",
  "lesson_date": "2026-03-14",
  "subject_area": "Mathematics",
  "grade_levels": ["7"],
  "school_name": "Lincoln Middle School",
  "lesson_topic": "Proportional relationships",
  "class_period": "3rd period",
  "duration": "50 minutes",
  "total_students": 24,
  "standards_referenced": ["CCSS.MATH.7.RP.A.2"],
  "learning_objectives": ["Students will identify the constant of proportionality"],
  "materials": ["graph paper", "ratio tables"],
  "assessment_methods": ["exit ticket"],
  "lesson_structure": "Warm-up, direct instruction, partner practice, exit ticket",
  "notes": "Differentiated tables for ELL students",
  "confidence_score": 0.85
}

confidence_score is your confidence (0.0 - 1.0) that the extraction is accurate and complete.

LESSON PLAN:
{lesson_plan_text}"#;

/// Single-item justification prompt.
/// Replace: {code}, {title}, {area}, {score_label}, {level_description}, {subject},
///          {observation_context}, {evidence_instruction}
pub const JUSTIFICATION_PROMPT_TEMPLATE: &str = r#"Draft a justification for a student teacher's score on one rubric item.

RUBRIC ITEM: {code} {title} ({area})
SCORE GIVEN: {score_label}
LEVEL DESCRIPTOR: {level_description}
SUBJECT: {subject}

OBSERVATION CONTEXT:
{observation_context}

Write 2-4 sentences in a professional, third-person supervisory voice that connect specific
observed behaviors to the level descriptor.

{evidence_instruction}

Return a JSON object with this EXACT schema:
{
  "justification": "During the partner practice, the candidate ...",
  "confidence": 0.8,
  "evidence_found": true
}"#;

/// Multi-item analysis prompt.
/// Replace: {rubric_name}, {subject}, {lesson_plan_context}, {items}, {observation_notes},
///          {evidence_instruction}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the observation notes against each rubric item listed below.

RUBRIC: {rubric_name}
SUBJECT: {subject}
{lesson_plan_context}
RUBRIC ITEMS:
{items}

OBSERVATION NOTES:
{observation_notes}

For EVERY item above, write a 2-3 sentence analysis of what the notes show about that item.
Do NOT suggest a score.

{evidence_instruction}

Return a JSON object with this EXACT schema, one entry per item id:
{
  "analyses": [
    {"item_id": "fe_learning_objectives", "text": "...", "confidence": 0.7, "evidence_found": true}
  ]
}"#;

/// Evaluation summary prompt.
/// Replace: {rubric_name}, {scores}, {dispositions}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Write a summary of a student teacher's evaluation.

RUBRIC: {rubric_name}

ITEM SCORES AND JUSTIFICATIONS:
{scores}

DISPOSITIONS:
{dispositions}

Write one paragraph of 4-6 sentences: overall performance, the clearest strengths, and the
areas most in need of growth. Refer only to the scores and justifications above.

Return a JSON object with this EXACT schema:
{
  "summary": "..."
}"#;

pub fn lesson_plan_prompt(text: &str) -> String {
    LESSON_PLAN_PROMPT_TEMPLATE.replace("{lesson_plan_text}", text)
}

pub fn justification_prompt(
    item: &RubricItem,
    score: Score,
    subject_name: &str,
    observation_context: &str,
) -> String {
    let level_description = match score.level() {
        Some(level) => item.level_description(level),
        None => "The item was not observed during this visit.",
    };
    JUSTIFICATION_PROMPT_TEMPLATE
        .replace("{code}", item.code)
        .replace("{title}", item.title)
        .replace("{area}", item.area)
        .replace("{score_label}", &score.label())
        .replace("{level_description}", level_description)
        .replace("{subject}", or_unspecified(subject_name))
        .replace("{evidence_instruction}", EVIDENCE_INSTRUCTION)
        .replace("{observation_context}", observation_context)
}

pub fn analysis_prompt(request: &AnalysisRequest<'_>) -> String {
    let mut items = String::new();
    for item in request.items {
        let _ = writeln!(items, "- {} [{}] {}: {}", item.id, item.code, item.title, item.area);
        for level in CompetencyLevel::all() {
            let _ = writeln!(
                items,
                "    {} ({}): {}",
                level.value(),
                level.label(),
                item.level_description(level)
            );
        }
    }

    let lesson_plan_context = request
        .lesson_plan
        .map(|plan| format!("\nLESSON PLAN:\n{}\n", plan.prompt_context()))
        .unwrap_or_default();

    ANALYSIS_PROMPT_TEMPLATE
        .replace("{rubric_name}", request.rubric_type.display_name())
        .replace("{subject}", or_unspecified(request.subject_name))
        .replace("{lesson_plan_context}", &lesson_plan_context)
        .replace("{items}", &items)
        .replace("{evidence_instruction}", EVIDENCE_INSTRUCTION)
        .replace("{observation_notes}", request.observation_notes)
}

pub fn summary_prompt(request: &SummaryRequest<'_>) -> String {
    let set = request.rubric_type.rubric_set();

    let mut scores = String::new();
    for item in set.items {
        let Some(score) = request.scores.get(item.id) else {
            continue;
        };
        let _ = writeln!(scores, "- {} {}: {}", item.code, item.title, score.label());
        if let Some(text) = request.justifications.get(item.id) {
            if !text.trim().is_empty() {
                let _ = writeln!(scores, "    Justification: {}", text.trim());
            }
        }
    }
    if scores.is_empty() {
        scores.push_str("(no items scored)\n");
    }

    let mut dispositions = String::new();
    for disposition in set.dispositions {
        if let Some(level) = request.disposition_scores.get(disposition.id) {
            let _ = writeln!(
                dispositions,
                "- {}: {} ({})",
                disposition.name,
                level.value(),
                level.label()
            );
        }
    }
    if dispositions.is_empty() {
        dispositions.push_str("(none)\n");
    }

    SUMMARY_PROMPT_TEMPLATE
        .replace("{rubric_name}", set.title)
        .replace("{dispositions}", &dispositions)
        .replace("{scores}", &scores)
}

fn or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        "Not specified"
    } else {
        value
    }
}
