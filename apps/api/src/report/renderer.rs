use thiserror::Error;

use crate::report::layout::{compose_pages, paginate, wrap_indented, wrap_text, PageConfig};
use crate::report::view::EvaluationView;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("report rendering failed: {0}")]
    Failed(String),
}

/// A rendered document ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub content_type: &'static str,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Turns an `EvaluationView` into a document. Rendering is synchronous and CPU-bound;
/// async callers run it on the blocking pool.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, view: &EvaluationView) -> Result<RenderedReport, RenderError>;
}

/// Paginated plain-text report with `Page N of M` footers and form-feed page breaks.
pub struct TextReportRenderer {
    pub config: PageConfig,
}

impl TextReportRenderer {
    pub fn new(config: PageConfig) -> Self {
        Self { config }
    }

    fn body_lines(&self, view: &EvaluationView) -> Vec<String> {
        let width = self.config.line_width;
        let mut lines = Vec::new();
        let rule = "=".repeat(width);
        let thin_rule = "-".repeat(width);

        lines.push(rule.clone());
        lines.extend(wrap_text(view.rubric_title, width));
        lines.push(rule.clone());
        lines.push(String::new());

        let header = [
            ("Student", Some(view.student_name.as_str())),
            ("Evaluator", Some(view.evaluator_name.as_str())),
            ("School", view.school_name.as_deref()),
            ("Subject", view.subject_area.as_deref()),
            ("Grade", view.grade_level.as_deref()),
            ("Observed", view.observation_date.as_deref()),
            ("Status", Some(view.status_label)),
            ("Created", Some(view.created_at.as_str())),
            ("Completed", view.completed_at.as_deref()),
        ];
        for (label, value) in header {
            if let Some(value) = value {
                lines.extend(wrap_text(&format!("{label:<10} {value}"), width));
            }
        }
        lines.push(String::new());

        lines.push("COMPETENCY SCORES".to_string());
        lines.push(thin_rule.clone());
        for row in &view.items {
            lines.extend(wrap_text(&format!("{} {}", row.code, row.title), width));
            lines.extend(wrap_indented(&format!("Score: {}", row.score_label), width, 4));
            if let Some(description) = row.level_description {
                lines.extend(wrap_indented(description, width, 4));
            }
            if let Some(justification) = &row.justification {
                lines.extend(wrap_indented(
                    &format!("Justification: {justification}"),
                    width,
                    4,
                ));
            }
            lines.push(String::new());
        }

        lines.push("SUMMARY".to_string());
        lines.push(thin_rule.clone());
        let summary = &view.summary;
        lines.push(format!("Total score: {} / {}", summary.total, view.max_total));
        lines.push(format!(
            "Items scored: {} (not observed: {})",
            summary.scored_count, summary.not_observed
        ));
        lines.push(format!("Average: {:.2}", summary.average));
        lines.push(format!(
            "Minimum level met: {}",
            if summary.meets_minimum { "Yes" } else { "No" }
        ));
        lines.push(String::new());

        if !view.dispositions.is_empty() {
            lines.push("PROFESSIONAL DISPOSITIONS".to_string());
            lines.push(thin_rule.clone());
            for row in &view.dispositions {
                lines.extend(wrap_text(&format!("{}: {}", row.name, row.level_label), width));
                if let Some(comment) = &row.comment {
                    lines.extend(wrap_indented(comment, width, 4));
                }
            }
            if let Some(d) = &view.disposition_summary {
                lines.push(format!("Average: {:.2}", d.average));
            }
            lines.push(String::new());
        }

        if !view.issues.is_empty() {
            lines.push("OUTSTANDING ISSUES".to_string());
            lines.push(thin_rule.clone());
            for issue in &view.issues {
                let mut wrapped = wrap_indented(issue, width, 2).into_iter();
                if let Some(first) = wrapped.next() {
                    lines.push(format!("-{}", &first[1..]));
                }
                lines.extend(wrapped);
            }
            lines.push(String::new());
        }

        if let Some(ai_summary) = &view.ai_summary {
            lines.push("OVERALL SUMMARY".to_string());
            lines.push(thin_rule);
            for paragraph in ai_summary.split("\n\n") {
                lines.extend(wrap_text(paragraph, width));
                lines.push(String::new());
            }
        }

        while lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines
    }
}

impl ReportRenderer for TextReportRenderer {
    fn render(&self, view: &EvaluationView) -> Result<RenderedReport, RenderError> {
        let pages = paginate(self.body_lines(view), &self.config);
        let content = compose_pages(pages, &self.config);
        Ok(RenderedReport {
            content_type: "text/plain; charset=utf-8",
            file_name: report_file_name(view),
            bytes: content.into_bytes(),
        })
    }
}

/// `evaluation_<student>_<id prefix>.txt`, restricted to ASCII alphanumerics and `_`.
fn report_file_name(view: &EvaluationView) -> String {
    let student: String = view
        .student_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let student = student.trim_matches('_');
    let id: String = view
        .id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(8)
        .collect();
    match (student.is_empty(), id.is_empty()) {
        (false, false) => format!("evaluation_{student}_{id}.txt"),
        (false, true) => format!("evaluation_{student}.txt"),
        (true, false) => format!("evaluation_{id}.txt"),
        (true, true) => "evaluation.txt".to_string(),
    }
}
