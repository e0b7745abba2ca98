//! Lesson-plan metadata and uploaded-document text extraction.

use std::fmt::Write;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::assist::AssistError;

/// Metadata pulled from a lesson plan. Every field is optional; absent fields stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LessonPlanInfo {
    pub teacher_name: Option<String>,
    pub lesson_date: Option<String>,
    pub subject_area: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub grade_levels: Vec<String>,
    pub school_name: Option<String>,
    pub lesson_topic: Option<String>,
    pub class_period: Option<String>,
    pub duration: Option<String>,
    pub total_students: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub standards_referenced: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub learning_objectives: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub materials: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub assessment_methods: Vec<String>,
    pub lesson_structure: Option<String>,
    pub notes: Option<String>,
    /// 0.0 – 1.0
    #[serde(deserialize_with = "null_as_default")]
    pub confidence_score: f32,
}

/// The extraction prompt asks the model for `null` on anything the document does not state.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl LessonPlanInfo {
    /// Trims strings, drops blanks, and clamps the confidence score.
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.teacher_name,
            &mut self.lesson_date,
            &mut self.subject_area,
            &mut self.school_name,
            &mut self.lesson_topic,
            &mut self.class_period,
            &mut self.duration,
            &mut self.lesson_structure,
            &mut self.notes,
        ] {
            *field = field
                .take()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
        }
        for list in [
            &mut self.grade_levels,
            &mut self.standards_referenced,
            &mut self.learning_objectives,
            &mut self.materials,
            &mut self.assessment_methods,
        ] {
            list.retain(|s| !s.trim().is_empty());
            for s in list.iter_mut() {
                *s = s.trim().to_string();
            }
        }
        self.confidence_score = if self.confidence_score.is_finite() {
            self.confidence_score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// Plain-text block describing the plan, for inclusion in drafting prompts.
    pub fn prompt_context(&self) -> String {
        let mut out = String::new();
        let scalars = [
            ("Topic", &self.lesson_topic),
            ("Subject", &self.subject_area),
            ("Date", &self.lesson_date),
            ("Period", &self.class_period),
            ("Duration", &self.duration),
            ("Structure", &self.lesson_structure),
            ("Notes", &self.notes),
        ];
        for (label, value) in scalars {
            if let Some(value) = value {
                let _ = writeln!(out, "{label}: {value}");
            }
        }
        if !self.grade_levels.is_empty() {
            let _ = writeln!(out, "Grades: {}", self.grade_levels.join(", "));
        }
        if let Some(n) = self.total_students {
            let _ = writeln!(out, "Students: {n}");
        }
        let lists = [
            ("Objectives", &self.learning_objectives),
            ("Standards", &self.standards_referenced),
            ("Materials", &self.materials),
            ("Assessment", &self.assessment_methods),
        ];
        for (label, values) in lists {
            if !values.is_empty() {
                let _ = writeln!(out, "{label}:");
                for v in values {
                    let _ = writeln!(out, "  - {v}");
                }
            }
        }
        if out.is_empty() {
            out.push_str("(no lesson plan details)\n");
        }
        out
    }
}

fn is_pdf(file_name: Option<&str>, content_type: Option<&str>, bytes: &[u8]) -> bool {
    content_type == Some("application/pdf")
        || file_name.is_some_and(|n| n.to_ascii_lowercase().ends_with(".pdf"))
        || bytes.starts_with(b"%PDF")
}

/// Converts an uploaded document to plain text. PDFs go through `pdf_extract` on the blocking
/// pool; everything else must be UTF-8 text.
pub async fn document_to_text(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: bytes::Bytes,
) -> Result<String, AssistError> {
    if bytes.is_empty() {
        return Err(AssistError::InvalidInput("uploaded file is empty".to_string()));
    }

    let text = if is_pdf(file_name, content_type, &bytes) {
        let size = bytes.len();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| AssistError::Extraction(format!("PDF extraction task failed: {e}")))?
            .map_err(|e| AssistError::Extraction(format!("could not read PDF: {e}")))?;
        info!("Extracted {} chars from {} byte PDF", text.len(), size);
        text
    } else {
        String::from_utf8(bytes.to_vec()).map_err(|_| {
            AssistError::InvalidInput("uploaded file must be a PDF or UTF-8 text".to_string())
        })?
    };

    if text.trim().is_empty() {
        return Err(AssistError::Extraction(
            "no text could be extracted from the document".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::parse_json_text;

    #[test]
    fn test_partial_model_output_fills_defaults() {
        let info: LessonPlanInfo = parse_json_text(
            r#"{"lesson_topic": "  Fractions ", "teacher_name": "", "grade_levels": ["4", " "],
                "total_students": 22, "confidence_score": 1.7}"#,
        )
        .unwrap();
        let info = info.normalized();
        assert_eq!(info.lesson_topic.as_deref(), Some("Fractions"));
        assert!(info.teacher_name.is_none());
        assert_eq!(info.grade_levels, vec!["4".to_string()]);
        assert_eq!(info.total_students, Some(22));
        assert_eq!(info.confidence_score, 1.0);
        assert!(info.materials.is_empty());
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let info: LessonPlanInfo = parse_json_text(
            r#"{"lesson_topic":"Fractions","standards_referenced":null,"materials":null,"confidence_score":0.8}"#,
        )
        .unwrap();
        assert_eq!(info.lesson_topic.as_deref(), Some("Fractions"));
        assert!(info.standards_referenced.is_empty());
        assert!(info.materials.is_empty());
        assert_eq!(info.confidence_score, 0.8);

        let info: LessonPlanInfo = parse_json_text(
            r#"{"confidence_score": null, "grade_levels": null, "learning_objectives": null,
                "assessment_methods": null, "total_students": null, "teacher_name": null}"#,
        )
        .unwrap();
        assert_eq!(info, LessonPlanInfo::default());
    }

    #[test]
    fn test_prompt_context() {
        let info = LessonPlanInfo {
            lesson_topic: Some("Fractions".to_string()),
            learning_objectives: vec!["Compare unit fractions".to_string()],
            total_students: Some(18),
            ..LessonPlanInfo::default()
        };
        let ctx = info.prompt_context();
        assert!(ctx.contains("Topic: Fractions"));
        assert!(ctx.contains("  - Compare unit fractions"));
        assert!(ctx.contains("Students: 18"));
        assert_eq!(
            LessonPlanInfo::default().prompt_context(),
            "(no lesson plan details)\n"
        );
    }

    #[test]
    fn test_pdf_detection() {
        assert!(is_pdf(Some("Plan.PDF"), None, b""));
        assert!(is_pdf(None, Some("application/pdf"), b""));
        assert!(is_pdf(None, None, b"%PDF-1.7"));
        assert!(!is_pdf(Some("plan.txt"), Some("text/plain"), b"hello"));
    }

    #[tokio::test]
    async fn test_text_upload_passes_through() {
        let text = document_to_text(
            Some("plan.txt"),
            Some("text/plain"),
            bytes::Bytes::from_static(b"Objective: add fractions"),
        )
        .await
        .unwrap();
        assert_eq!(text, "Objective: add fractions");
    }

    #[tokio::test]
    async fn test_empty_and_binary_uploads_rejected() {
        let empty = document_to_text(None, None, bytes::Bytes::new()).await;
        assert!(matches!(empty, Err(AssistError::InvalidInput(_))));

        let binary =
            document_to_text(Some("x.bin"), None, bytes::Bytes::from_static(&[0xff, 0xfe, 0x00]))
                .await;
        assert!(matches!(binary, Err(AssistError::InvalidInput(_))));

        let blank = document_to_text(None, None, bytes::Bytes::from_static(b"   \n")).await;
        assert!(matches!(blank, Err(AssistError::Extraction(_))));
    }

    #[tokio::test]
    async fn test_garbage_pdf_is_extraction_error() {
        let result = document_to_text(
            Some("plan.pdf"),
            Some("application/pdf"),
            bytes::Bytes::from_static(b"%PDF-1.4 not really a pdf"),
        )
        .await;
        assert!(matches!(result, Err(AssistError::Extraction(_))));
    }
}
