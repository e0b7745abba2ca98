//! Import/export bundle: `{ "evaluations": [...], "export_date": ..., "version": ... }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::evaluation::aggregate::summarize;
use crate::evaluation::models::EvaluationRecord;

pub const EXPORT_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportBundle {
    pub evaluations: Vec<EvaluationRecord>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

/// A malformed import payload. Nothing is imported when this is returned.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("import payload is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("import payload must be an object with an 'evaluations' array")]
    MissingEvaluations,

    #[error("evaluation at index {index} is malformed: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

pub fn export_bundle(evaluations: Vec<EvaluationRecord>, now: DateTime<Utc>) -> ExportBundle {
    ExportBundle {
        evaluations,
        export_date: now,
        version: EXPORT_FORMAT_VERSION.to_string(),
    }
}

/// Extracts the records from an import payload. Every element must parse and carry a non-blank
/// id; one bad record rejects the whole payload. `total_score` is recomputed from the scores.
/// `export_date` and `version` are informational and not checked.
pub fn parse_import(payload: Value) -> Result<Vec<EvaluationRecord>, FormatError> {
    let Value::Object(mut object) = payload else {
        return Err(FormatError::MissingEvaluations);
    };
    let Some(Value::Array(items)) = object.remove("evaluations") else {
        return Err(FormatError::MissingEvaluations);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let mut record: EvaluationRecord =
                serde_json::from_value(item).map_err(|e| FormatError::InvalidRecord {
                    index,
                    reason: e.to_string(),
                })?;
            if record.id.trim().is_empty() {
                return Err(FormatError::InvalidRecord {
                    index,
                    reason: "id must not be blank".to_string(),
                });
            }
            record.total_score = summarize(&record.form.scores).total;
            Ok(record)
        })
        .collect()
}

pub fn parse_import_str(text: &str) -> Result<Vec<EvaluationRecord>, FormatError> {
    let payload: Value = serde_json::from_str(text).map_err(FormatError::InvalidJson)?;
    parse_import(payload)
}
