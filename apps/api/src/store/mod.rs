//! Evaluation Record Store: a single pretty-printed JSON array on disk.
//!
//! `EvaluationStore` owns the file and an optional in-memory snapshot. Reads serve the
//! snapshot (loading it on first use); every mutation invalidates it, reloads the full list
//! from disk, rewrites the whole file, and keeps what it wrote as the new snapshot.
//!
//! Writes go to a temp file in the same directory and are renamed into place. There is no
//! cross-process locking: one writer process per file.

pub mod transfer;

use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};

use crate::evaluation::models::EvaluationRecord;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not a valid evaluations file: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize evaluations: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

pub struct EvaluationStore {
    path: PathBuf,
    snapshot: Option<Vec<EvaluationRecord>>,
}

impl EvaluationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            snapshot: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record from disk, bypassing the snapshot.
    ///
    /// A missing or empty file is an empty store. Malformed JSON is an error; callers that
    /// prefer to treat corruption as "no data" use `load_all_or_empty`.
    pub fn load_all(&self) -> Result<Vec<EvaluationRecord>, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&text).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Like `load_all`, but an unreadable or malformed file yields an empty list.
    pub fn load_all_or_empty(&self) -> Vec<EvaluationRecord> {
        self.load_all().unwrap_or_else(|e| {
            warn!("Treating evaluations store as empty: {e}");
            Vec::new()
        })
    }

    /// Drops the snapshot; the next read goes to disk.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// Replaces the snapshot with the current file contents.
    pub fn reload(&mut self) -> Result<&[EvaluationRecord], StorageError> {
        let records = self.load_all()?;
        let records: &[EvaluationRecord] = self.snapshot.insert(records);
        Ok(records)
    }

    /// The snapshot, loaded from disk if it was invalidated. May be stale if another
    /// process wrote the file since.
    pub fn records(&mut self) -> Result<&[EvaluationRecord], StorageError> {
        if self.snapshot.is_none() {
            self.reload()?;
        }
        Ok(self.snapshot.as_deref().unwrap_or(&[]))
    }

    pub fn get(&mut self, id: &str) -> Result<Option<EvaluationRecord>, StorageError> {
        Ok(self.records()?.iter().find(|r| r.id == id).cloned())
    }

    /// Replaces the record with the same id in place, or appends it.
    pub fn save(&mut self, record: EvaluationRecord) -> Result<SaveOutcome, StorageError> {
        let mut records = self.fresh()?;

        let outcome = match records.iter().position(|r| r.id == record.id) {
            Some(index) => {
                records[index] = record;
                SaveOutcome::Updated
            }
            None => {
                records.push(record);
                SaveOutcome::Created
            }
        };

        self.persist(records)?;
        Ok(outcome)
    }

    /// Removes the record with `id`. Returns false, without touching the file, when absent.
    pub fn delete_by_id(&mut self, id: &str) -> Result<bool, StorageError> {
        let mut records = self.fresh()?;
        let before = records.len();
        records.retain(|r| r.id != id);

        if records.len() == before {
            self.snapshot = Some(records);
            return Ok(false);
        }

        self.persist(records)?;
        info!("Deleted evaluation {id}");
        Ok(true)
    }

    /// Appends each incoming record whose id is not already stored. Colliding ids are
    /// skipped, including duplicates within `incoming`; the first occurrence wins.
    pub fn import_merge(&mut self, incoming: Vec<EvaluationRecord>) -> Result<usize, StorageError> {
        let mut records = self.fresh()?;
        let mut seen: HashSet<String> = records.iter().map(|r| r.id.clone()).collect();

        let before = records.len();
        records.extend(incoming.into_iter().filter(|r| seen.insert(r.id.clone())));
        let imported = records.len() - before;

        if imported > 0 {
            self.persist(records)?;
        } else {
            self.snapshot = Some(records);
        }
        info!("Imported {imported} evaluation(s)");
        Ok(imported)
    }

    /// Deletes the backing file. A missing file is not an error.
    pub fn clear_all(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        }
        self.snapshot = Some(Vec::new());
        warn!("Cleared all evaluations at {}", self.path.display());
        Ok(())
    }

    /// Invalidate-then-load, so every mutation works on the full on-disk list.
    /// A file that fails to parse is never overwritten.
    fn fresh(&mut self) -> Result<Vec<EvaluationRecord>, StorageError> {
        self.invalidate();
        self.load_all()
    }

    fn persist(&mut self, records: Vec<EvaluationRecord>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&records).map_err(StorageError::Serialize)?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let io_err = |source: io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        fs::create_dir_all(dir).map_err(io_err)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        self.snapshot = Some(records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::evaluation::models::{EvaluationForm, EvaluationStatus};
    use crate::rubric::RubricType;

    fn make_store() -> (tempfile::TempDir, EvaluationStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = EvaluationStore::new(dir.path().join("data").join("evaluations.json"));
        (dir, store)
    }

    fn record(id: &str, student: &str) -> EvaluationRecord {
        EvaluationRecord {
            id: id.to_string(),
            form: EvaluationForm {
                student_name: student.to_string(),
                evaluator_name: "Dr. Smith".to_string(),
                school_name: None,
                subject_area: None,
                grade_level: None,
                observation_date: None,
                rubric_type: RubricType::FieldEvaluation,
                scores: BTreeMap::new(),
                justifications: BTreeMap::new(),
                disposition_scores: BTreeMap::new(),
                disposition_comments: BTreeMap::new(),
                observation_notes: None,
                lesson_plan: None,
                ai_analyses: BTreeMap::new(),
                ai_summary: None,
            },
            total_score: 0,
            status: EvaluationStatus::Draft,
            created_at: Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(),
            completed_at: None,
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (_dir, store) = make_store();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_appends_then_updates_in_place() {
        let (_dir, mut store) = make_store();
        assert_eq!(store.save(record("r1", "Ana")).unwrap(), SaveOutcome::Created);
        assert_eq!(store.save(record("r2", "Ben")).unwrap(), SaveOutcome::Created);
        assert_eq!(
            store.save(record("r1", "Ana Maria")).unwrap(),
            SaveOutcome::Updated
        );

        let on_disk = store.load_all().unwrap();
        let ids: Vec<&str> = on_disk.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
        assert_eq!(on_disk[0].form.student_name, "Ana Maria");
    }

    #[test]
    fn test_reload_after_save_yields_single_latest_record() {
        let (_dir, mut store) = make_store();
        store.save(record("r1", "First")).unwrap();

        let mut modified = store.get("r1").unwrap().unwrap();
        modified.form.student_name = "Second".to_string();
        store.save(modified).unwrap();

        let records = store.reload().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].form.student_name, "Second");
    }

    #[test]
    fn test_file_is_pretty_printed_array() {
        let (_dir, mut store) = make_store();
        store.save(record("r1", "Ana")).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with('['));
        assert!(text.contains("\n  {"));
        assert!(text.contains("\"completed_at\": null"));
    }

    #[test]
    fn test_delete_missing_id_leaves_file_untouched() {
        let (_dir, mut store) = make_store();
        store.save(record("r1", "Ana")).unwrap();
        let before = fs::read(store.path()).unwrap();

        assert!(!store.delete_by_id("nope").unwrap());
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_delete_existing_id() {
        let (_dir, mut store) = make_store();
        store.save(record("r1", "Ana")).unwrap();
        store.save(record("r2", "Ben")).unwrap();

        assert!(store.delete_by_id("r1").unwrap());
        let remaining = store.load_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "r2");
    }

    #[test]
    fn test_import_merge_skips_colliding_ids() {
        let (_dir, mut store) = make_store();
        store.save(record("r1", "Original")).unwrap();

        let imported = store
            .import_merge(vec![record("r1", "Impostor"), record("r2", "New")])
            .unwrap();
        assert_eq!(imported, 1);

        let records = store.load_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].form.student_name, "Original");
        assert_eq!(records[1].id, "r2");
    }

    #[test]
    fn test_import_merge_first_duplicate_in_batch_wins() {
        let (_dir, mut store) = make_store();
        let imported = store
            .import_merge(vec![record("r9", "First"), record("r9", "Second")])
            .unwrap();
        assert_eq!(imported, 1);
        assert_eq!(store.get("r9").unwrap().unwrap().form.student_name, "First");
    }

    #[test]
    fn test_clear_all_removes_file() {
        let (_dir, mut store) = make_store();
        store.save(record("r1", "Ana")).unwrap();
        store.clear_all().unwrap();
        assert!(!store.path().exists());
        assert!(store.records().unwrap().is_empty());
        // Clearing twice is fine.
        store.clear_all().unwrap();
    }

    #[test]
    fn test_malformed_file_is_explicit_error() {
        let (_dir, mut store) = make_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.load_all(), Err(StorageError::Parse { .. })));
        assert!(store.load_all_or_empty().is_empty());

        // Mutations refuse to overwrite a corrupted file.
        assert!(store.save(record("r1", "Ana")).is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[test]
    fn test_snapshot_is_stale_until_reload() {
        let (_dir, mut store) = make_store();
        store.save(record("r1", "Ana")).unwrap();

        let mut other = EvaluationStore::new(store.path());
        other.save(record("r2", "Ben")).unwrap();

        assert_eq!(store.records().unwrap().len(), 1);
        store.invalidate();
        assert_eq!(store.records().unwrap().len(), 2);
    }
}
