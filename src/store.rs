use crate::model::{Grade, GradeRow, Semester, StudentSummary, Term};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use thiserror::Error;

pub const SEMESTERS_KEY: &str = "semesters";
pub const STUDENT_KEY: &str = "student";

/// Minimal string key-value persistence the record store sits on.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
    /// Writes every entry or none of them.
    fn set_many(&mut self, entries: &[(&str, &str)]) -> anyhow::Result<()>;
    fn clear(&mut self) -> anyhow::Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_many(&mut self, entries: &[(&str, &str)]) -> anyhow::Result<()> {
        for (key, value) in entries {
            self.entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("semester already recorded: part={part} semester={term}")]
    DuplicateSemester { part: String, term: Term },

    #[error("semester not found: part={part} semester={term}")]
    NotFound { part: String, term: Term },

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// IPC error code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DuplicateSemester { .. } => "duplicate_semester",
            StoreError::NotFound { .. } => "not_found",
            StoreError::Backend(_) => "store_failed",
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Semester list plus the derived student summary, persisted under
/// [`SEMESTERS_KEY`] and [`STUDENT_KEY`].
///
/// Every mutation rewrites the summary from the full semester list.
#[derive(Debug)]
pub struct StudentRecordStore<S> {
    kv: S,
}

impl<S: KeyValueStore> StudentRecordStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn backend(&self) -> &S {
        &self.kv
    }

    pub fn list_semesters(&self) -> StoreResult<Vec<Semester>> {
        Ok(self.read_json(SEMESTERS_KEY)?.unwrap_or_default())
    }

    pub fn insert_semester(&mut self, semester: Semester) -> StoreResult<StudentSummary> {
        let mut semesters = self.list_semesters()?;
        if semesters
            .iter()
            .any(|s| s.is_identified_by(semester.part(), semester.term()))
        {
            return Err(StoreError::DuplicateSemester {
                part: semester.part().to_string(),
                term: semester.term(),
            });
        }

        tracing::info!(
            part = semester.part(),
            semester = %semester.term(),
            gpa = semester.gpa(),
            "recording semester"
        );
        semesters.push(semester);
        self.write_semesters(&semesters)
    }

    pub fn delete_semester(&mut self, part: &str, term: Term) -> StoreResult<StudentSummary> {
        let mut semesters = self.list_semesters()?;
        let Some(pos) = semesters.iter().position(|s| s.is_identified_by(part, term)) else {
            return Err(StoreError::NotFound {
                part: part.to_string(),
                term,
            });
        };

        tracing::info!(part, semester = %term, "deleting semester");
        semesters.remove(pos);
        self.write_semesters(&semesters)
    }

    /// Persisted summary, rebuilt first when missing, unreadable, or out of
    /// step with the semester list (an unreadable list counts as empty).
    pub fn get_summary(&mut self) -> StoreResult<StudentSummary> {
        let semesters = self.list_semesters()?;
        let derived = StudentSummary::from_semesters(&semesters);
        match self.read_json::<StudentSummary>(STUDENT_KEY)? {
            Some(stored) if stored == derived => Ok(stored),
            Some(stored) => {
                tracing::warn!(
                    stored_cgpa = stored.cgpa,
                    cgpa = derived.cgpa,
                    "stored summary out of date, rebuilding"
                );
                self.write_summary(&semesters)
            }
            None => self.write_summary(&semesters),
        }
    }

    pub fn recompute_summary(&mut self) -> StoreResult<StudentSummary> {
        let semesters = self.list_semesters()?;
        self.write_summary(&semesters)
    }

    pub fn clear_all(&mut self) -> StoreResult<StudentSummary> {
        tracing::info!("clearing all semester records");
        self.kv.clear()?;
        self.write_summary(&[])
    }

    pub fn submit_semester(
        &mut self,
        part: &str,
        term: Term,
        rows: &[GradeRow],
    ) -> StoreResult<Semester> {
        let grades: Vec<Grade> = rows.iter().map(Grade::from).collect();
        let semester = Semester::new(part, term, grades);
        self.insert_semester(semester.clone())?;
        Ok(semester)
    }

    pub fn remove_semester(&mut self, part: &str, term: Term) -> StoreResult<()> {
        self.delete_semester(part, term).map(|_| ())
    }

    pub fn get_all_semesters(&self) -> StoreResult<Vec<Semester>> {
        self.list_semesters()
    }

    pub fn get_student_summary(&mut self) -> StoreResult<StudentSummary> {
        self.get_summary()
    }

    pub fn reset_all(&mut self) -> StoreResult<()> {
        self.clear_all().map(|_| ())
    }

    /// Persists the list and its summary in one atomic write.
    fn write_semesters(&mut self, semesters: &[Semester]) -> StoreResult<StudentSummary> {
        let summary = StudentSummary::from_semesters(semesters);
        let semesters_text = serde_json::to_string(semesters).map_err(anyhow::Error::from)?;
        let summary_text = serde_json::to_string(&summary).map_err(anyhow::Error::from)?;
        self.kv.set_many(&[
            (SEMESTERS_KEY, semesters_text.as_str()),
            (STUDENT_KEY, summary_text.as_str()),
        ])?;
        tracing::debug!(cgpa = summary.cgpa, honours = %summary.honours, "summary rebuilt");
        Ok(summary)
    }

    fn write_summary(&mut self, semesters: &[Semester]) -> StoreResult<StudentSummary> {
        let summary = StudentSummary::from_semesters(semesters);
        let text = serde_json::to_string(&summary).map_err(anyhow::Error::from)?;
        self.kv.set(STUDENT_KEY, &text)?;
        tracing::debug!(cgpa = summary.cgpa, honours = %summary.honours, "summary rebuilt");
        Ok(summary)
    }

    /// Reads and decodes `key`. Malformed JSON reads as absent.
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let Some(text) = self.kv.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring malformed stored record");
                Ok(None)
            }
        }
    }
}
