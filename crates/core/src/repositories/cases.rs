//! Durable case storage.
//!
//! [`CaseStore`] owns the single SQLite connection behind a mutex. Every mutation runs in
//! its own transaction while the lock is held, so:
//!
//! - identities are handed out strictly in commit order (`AUTOINCREMENT`, never reused after
//!   removal),
//! - a failed write rolls back and leaves no identity or partial row visible,
//! - readers always see whole committed rows.
//!
//! ## Storage Layout
//!
//! ```text
//! cases(id, subject_name, symptoms, severity_score, risk_level, priority)
//! ```
//!
//! `symptoms` holds the reported labels joined with [`SymptomLabel::DELIMITER`]; labels are
//! validated on the way in so the split on the way out is lossless.

use crate::classifier::RiskLevel;
use crate::db::{open_database, open_memory_database};
use crate::error::{TriageError, TriageResult};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use triage_types::{NonEmptyText, SymptomLabel};

/// A case read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub id: i64,
    pub subject_name: NonEmptyText,
    pub symptoms: Vec<SymptomLabel>,
    pub severity_score: f64,
    pub risk_level: RiskLevel,
    pub priority: u32,
}

/// A case that has been scored and classified but not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCase {
    pub subject_name: NonEmptyText,
    pub symptoms: Vec<SymptomLabel>,
    pub severity_score: f64,
    pub risk_level: RiskLevel,
    pub priority: u32,
}

/// What a removal found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    AlreadyAbsent,
}

#[derive(Debug)]
pub struct CaseStore {
    conn: Mutex<Connection>,
}

impl CaseStore {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: &Path) -> TriageResult<Self> {
        let conn = open_database(path)?;
        tracing::info!("opened case store at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> TriageResult<Self> {
        Ok(Self {
            conn: Mutex::new(open_memory_database()?),
        })
    }

    fn lock(&self) -> TriageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| TriageError::LockPoisoned)
    }

    /// Persists `case` and returns its newly assigned identity.
    ///
    /// # Errors
    ///
    /// - [`TriageError::InvalidInput`] if the case has no symptoms, a zero priority, or a
    ///   negative or non-finite score.
    /// - [`TriageError::Persistence`] if the write fails; nothing is stored in that case.
    pub fn insert(&self, case: &NewCase) -> TriageResult<i64> {
        if case.symptoms.is_empty() {
            return Err(TriageError::InvalidInput(
                "a case needs at least one symptom".into(),
            ));
        }
        if case.priority == 0 {
            return Err(TriageError::InvalidInput("priority must be positive".into()));
        }
        if !case.severity_score.is_finite() || case.severity_score < 0.0 {
            return Err(TriageError::InvalidInput(format!(
                "severity score must be a non-negative number, got {}",
                case.severity_score
            )));
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO cases (subject_name, symptoms, severity_score, risk_level, priority)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                case.subject_name.as_str(),
                join_symptoms(&case.symptoms),
                case.severity_score,
                case.risk_level.as_str(),
                case.priority,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(id)
    }

    /// All stored cases ordered by `(priority ASC, id ASC)`.
    ///
    /// A row that cannot be decoded is logged by id and left out so the rest of the queue
    /// stays readable.
    pub fn list_ordered(&self) -> TriageResult<Vec<Case>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, subject_name, symptoms, severity_score, risk_level, priority
             FROM cases ORDER BY priority ASC, id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(CaseRow {
                id: row.get(0)?,
                subject_name: row.get(1)?,
                symptoms: row.get(2)?,
                severity_score: row.get(3)?,
                risk_level: row.get(4)?,
                priority: row.get(5)?,
            })
        })?;

        let mut cases = Vec::new();
        for row in rows {
            match row?.into_case() {
                Ok(case) => cases.push(case),
                Err(TriageError::CorruptRecord { id, reason }) => {
                    tracing::error!(id, reason = %reason, "skipping unreadable case");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(cases)
    }

    /// Deletes the case with `id`. Removing an id that is not stored is not an error.
    pub fn remove(&self, id: i64) -> TriageResult<Removal> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM cases WHERE id = ?1", params![id])?;
        tx.commit()?;

        Ok(if deleted > 0 {
            Removal::Removed
        } else {
            Removal::AlreadyAbsent
        })
    }

    /// Number of stored cases.
    pub fn count(&self) -> TriageResult<u64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM cases", [], |row| row.get::<_, i64>(0))?;
        Ok(count.max(0) as u64)
    }
}

struct CaseRow {
    id: i64,
    subject_name: String,
    symptoms: String,
    severity_score: f64,
    risk_level: String,
    priority: i64,
}

impl CaseRow {
    fn into_case(self) -> TriageResult<Case> {
        let id = self.id;
        let corrupt = |reason: String| TriageError::CorruptRecord { id, reason };

        let subject_name =
            NonEmptyText::new(&self.subject_name).map_err(|e| corrupt(e.to_string()))?;
        let symptoms = split_symptoms(&self.symptoms).map_err(corrupt)?;
        let risk_level = self.risk_level.parse::<RiskLevel>().map_err(corrupt)?;
        let priority = u32::try_from(self.priority)
            .ok()
            .filter(|p| *p > 0)
            .ok_or_else(|| corrupt(format!("priority {} is not positive", self.priority)))?;

        Ok(Case {
            id,
            subject_name,
            symptoms,
            severity_score: self.severity_score,
            risk_level,
            priority,
        })
    }
}

fn join_symptoms(symptoms: &[SymptomLabel]) -> String {
    let mut joined = String::new();
    for (i, symptom) in symptoms.iter().enumerate() {
        if i > 0 {
            joined.push(SymptomLabel::DELIMITER);
        }
        joined.push_str(symptom.as_str());
    }
    joined
}

fn split_symptoms(stored: &str) -> Result<Vec<SymptomLabel>, String> {
    stored
        .split(SymptomLabel::DELIMITER)
        .map(|label| SymptomLabel::new(label).map_err(|e| e.to_string()))
        .collect()
}
