use std::path::PathBuf;
use triage_types::{LabelError, TextError};

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("caller is not authorised for this operation")]
    Unauthorized,

    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to load {}: {reason}", .path.display())]
    Startup { path: PathBuf, reason: String },

    #[error("persistence failure: {0}")]
    Persistence(#[from] rusqlite::Error),
    #[error("migration failed at version {version}: {reason}")]
    Migration { version: i64, reason: String },
    #[error("stored case {id} is corrupt: {reason}")]
    CorruptRecord { id: i64, reason: String },
    #[error("case store lock poisoned")]
    LockPoisoned,
}

impl TriageError {
    /// True for errors that must stop the service from accepting requests.
    pub fn is_startup_failure(&self) -> bool {
        matches!(
            self,
            TriageError::Config(_) | TriageError::Startup { .. } | TriageError::Migration { .. }
        )
    }
}

impl From<TextError> for TriageError {
    fn from(err: TextError) -> Self {
        TriageError::InvalidInput(err.to_string())
    }
}

impl From<LabelError> for TriageError {
    fn from(err: LabelError) -> Self {
        TriageError::InvalidInput(err.to_string())
    }
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;
