//! Constants used throughout the triage core crate.

/// Default SQLite database file when no explicit path is configured.
pub const DEFAULT_DB_PATH: &str = "triage.db";

/// Default symptom weight reference file, relative to the working directory.
pub const DEFAULT_WEIGHTS_PATH: &str = "data/symptom_weights.csv";

/// Score contributed by each reported symptom under the count-based scorer.
pub const COUNT_SCORE_PER_SYMPTOM: f64 = 5.0;

/// Scores at or above this are High risk under the threshold rules.
pub const HIGH_RISK_THRESHOLD: f64 = 15.0;

/// Scores at or above this (and below the high threshold) are Medium risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 10.0;

/// Probability cut-off for the learned classifier when the artifact does not set one.
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;

/// Model family accepted in learned classifier artifacts.
pub const LOGISTIC_MODEL_KIND: &str = "logistic_regression";
