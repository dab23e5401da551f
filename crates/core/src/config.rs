//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Nothing in the request path reads process-wide environment variables.
//!
//! The parsing helpers take `Option<String>` values rather than reading the environment
//! themselves, so they can be exercised in tests without mutating global state.

use crate::classifier::{ClassifierKind, Thresholds};
use crate::constants::{DEFAULT_DB_PATH, DEFAULT_WEIGHTS_PATH};
use crate::error::{TriageError, TriageResult};
use crate::scoring::ScorerMode;
use std::path::{Path, PathBuf};

/// How severity is scored.
#[derive(Clone, Debug, PartialEq)]
pub enum ScorerConfig {
    Count,
    Weighted { weights_path: PathBuf },
}

/// How scores are classified.
#[derive(Clone, Debug, PartialEq)]
pub enum ClassifierConfig {
    Threshold(Thresholds),
    Learned { model_path: PathBuf },
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    db_path: PathBuf,
    scorer: ScorerConfig,
    classifier: ClassifierConfig,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(db_path: PathBuf, scorer: ScorerConfig, classifier: ClassifierConfig) -> Self {
        Self {
            db_path,
            scorer,
            classifier,
        }
    }

    /// Resolves configuration from raw (possibly absent) values.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Config`] for unknown scorer/classifier names or when the
    /// learned classifier is selected without a model path.
    pub fn resolve(values: ConfigValues) -> TriageResult<Self> {
        let db_path = non_blank(values.db_path)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let scorer = match scorer_mode_from_env_value(values.scorer)? {
            ScorerMode::Count => ScorerConfig::Count,
            ScorerMode::Weighted => ScorerConfig::Weighted {
                weights_path: non_blank(values.weights_path)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_WEIGHTS_PATH)),
            },
        };

        let classifier = match classifier_kind_from_env_value(values.classifier)? {
            ClassifierKind::Threshold => ClassifierConfig::Threshold(Thresholds::default()),
            ClassifierKind::Learned => {
                let model_path = non_blank(values.model_path).ok_or_else(|| {
                    TriageError::Config(
                        "TRIAGE_MODEL_PATH is required when TRIAGE_CLASSIFIER=learned".into(),
                    )
                })?;
                ClassifierConfig::Learned {
                    model_path: PathBuf::from(model_path),
                }
            }
        };

        Ok(Self::new(db_path, scorer, classifier))
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn scorer(&self) -> &ScorerConfig {
        &self.scorer
    }

    pub fn classifier(&self) -> &ClassifierConfig {
        &self.classifier
    }
}

/// Raw configuration values, usually read from the process environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigValues {
    pub db_path: Option<String>,
    pub scorer: Option<String>,
    pub weights_path: Option<String>,
    pub classifier: Option<String>,
    pub model_path: Option<String>,
}

impl ConfigValues {
    /// Reads the `TRIAGE_*` variables. Call once at startup.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok();
        Self {
            db_path: var("TRIAGE_DB_PATH"),
            scorer: var("TRIAGE_SCORER"),
            weights_path: var("TRIAGE_WEIGHTS_PATH"),
            classifier: var("TRIAGE_CLASSIFIER"),
            model_path: var("TRIAGE_MODEL_PATH"),
        }
    }
}

/// Parse the scorer mode from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`ScorerMode::Weighted`].
pub fn scorer_mode_from_env_value(value: Option<String>) -> TriageResult<ScorerMode> {
    non_blank(value)
        .map(|v| v.parse::<ScorerMode>())
        .transpose()
        .map(|mode| mode.unwrap_or(ScorerMode::Weighted))
}

/// Parse the classifier kind from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`ClassifierKind::Threshold`].
pub fn classifier_kind_from_env_value(value: Option<String>) -> TriageResult<ClassifierKind> {
    non_blank(value)
        .map(|v| v.parse::<ClassifierKind>())
        .transpose()
        .map(|kind| kind.unwrap_or(ClassifierKind::Threshold))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
