//! Risk classification.
//!
//! A [`RiskClassifier`] maps a severity score to a [`RiskLevel`] and a queue priority
//! (lower is more urgent). There are two strategies:
//!
//! - [`RiskClassifier::Threshold`]: fixed score boundaries, three tiers
//!   (`High → 1`, `Medium → 2`, `Low → 3`).
//! - [`RiskClassifier::Learned`]: a pretrained binary model, two tiers
//!   (`High → 1`, `Low → 2`).
//!
//! The tier scheme is explicit through [`RiskClassifier::tiers`] so callers never assume
//! three tiers. Within either scheme priorities start at 1 and have no gaps.
//!
//! The learned artifact is a one-feature logistic regression stored as JSON:
//!
//! ```json
//! { "model": "logistic_regression", "coefficient": 2.0, "intercept": -19.0, "decision_threshold": 0.5 }
//! ```

use crate::constants::{
    DEFAULT_DECISION_THRESHOLD, HIGH_RISK_THRESHOLD, LOGISTIC_MODEL_KIND, MEDIUM_RISK_THRESHOLD,
};
use crate::error::{TriageError, TriageResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Coarse urgency of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(RiskLevel::Low),
            "Medium" => Ok(RiskLevel::Medium),
            "High" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level {other:?}")),
        }
    }
}

/// Number of urgency bands a classifier produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierScheme {
    Two,
    Three,
}

impl TierScheme {
    pub fn count(&self) -> u32 {
        match self {
            TierScheme::Two => 2,
            TierScheme::Three => 3,
        }
    }

    /// Priority rank for `level` within this scheme.
    ///
    /// A two-tier scheme has no Medium band; Medium is folded into Low.
    pub fn priority(&self, level: RiskLevel) -> u32 {
        match (self, level) {
            (_, RiskLevel::High) => 1,
            (TierScheme::Three, RiskLevel::Medium) => 2,
            (TierScheme::Three, RiskLevel::Low) => 3,
            (TierScheme::Two, RiskLevel::Medium | RiskLevel::Low) => 2,
        }
    }
}

/// Which classifier strategy is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    Threshold,
    Learned,
}

impl ClassifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierKind::Threshold => "threshold",
            ClassifierKind::Learned => "learned",
        }
    }
}

impl FromStr for ClassifierKind {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threshold" => Ok(ClassifierKind::Threshold),
            "learned" => Ok(ClassifierKind::Learned),
            other => Err(TriageError::Config(format!(
                "unknown classifier {other:?} (expected \"threshold\" or \"learned\")"
            ))),
        }
    }
}

/// Score boundaries for the threshold classifier. Both boundaries are inclusive lower
/// bounds of their band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    high: f64,
    medium: f64,
}

impl Thresholds {
    /// # Errors
    ///
    /// Returns [`TriageError::Config`] if a boundary is not finite or `medium > high`.
    pub fn new(high: f64, medium: f64) -> TriageResult<Self> {
        if !high.is_finite() || !medium.is_finite() {
            return Err(TriageError::Config(
                "risk thresholds must be finite numbers".into(),
            ));
        }
        if medium > high {
            return Err(TriageError::Config(format!(
                "medium threshold {medium} exceeds high threshold {high}"
            )));
        }
        Ok(Self { high, medium })
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn medium(&self) -> f64 {
        self.medium
    }

    fn level(&self, score: f64) -> RiskLevel {
        if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: HIGH_RISK_THRESHOLD,
            medium: MEDIUM_RISK_THRESHOLD,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    model: String,
    coefficient: f64,
    intercept: f64,
    #[serde(default = "default_decision_threshold")]
    decision_threshold: f64,
}

fn default_decision_threshold() -> f64 {
    DEFAULT_DECISION_THRESHOLD
}

/// Pretrained binary predictor over the severity score.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    coefficient: f64,
    intercept: f64,
    decision_threshold: f64,
}

impl LogisticModel {
    /// # Errors
    ///
    /// Returns [`TriageError::Config`] if a parameter is not finite or the decision
    /// threshold is outside `(0, 1)`.
    pub fn new(coefficient: f64, intercept: f64, decision_threshold: f64) -> TriageResult<Self> {
        Self::validated(coefficient, intercept, decision_threshold).map_err(TriageError::Config)
    }

    /// Loads a model artifact. The service must not start if this fails.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Startup`] if the file is missing, is not valid JSON, names an
    /// unsupported model family, or carries invalid parameters.
    pub fn load(path: &Path) -> TriageResult<Self> {
        let startup = |reason: String| TriageError::Startup {
            path: path.to_path_buf(),
            reason,
        };

        let contents = fs::read_to_string(path).map_err(|e| startup(e.to_string()))?;
        let model = Self::from_json(&contents).map_err(startup)?;
        tracing::info!("loaded risk model from {}", path.display());
        Ok(model)
    }

    fn from_json(contents: &str) -> Result<Self, String> {
        let artifact: ModelArtifact = serde_json::from_str(contents).map_err(|e| e.to_string())?;
        if artifact.model != LOGISTIC_MODEL_KIND {
            return Err(format!(
                "unsupported model {:?} (expected {LOGISTIC_MODEL_KIND:?})",
                artifact.model
            ));
        }
        Self::validated(
            artifact.coefficient,
            artifact.intercept,
            artifact.decision_threshold,
        )
    }

    fn validated(coefficient: f64, intercept: f64, decision_threshold: f64) -> Result<Self, String> {
        if !coefficient.is_finite() || !intercept.is_finite() {
            return Err("model coefficient and intercept must be finite".into());
        }
        if !(decision_threshold > 0.0 && decision_threshold < 1.0) {
            return Err(format!(
                "decision threshold must be within (0, 1), got {decision_threshold}"
            ));
        }
        Ok(Self {
            coefficient,
            intercept,
            decision_threshold,
        })
    }

    /// Probability that the score belongs to the high-risk class.
    pub fn probability(&self, score: f64) -> f64 {
        let z = self.coefficient * score + self.intercept;
        1.0 / (1.0 + (-z).exp())
    }

    /// Binary label: `true` is high risk.
    pub fn predict(&self, score: f64) -> bool {
        self.probability(score) >= self.decision_threshold
    }
}

/// Strategy mapping a severity score to `(risk level, priority)`.
#[derive(Debug, Clone)]
pub enum RiskClassifier {
    Threshold(Thresholds),
    Learned(LogisticModel),
}

impl Default for RiskClassifier {
    fn default() -> Self {
        RiskClassifier::Threshold(Thresholds::default())
    }
}

impl RiskClassifier {
    pub fn kind(&self) -> ClassifierKind {
        match self {
            RiskClassifier::Threshold(_) => ClassifierKind::Threshold,
            RiskClassifier::Learned(_) => ClassifierKind::Learned,
        }
    }

    pub fn tiers(&self) -> TierScheme {
        match self {
            RiskClassifier::Threshold(_) => TierScheme::Three,
            RiskClassifier::Learned(_) => TierScheme::Two,
        }
    }

    /// Classifies a score. Total over every `f64`: a NaN score is Low.
    pub fn classify(&self, score: f64) -> (RiskLevel, u32) {
        let level = match self {
            RiskClassifier::Threshold(thresholds) => thresholds.level(score),
            RiskClassifier::Learned(model) => {
                if model.predict(score) {
                    RiskLevel::High
                } else {
                    RiskLevel::Low
                }
            }
        };
        (level, self.tiers().priority(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn model() -> LogisticModel {
        LogisticModel::new(2.0, -19.0, 0.5).expect("valid model")
    }

    #[test]
    fn threshold_boundaries_are_closed() {
        let classifier = RiskClassifier::default();
        assert_eq!(classifier.classify(15.0), (RiskLevel::High, 1));
        assert_eq!(classifier.classify(14.999), (RiskLevel::Medium, 2));
        assert_eq!(classifier.classify(10.0), (RiskLevel::Medium, 2));
        assert_eq!(classifier.classify(9.999), (RiskLevel::Low, 3));
        assert_eq!(classifier.classify(0.0), (RiskLevel::Low, 3));
    }

    #[test]
    fn threshold_classification_is_total() {
        let classifier = RiskClassifier::default();
        for score in [f64::NAN, f64::NEG_INFINITY, f64::INFINITY, -1.0, 1e9] {
            let (_, priority) = classifier.classify(score);
            assert!((1..=3).contains(&priority));
        }
        assert_eq!(classifier.classify(f64::NAN), (RiskLevel::Low, 3));
    }

    #[test]
    fn priority_never_decreases_as_risk_eases() {
        for scheme in [TierScheme::Two, TierScheme::Three] {
            let high = scheme.priority(RiskLevel::High);
            let medium = scheme.priority(RiskLevel::Medium);
            let low = scheme.priority(RiskLevel::Low);
            assert!(high <= medium && medium <= low);
            assert_eq!(low, scheme.count());
        }
    }

    #[test]
    fn learned_classifier_uses_two_tiers() {
        let classifier = RiskClassifier::Learned(model());
        assert_eq!(classifier.tiers(), TierScheme::Two);
        assert_eq!(classifier.classify(20.0), (RiskLevel::High, 1));
        assert_eq!(classifier.classify(3.0), (RiskLevel::Low, 2));
        assert_eq!(classifier.kind(), ClassifierKind::Learned);
    }

    #[test]
    fn logistic_probability_is_half_at_boundary() {
        let m = model();
        assert!((m.probability(9.5) - 0.5).abs() < 1e-12);
        assert!(m.predict(10.0));
        assert!(!m.predict(9.0));
    }

    #[test]
    fn thresholds_reject_inverted_bounds() {
        assert!(Thresholds::new(10.0, 15.0).is_err());
        assert!(Thresholds::new(f64::INFINITY, 1.0).is_err());
        let custom = Thresholds::new(20.0, 20.0).expect("equal bounds are allowed");
        assert_eq!(
            RiskClassifier::Threshold(custom).classify(20.0),
            (RiskLevel::High, 1)
        );
    }

    #[test]
    fn load_model_artifact() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("model.json");
        fs::write(
            &path,
            r#"{"model": "logistic_regression", "coefficient": 2.0, "intercept": -19.0}"#,
        )
        .expect("should write artifact");

        let loaded = LogisticModel::load(&path).expect("artifact should load");
        assert_eq!(loaded, model());
    }

    #[test]
    fn load_model_fails_fast_on_bad_artifacts() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let cases = [
            ("garbage.json", "not json"),
            (
                "forest.json",
                r#"{"model": "random_forest", "coefficient": 1.0, "intercept": 0.0}"#,
            ),
            (
                "threshold.json",
                r#"{"model": "logistic_regression", "coefficient": 1.0, "intercept": 0.0, "decision_threshold": 1.5}"#,
            ),
        ];

        for (name, contents) in cases {
            let path = dir.path().join(name);
            fs::write(&path, contents).expect("should write artifact");
            let err = LogisticModel::load(&path).expect_err("bad artifact must not load");
            assert!(matches!(err, TriageError::Startup { .. }), "{name}");
        }

        let missing = LogisticModel::load(&dir.path().join("missing.json"))
            .expect_err("missing artifact must not load");
        assert!(missing.is_startup_failure());
    }

    #[test]
    fn risk_level_text_round_trips() {
        for level in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
            assert_eq!(level.as_str().parse::<RiskLevel>(), Ok(level));
        }
        assert!("High Risk".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn shipped_model_artifact_loads() {
        let path =
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/risk_model.json");
        let loaded = LogisticModel::load(&path).expect("shipped model should load");
        assert_eq!(loaded, model());
    }
}
