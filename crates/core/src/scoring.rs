//! Severity scoring.
//!
//! A scorer turns the reported symptom labels into a non-negative severity score. The mode
//! is fixed when the service starts; it is never chosen per request.

use crate::constants::COUNT_SCORE_PER_SYMPTOM;
use crate::error::TriageError;
use crate::weights::SymptomWeightTable;
use std::str::FromStr;
use std::sync::Arc;

/// Which scoring rule is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorerMode {
    /// Every symptom contributes a fixed amount.
    Count,
    /// Symptoms contribute their reference weight.
    Weighted,
}

impl ScorerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScorerMode::Count => "count",
            ScorerMode::Weighted => "weighted",
        }
    }
}

impl FromStr for ScorerMode {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(ScorerMode::Count),
            "weighted" => Ok(ScorerMode::Weighted),
            other => Err(TriageError::Config(format!(
                "unknown scorer {other:?} (expected \"count\" or \"weighted\")"
            ))),
        }
    }
}

/// Deterministic, side-effect free severity scorer.
#[derive(Debug, Clone)]
pub enum SeverityScorer {
    CountBased { per_symptom: f64 },
    Weighted(Arc<SymptomWeightTable>),
}

impl SeverityScorer {
    /// Count-based scorer using [`COUNT_SCORE_PER_SYMPTOM`].
    pub fn count_based() -> Self {
        SeverityScorer::CountBased {
            per_symptom: COUNT_SCORE_PER_SYMPTOM,
        }
    }

    pub fn weighted(table: Arc<SymptomWeightTable>) -> Self {
        SeverityScorer::Weighted(table)
    }

    pub fn mode(&self) -> ScorerMode {
        match self {
            SeverityScorer::CountBased { .. } => ScorerMode::Count,
            SeverityScorer::Weighted(_) => ScorerMode::Weighted,
        }
    }

    /// Scores a sequence of symptom labels.
    ///
    /// Duplicates count every time they appear.
    pub fn score<S: AsRef<str>>(&self, symptoms: &[S]) -> f64 {
        match self {
            SeverityScorer::CountBased { per_symptom } => symptoms.len() as f64 * per_symptom,
            SeverityScorer::Weighted(table) => symptoms
                .iter()
                .map(|symptom| table.weight(symptom.as_ref()))
                .sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_table() -> Arc<SymptomWeightTable> {
        Arc::new(
            SymptomWeightTable::from_pairs([
                ("itching", 1.0),
                ("skin_rash", 3.0),
                ("nodal_skin_eruptions", 4.0),
            ])
            .expect("valid pairs"),
        )
    }

    #[test]
    fn count_based_ignores_which_symptoms_were_named() {
        let scorer = SeverityScorer::count_based();
        assert_eq!(scorer.score(&["a", "b", "c", "d"]), 20.0);
        assert_eq!(scorer.score(&["cough", "cough"]), 10.0);
        assert_eq!(scorer.score::<&str>(&[]), 0.0);
    }

    #[test]
    fn weighted_sums_normalised_weights() {
        let scorer = SeverityScorer::weighted(reference_table());
        let score = scorer.score(&["itching", " Skin_Rash ", "NODAL_SKIN_ERUPTIONS"]);
        assert_eq!(score, 8.0);
    }

    #[test]
    fn weighted_unknown_labels_contribute_nothing() {
        let scorer = SeverityScorer::weighted(reference_table());
        assert_eq!(scorer.score(&["itching", "glowing_aura"]), 1.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let scorer = SeverityScorer::weighted(reference_table());
        let input = ["skin_rash", "itching", "skin_rash"];
        assert_eq!(scorer.score(&input), scorer.score(&input));
        assert_eq!(scorer.score(&input), 7.0);
    }

    #[test]
    fn scorer_mode_parses_case_insensitively() {
        assert_eq!("Weighted".parse::<ScorerMode>().unwrap(), ScorerMode::Weighted);
        assert_eq!(" count ".parse::<ScorerMode>().unwrap(), ScorerMode::Count);
        assert!("random".parse::<ScorerMode>().is_err());
    }
}
