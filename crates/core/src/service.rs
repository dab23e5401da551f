//! Triage intake service.
//!
//! [`TriageService`] is the single entry point used by the REST API and the CLI. It wires
//! together the configured scorer, classifier, case store and access gate, and implements
//! the three intake operations:
//!
//! - [`TriageService::book_case`]: open to any caller
//! - [`TriageService::list_queue`]: privileged
//! - [`TriageService::remove_case`]: privileged, idempotent
//!
//! A case's score, risk level and priority are computed once at booking and stored; they
//! are never recomputed, even if the service later restarts with different reference data.

use crate::access::{AccessContext, AccessGate};
use crate::classifier::{LogisticModel, RiskClassifier, RiskLevel, TierScheme};
use crate::config::{ClassifierConfig, CoreConfig, ScorerConfig};
use crate::error::{TriageError, TriageResult};
use crate::repositories::cases::{Case, CaseStore, NewCase, Removal};
use crate::scoring::SeverityScorer;
use crate::weights::SymptomWeightTable;
use std::sync::Arc;
use triage_types::{NonEmptyText, SymptomLabel};

/// Score and classification for a set of symptoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub severity_score: f64,
    pub risk_level: RiskLevel,
    pub priority: u32,
}

/// Result of a successful booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: i64,
    pub subject_name: NonEmptyText,
    pub assessment: Assessment,
}

#[derive(Clone)]
pub struct TriageService {
    scorer: SeverityScorer,
    classifier: RiskClassifier,
    store: Arc<CaseStore>,
    gate: Arc<dyn AccessGate>,
}

impl TriageService {
    pub fn new(
        scorer: SeverityScorer,
        classifier: RiskClassifier,
        store: Arc<CaseStore>,
        gate: Arc<dyn AccessGate>,
    ) -> Self {
        Self {
            scorer,
            classifier,
            store,
            gate,
        }
    }

    /// Loads reference data and the model artifact, opens the store and builds the service.
    ///
    /// # Errors
    ///
    /// Returns a startup failure if the weight table or model artifact cannot be loaded, or
    /// [`TriageError::Persistence`]/[`TriageError::Migration`] if the database cannot be
    /// opened. There is no fallback: the caller must not start serving requests.
    pub fn from_config(cfg: &CoreConfig, gate: Arc<dyn AccessGate>) -> TriageResult<Self> {
        let scorer = match cfg.scorer() {
            ScorerConfig::Count => SeverityScorer::count_based(),
            ScorerConfig::Weighted { weights_path } => {
                SeverityScorer::weighted(Arc::new(SymptomWeightTable::load(weights_path)?))
            }
        };

        let classifier = match cfg.classifier() {
            ClassifierConfig::Threshold(thresholds) => RiskClassifier::Threshold(*thresholds),
            ClassifierConfig::Learned { model_path } => {
                RiskClassifier::Learned(LogisticModel::load(model_path)?)
            }
        };

        let store = Arc::new(CaseStore::open(cfg.db_path())?);

        tracing::info!(
            scorer = scorer.mode().as_str(),
            classifier = classifier.kind().as_str(),
            tiers = classifier.tiers().count(),
            "triage service ready"
        );

        Ok(Self::new(scorer, classifier, store, gate))
    }

    pub fn tiers(&self) -> TierScheme {
        self.classifier.tiers()
    }

    /// Scores and classifies without storing anything.
    pub fn assess(&self, symptoms: &[SymptomLabel]) -> Assessment {
        let severity_score = self.scorer.score(symptoms);
        let (risk_level, priority) = self.classifier.classify(severity_score);
        Assessment {
            severity_score,
            risk_level,
            priority,
        }
    }

    /// Books a new case.
    ///
    /// # Errors
    ///
    /// - [`TriageError::InvalidInput`] if the name is blank, no symptoms were given, or a
    ///   label is blank or contains a comma.
    /// - [`TriageError::Persistence`] if the case could not be stored. Nothing is stored
    ///   and the call can be retried.
    pub fn book_case(
        &self,
        subject_name: &str,
        symptoms: Vec<String>,
    ) -> TriageResult<Booking> {
        let subject_name = NonEmptyText::new(subject_name)
            .map_err(|_| TriageError::InvalidInput("subject name is required".into()))?;
        let symptoms = parse_symptoms(symptoms)?;

        let assessment = self.assess(&symptoms);
        let id = self.store.insert(&NewCase {
            subject_name: subject_name.clone(),
            symptoms,
            severity_score: assessment.severity_score,
            risk_level: assessment.risk_level,
            priority: assessment.priority,
        })?;

        tracing::debug!(
            id,
            risk_level = assessment.risk_level.as_str(),
            priority = assessment.priority,
            "case booked"
        );

        Ok(Booking {
            id,
            subject_name,
            assessment,
        })
    }

    /// The open cases in queue order: most urgent first, then by arrival.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Unauthorized`] if `ctx` is not privileged; no data is read.
    pub fn list_queue(&self, ctx: &AccessContext) -> TriageResult<Vec<Case>> {
        self.authorise(ctx, "list_queue")?;
        self.store.list_ordered()
    }

    /// Marks a case as consulted by removing it from the queue.
    ///
    /// Removing an id that is not in the queue succeeds: the case no longer needs
    /// attention either way.
    ///
    /// # Errors
    ///
    /// Returns [`TriageError::Unauthorized`] if `ctx` is not privileged; nothing is removed.
    pub fn remove_case(&self, id: i64, ctx: &AccessContext) -> TriageResult<Removal> {
        self.authorise(ctx, "remove_case")?;
        let removal = self.store.remove(id)?;
        tracing::debug!(id, ?removal, "case consulted");
        Ok(removal)
    }

    fn authorise(&self, ctx: &AccessContext, operation: &'static str) -> TriageResult<()> {
        if self.gate.is_privileged(ctx) {
            return Ok(());
        }
        tracing::warn!(operation, "refused unprivileged caller");
        Err(TriageError::Unauthorized)
    }
}

/// Validates raw symptom labels.
///
/// # Errors
///
/// Returns [`TriageError::InvalidInput`] if the list is empty or any label is invalid.
pub fn parse_symptoms(symptoms: Vec<String>) -> TriageResult<Vec<SymptomLabel>> {
    if symptoms.is_empty() {
        return Err(TriageError::InvalidInput(
            "at least one symptom is required".into(),
        ));
    }
    symptoms
        .into_iter()
        .map(|s| SymptomLabel::new(s).map_err(TriageError::from))
        .collect()
}
