//! # Triage Core
//!
//! Core business logic for the walk-in triage intake.
//!
//! This crate contains pure data operations:
//! - Symptom weight reference data ([`weights`])
//! - Severity scoring ([`scoring`]) and risk classification ([`classifier`])
//! - Durable, identity-assigning case storage ([`repositories::cases`])
//! - The intake service tying them together ([`service`])
//!
//! **No API concerns**: HTTP servers, header parsing and credential checks belong in
//! `api-rest` and `api-shared`. The core only consumes an injected [`AccessGate`].

pub mod access;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod repositories;
pub mod scoring;
pub mod service;
pub mod weights;

pub use access::{AccessContext, AccessGate, DenyAll};
pub use classifier::{
    ClassifierKind, LogisticModel, RiskClassifier, RiskLevel, Thresholds, TierScheme,
};
pub use config::{ConfigValues, CoreConfig};
pub use error::{TriageError, TriageResult};
pub use repositories::cases::{Case, CaseStore, Removal};
pub use scoring::{ScorerMode, SeverityScorer};
pub use service::{Assessment, Booking, TriageService};
pub use triage_types::{NonEmptyText, SymptomLabel, TextError};
pub use weights::SymptomWeightTable;
