//! Wire types shared by the triage APIs.
//!
//! These are plain serde structs with OpenAPI schemas. Conversions from core types live
//! here so handlers stay thin.

use serde::{Deserialize, Serialize};
use triage_core::{Booking, Case};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Walk-in booking request.
///
/// `patient_name` is accepted as an alias of `subject_name` for older intake forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookCaseReq {
    #[serde(default, alias = "patient_name")]
    pub subject_name: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookCaseRes {
    pub message: String,
    pub id: i64,
    pub subject_name: String,
    pub severity_score: f64,
    pub risk_level: String,
    pub priority: u32,
}

impl From<Booking> for BookCaseRes {
    fn from(booking: Booking) -> Self {
        Self {
            message: "Case booked successfully".into(),
            id: booking.id,
            subject_name: booking.subject_name.to_string(),
            severity_score: booking.assessment.severity_score,
            risk_level: booking.assessment.risk_level.to_string(),
            priority: booking.assessment.priority,
        }
    }
}

/// One entry of the triage queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CaseRes {
    pub id: i64,
    pub subject_name: String,
    pub symptoms: Vec<String>,
    pub severity_score: f64,
    pub risk_level: String,
    pub priority: u32,
}

impl From<Case> for CaseRes {
    fn from(case: Case) -> Self {
        Self {
            id: case.id,
            subject_name: case.subject_name.to_string(),
            symptoms: case.symptoms.iter().map(|s| s.to_string()).collect(),
            severity_score: case.severity_score,
            risk_level: case.risk_level.to_string(),
            priority: case.priority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListQueueRes {
    pub cases: Vec<CaseRes>,
}

impl From<Vec<Case>> for ListQueueRes {
    fn from(cases: Vec<Case>) -> Self {
        Self {
            cases: cases.into_iter().map(CaseRes::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RemoveCaseRes {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}
