use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::decision::ScreeningDecision;
use super::passport::{FieldSet, RiskLevel, RuleViolation, RulesReport};

/// Identifier assigned to one screening case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(pub String);

/// Repository record holding the capture, report, and decision verbatim,
/// so audits can replay exactly what the engine saw and concluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRecord {
    pub case_id: CaseId,
    pub evaluated_on: NaiveDate,
    pub fields: FieldSet,
    pub report: RulesReport,
    pub decision: ScreeningDecision,
}

impl ScreeningRecord {
    pub fn view(&self) -> ScreeningView {
        ScreeningView {
            case_id: self.case_id.clone(),
            evaluated_on: self.evaluated_on,
            outcome: self.decision.label(),
            rationale: self.decision.summary(),
            report: self.report.clone(),
        }
    }
}

/// Storage abstraction so the screening service can be exercised in isolation.
pub trait ScreeningRepository: Send + Sync {
    fn insert(&self, record: ScreeningRecord) -> Result<ScreeningRecord, RepositoryError>;
    fn fetch(&self, id: &CaseId) -> Result<Option<ScreeningRecord>, RepositoryError>;
    /// Latest screenings, newest case first.
    fn recent(&self, limit: usize) -> Result<Vec<ScreeningRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Context handed to the downstream review queue for non-approved cases.
/// The reviewer is a consumer only; screening never waits on its verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub case_id: CaseId,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub violations: Vec<RuleViolation>,
}

/// Trait describing the outbound review hand-off (e.g. an LLM reviewer or
/// a human case queue).
pub trait ReviewSink: Send + Sync {
    fn enqueue(&self, request: ReviewRequest) -> Result<(), ReviewError>;
}

/// Review dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("review queue unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of a screening exposed over the API.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningView {
    pub case_id: CaseId,
    pub evaluated_on: NaiveDate,
    pub outcome: &'static str,
    pub rationale: String,
    pub report: RulesReport,
}
