//! Document screening pipeline: passport rule evaluation, decision
//! policy, case persistence, review routing, and the HTTP surface.

pub mod batch;
pub mod decision;
pub mod passport;
pub mod repository;
pub mod router;
pub mod service;

pub use batch::{BatchError, BatchReport, BatchRow, BatchScreener, BatchSummary};
pub use decision::{decide, ScreeningDecision};
pub use passport::{
    check_digit, decode_date, ExtractedField, FieldSet, MrzRecord, PassportRulesEngine, RiskLevel,
    RuleViolation, RulesReport, ScoringConfig, Severity, PLACEHOLDER, RULES_VERSION,
};
pub use repository::{
    CaseId, RepositoryError, ReviewError, ReviewRequest, ReviewSink, ScreeningRecord,
    ScreeningRepository, ScreeningView,
};
pub use router::{screening_router, RecentQuery, ScreeningRequest};
pub use service::{ScreeningService, ScreeningServiceError};
