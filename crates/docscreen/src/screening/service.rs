use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

use super::decision::decide;
use super::passport::{FieldSet, PassportRulesEngine, ScoringConfig};
use super::repository::{
    CaseId, RepositoryError, ReviewError, ReviewRequest, ReviewSink, ScreeningRecord,
    ScreeningRepository,
};

/// Service composing the rules engine, audit store, and review hand-off.
pub struct ScreeningService<R, S> {
    engine: Arc<PassportRulesEngine>,
    repository: Arc<R>,
    reviews: Arc<S>,
}

static CASE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_case_id() -> CaseId {
    let id = CASE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CaseId(format!("case-{id:06}"))
}

impl<R, S> ScreeningService<R, S>
where
    R: ScreeningRepository + 'static,
    S: ReviewSink + 'static,
{
    pub fn new(repository: Arc<R>, reviews: Arc<S>, config: ScoringConfig) -> Self {
        Self {
            engine: Arc::new(PassportRulesEngine::new(config)),
            repository,
            reviews,
        }
    }

    /// Screen one captured document and persist the outcome. Cases that do
    /// not come back approved are also pushed to the review queue.
    pub fn screen(
        &self,
        fields: FieldSet,
        evaluated_on: NaiveDate,
    ) -> Result<ScreeningRecord, ScreeningServiceError> {
        let case_id = next_case_id();
        let report = self.engine.apply(&fields, evaluated_on);
        let decision = decide(&report);

        tracing::debug!(
            case = %case_id.0,
            outcome = decision.label(),
            score = report.risk_score,
            "screening evaluated"
        );

        let record = ScreeningRecord {
            case_id: case_id.clone(),
            evaluated_on,
            fields,
            report,
            decision,
        };
        let stored = self.repository.insert(record)?;

        if !stored.decision.is_approved() {
            self.reviews.enqueue(ReviewRequest {
                case_id,
                risk_score: stored.report.risk_score,
                risk_level: stored.report.risk_level,
                violations: stored.report.violations.clone(),
            })?;
        }

        Ok(stored)
    }

    /// Fetch a stored screening for API responses.
    pub fn get(&self, case_id: &CaseId) -> Result<ScreeningRecord, ScreeningServiceError> {
        let record = self
            .repository
            .fetch(case_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// List the latest screenings, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<ScreeningRecord>, ScreeningServiceError> {
        Ok(self.repository.recent(limit)?)
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Review(#[from] ReviewError),
}
