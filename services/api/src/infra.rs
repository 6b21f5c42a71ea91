use chrono::NaiveDate;
use docscreen::screening::repository::{
    CaseId, RepositoryError, ReviewError, ReviewRequest, ReviewSink, ScreeningRecord,
    ScreeningRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryScreeningRepository {
    records: Arc<Mutex<HashMap<CaseId, ScreeningRecord>>>,
}

impl ScreeningRepository for InMemoryScreeningRepository {
    fn insert(&self, record: ScreeningRecord) -> Result<ScreeningRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.case_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.case_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &CaseId) -> Result<Option<ScreeningRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<ScreeningRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<ScreeningRecord> = guard.values().cloned().collect();
        // Sequence-assigned ids are zero-padded, so the lexicographic order
        // is the assignment order.
        records.sort_by(|a, b| b.case_id.0.cmp(&a.case_id.0));
        records.truncate(limit);
        Ok(records)
    }
}

/// Review queue that keeps requests in process memory. Stands in for the
/// real case-management hand-off until one is wired up.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReviewSink {
    requests: Arc<Mutex<Vec<ReviewRequest>>>,
}

impl ReviewSink for InMemoryReviewSink {
    fn enqueue(&self, request: ReviewRequest) -> Result<(), ReviewError> {
        tracing::info!(
            case = %request.case_id.0,
            level = request.risk_level.label(),
            score = request.risk_score,
            "case queued for review"
        );
        let mut guard = self.requests.lock().expect("review mutex poisoned");
        guard.push(request);
        Ok(())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
