use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use super::decision::{decide, ScreeningDecision};
use super::passport::{FieldSet, PassportRulesEngine, RulesReport, ScoringConfig};

/// CSV column that names the case instead of contributing a field.
const CASE_ID_HEADER: &str = "case_id";

/// Screens a CSV of captures, one document per row, headers carrying the
/// canonical field names. Rows never abort the batch; every row produces
/// a report and a decision.
pub struct BatchScreener {
    engine: PassportRulesEngine,
    today: NaiveDate,
}

impl BatchScreener {
    pub fn new(config: ScoringConfig, today: NaiveDate) -> Self {
        Self {
            engine: PassportRulesEngine::new(config),
            today,
        }
    }

    pub fn screen_path<P: AsRef<Path>>(&self, path: P) -> Result<BatchReport, BatchError> {
        let file = std::fs::File::open(path)?;
        self.screen_reader(file)
    }

    pub fn screen_reader<R: Read>(&self, reader: R) -> Result<BatchReport, BatchError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let mut rows = Vec::new();
        let mut summary = BatchSummary::default();

        for entry in csv_reader.records() {
            let record = entry?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let mut fields = FieldSet::new();
            let mut case_id = None;
            for (header, value) in headers.iter().zip(record.iter()) {
                if header == CASE_ID_HEADER {
                    if !value.is_empty() {
                        case_id = Some(value.to_string());
                    }
                    continue;
                }
                fields.insert(header, value);
            }

            let report = self.engine.apply(&fields, self.today);
            let decision = decide(&report);
            summary.tally(&report, &decision);

            rows.push(BatchRow {
                line,
                case_id,
                report,
                decision,
            });
        }

        Ok(BatchReport { rows, summary })
    }
}

/// One screened CSV row.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    /// CSV line number for operator reference.
    pub line: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_id: Option<String>,
    pub report: RulesReport,
    pub decision: ScreeningDecision,
}

/// Decision counts over one batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub approved: usize,
    pub review: usize,
    pub suspected: usize,
    pub max_risk_score: f64,
}

impl BatchSummary {
    fn tally(&mut self, report: &RulesReport, decision: &ScreeningDecision) {
        self.total += 1;
        match decision {
            ScreeningDecision::Approved => self.approved += 1,
            ScreeningDecision::Review { .. } => self.review += 1,
            ScreeningDecision::Suspected { .. } => self.suspected += 1,
        }
        if report.risk_score > self.max_risk_score {
            self.max_risk_score = report.risk_score;
        }
    }
}

/// Full outcome of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub rows: Vec<BatchRow>,
    pub summary: BatchSummary,
}

/// Error raised while reading a capture batch.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to read capture batch: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid capture CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LINE1: &str = "P<AZEKALKAN<<FIMAR<<<<<<<<<<<<<<<<<<<<<<<<<<";
    const LINE2: &str = "C092555921AZE5910058F261123929108E0<<<<<<<08";

    fn screener() -> BatchScreener {
        BatchScreener::new(
            ScoringConfig::default(),
            NaiveDate::from_ymd_opt(2026, 1, 15).expect("valid date"),
        )
    }

    fn batch_csv() -> String {
        format!(
            "case_id,mrz_upper_line,mrz_lower_line,document_number,primary_identifier,sex,date_of_birth\n\
             batch-001,{LINE1},{LINE2},C09255592,KALKAN,F,05.10.1959\n\
             batch-002,{LINE1},{LINE2},C09255592,SMITH,F,05.10.1959\n"
        )
    }

    #[test]
    fn screens_each_row_and_tallies_decisions() {
        let report = screener()
            .screen_reader(Cursor::new(batch_csv()))
            .expect("batch screens");

        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.approved, 1);
        assert_eq!(report.summary.suspected, 1);
        assert_eq!(report.summary.review, 0);
        assert_eq!(report.summary.max_risk_score, 0.2);

        assert_eq!(report.rows[0].case_id.as_deref(), Some("batch-001"));
        assert!(report.rows[0].decision.is_approved());
        assert_eq!(report.rows[0].line, 2);

        assert_eq!(report.rows[1].case_id.as_deref(), Some("batch-002"));
        assert_eq!(report.rows[1].decision.label(), "suspected");
    }

    #[test]
    fn header_only_input_yields_empty_report() {
        let report = screener()
            .screen_reader(Cursor::new("case_id,mrz_upper_line,mrz_lower_line\n"))
            .expect("batch screens");
        assert!(report.rows.is_empty());
        assert_eq!(report.summary, BatchSummary::default());
    }

    #[test]
    fn rows_without_case_id_still_screen() {
        let csv = "mrz_upper_line,mrz_lower_line\nshort,lines\n";
        let report = screener()
            .screen_reader(Cursor::new(csv))
            .expect("batch screens");
        assert_eq!(report.summary.total, 1);
        assert_eq!(report.rows[0].case_id, None);
        assert_eq!(report.rows[0].decision.label(), "review");
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let error = screener()
            .screen_path("./does-not-exist.csv")
            .expect_err("expected io error");
        match error {
            BatchError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
