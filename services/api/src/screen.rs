use crate::infra::parse_date;
use chrono::{Local, NaiveDate};
use clap::Args;
use docscreen::error::AppError;
use docscreen::screening::{
    decide, BatchReport, BatchScreener, FieldSet, PassportRulesEngine, RulesReport, ScoringConfig,
    ScreeningDecision,
};
use serde_json::json;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScreenArgs {
    /// JSON capture file holding the extracted fields
    #[arg(long)]
    fields: PathBuf,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Emit the full report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file of captures, one row per document
    #[arg(long)]
    csv: PathBuf,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
    /// Emit the batch report as JSON instead of text
    #[arg(long)]
    json: bool,
}

pub(crate) fn run_screen(args: ScreenArgs) -> Result<(), AppError> {
    let ScreenArgs {
        fields: path,
        today,
        json,
    } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let raw = std::fs::read_to_string(&path)?;
    let payload: serde_json::Value = serde_json::from_str(&raw)?;
    let fields = FieldSet::from_json(&payload);

    let report = PassportRulesEngine::default().apply(&fields, today);
    let decision = decide(&report);

    if json {
        let output = json!({
            "outcome": decision.label(),
            "rationale": decision.summary(),
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    render_report(&path.display().to_string(), today, &report, &decision);
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs { csv, today, json } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let screener = BatchScreener::new(ScoringConfig::default(), today);
    let batch = screener.screen_path(&csv)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&batch)?);
        return Ok(());
    }

    render_batch(&csv.display().to_string(), today, &batch);
    Ok(())
}

fn render_report(
    source: &str,
    today: NaiveDate,
    report: &RulesReport,
    decision: &ScreeningDecision,
) {
    println!("Document screening: {source}");
    println!("Evaluated on {today}");
    println!(
        "Rules: {} passed / {} failed (catalog {})",
        report.rules_passed, report.rules_failed, report.rules_version
    );
    println!(
        "Risk: {:.3} ({})",
        report.risk_score,
        report.risk_level.label()
    );

    if !report.violations.is_empty() {
        println!("\nFindings");
        for violation in &report.violations {
            println!(
                "- [{}] {}: {}",
                violation.severity.label(),
                violation.rule_name,
                violation.detail
            );
        }
    }

    println!("\nDecision: {}", decision.summary());
}

fn render_batch(source: &str, today: NaiveDate, batch: &BatchReport) {
    println!("Batch screening: {source}");
    println!("Evaluated on {today}");
    println!("Captures: {}", batch.summary.total);
    println!("- approved:  {}", batch.summary.approved);
    println!("- review:    {}", batch.summary.review);
    println!("- suspected: {}", batch.summary.suspected);
    println!("Max risk score: {:.3}", batch.summary.max_risk_score);

    let flagged: Vec<_> = batch
        .rows
        .iter()
        .filter(|row| !row.decision.is_approved())
        .collect();
    if !flagged.is_empty() {
        println!("\nFlagged captures");
        for row in flagged {
            let case = row.case_id.as_deref().unwrap_or("unlabelled");
            println!("- line {} ({case}): {}", row.line, row.decision.summary());
        }
    }
}
