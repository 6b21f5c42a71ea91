use super::common::*;
use crate::screening::passport::fields::keys;
use crate::screening::passport::rules::{RuleContext, RuleDef};
use crate::screening::passport::{
    run_rule, FieldSet, PassportRulesEngine, RiskLevel, ScoringConfig, Severity,
};

#[test]
fn clean_specimen_screens_clean() {
    let report = screen(&clean_capture());

    assert_eq!(report.rules_total, 10);
    assert_eq!(report.rules_passed, 10);
    assert_eq!(report.rules_failed, 0);
    assert!(report.violations.is_empty());
    assert_eq!(report.risk_score, 0.0);
    assert_eq!(report.risk_level, RiskLevel::Low);
    assert_eq!(report.rules_version, "passport-v1.0");
    assert!(!report.has_critical());
}

#[test]
fn rules_failed_counts_rules_not_violations() {
    let mut fields = FieldSet::new();
    fields.insert(keys::DOCUMENT_NUMBER, "C09255592");
    fields.insert(keys::PRIMARY_IDENTIFIER, "KALKAN");
    fields.insert(keys::DATE_OF_BIRTH, "05.10.1959");

    let report = screen(&fields);

    // Two missing lines and two missing required fields, but only two
    // distinct rules tripped.
    assert_eq!(report.violations.len(), 4);
    assert_eq!(report.rules_failed, 2);
    assert_eq!(report.rules_passed, 8);
}

#[test]
fn invalid_format_suppresses_column_rules() {
    let mut fields = FieldSet::new();
    fields.insert(keys::MRZ_UPPER_LINE, "SHORT");
    fields.insert(keys::MRZ_LOWER_LINE, "LINES");
    fields.insert(keys::DOCUMENT_NUMBER, "C09255592");
    fields.insert(keys::PRIMARY_IDENTIFIER, "KALKAN");
    fields.insert(keys::DATE_OF_BIRTH, "05.10.1959");

    let report = screen(&fields);

    assert_eq!(report.violations.len(), 3);
    assert!(report
        .violations
        .iter()
        .all(|violation| violation.rule_id == "MRZ_FORMAT"));
}

#[test]
fn reports_are_reproducible() {
    let fields = clean_capture();

    let first = screen(&fields);
    let second = screen(&fields);

    assert_eq!(first, second);
}

#[test]
fn scoring_config_reaches_the_report() {
    let config = ScoringConfig {
        score_divisor: 3.0,
        ..ScoringConfig::default()
    };
    let engine = PassportRulesEngine::new(config);
    let mut fields = clean_capture();
    fields.insert(keys::MRZ_LOWER_LINE, &tamper(LINE2, 43, '7'));

    let report = engine.apply(&fields, today());

    assert_eq!(report.risk_score, 1.0);
    assert_eq!(report.risk_level, RiskLevel::Critical);
}

#[test]
fn panicking_rule_degrades_to_low_finding() {
    let rule = RuleDef {
        id: "SELF_TEST",
        name: "Self Test",
        run: |_| panic!("synthetic rule failure"),
    };
    let fields = FieldSet::new();
    let ctx = RuleContext {
        fields: &fields,
        mrz: None,
        today: today(),
    };

    let violations = run_rule(&rule, &ctx);

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule_id, "SELF_TEST");
    assert_eq!(violations[0].rule_name, "Self Test");
    assert_eq!(violations[0].severity, Severity::Low);
    assert_eq!(
        violations[0].detail,
        "rule execution error: synthetic rule failure"
    );
}
