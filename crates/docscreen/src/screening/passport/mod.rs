//! ICAO Doc 9303 passport validation: TD3 MRZ parsing, check digit
//! recomputation, visual-zone cross-checks, and severity-weighted risk
//! aggregation.

mod countries;
pub mod fields;
pub mod mrz;
pub mod risk;
mod rules;

#[cfg(test)]
mod tests;

pub use fields::{ExtractedField, FieldSet, PLACEHOLDER};
pub use mrz::{check_digit, decode_date, MrzRecord};
pub use risk::{RiskLevel, RuleViolation, RulesReport, ScoringConfig, Severity};

use chrono::NaiveDate;
use std::any::Any;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};

use fields::keys;
use rules::{RuleContext, RuleDef, CATALOG};

/// Catalog version carried in every report for audit traceability.
pub const RULES_VERSION: &str = "passport-v1.0";

/// Stateless validator applying the full passport rule catalog to one
/// captured document.
pub struct PassportRulesEngine {
    config: ScoringConfig,
}

impl PassportRulesEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Run every rule against one capture. Never fails: damaged input
    /// surfaces as violations. `today` anchors the date plausibility
    /// window so results for a given day are reproducible.
    pub fn apply(&self, fields: &FieldSet, today: NaiveDate) -> RulesReport {
        let mrz = match (
            fields.value(keys::MRZ_UPPER_LINE),
            fields.value(keys::MRZ_LOWER_LINE),
        ) {
            (Some(line1), Some(line2)) => Some(MrzRecord::parse(line1, line2)),
            _ => None,
        };
        let ctx = RuleContext {
            fields,
            mrz: mrz.as_ref(),
            today,
        };

        let mut violations = Vec::new();
        for rule in &CATALOG {
            violations.extend(run_rule(rule, &ctx));
        }

        let failed: BTreeSet<&str> = violations
            .iter()
            .map(|violation| violation.rule_id.as_str())
            .collect();
        let rules_total = CATALOG.len();
        let rules_failed = failed.len();
        let risk_score = self.config.score(&violations);

        RulesReport {
            rules_total,
            rules_passed: rules_total - rules_failed,
            rules_failed,
            violations,
            risk_score,
            risk_level: self.config.level_for(risk_score),
            rules_version: RULES_VERSION.to_string(),
        }
    }
}

impl Default for PassportRulesEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Evaluate one rule, trapping panics so a single misbehaving rule turns
/// into a LOW finding instead of aborting the remaining rules.
pub(crate) fn run_rule(rule: &RuleDef, ctx: &RuleContext<'_>) -> Vec<RuleViolation> {
    match panic::catch_unwind(AssertUnwindSafe(|| (rule.run)(ctx))) {
        Ok(findings) => findings
            .into_iter()
            .map(|(severity, detail)| RuleViolation {
                rule_id: rule.id.to_string(),
                rule_name: rule.name.to_string(),
                severity,
                detail,
            })
            .collect(),
        Err(payload) => {
            let detail = panic_detail(payload.as_ref());
            tracing::warn!(
                rule = rule.id,
                %detail,
                "rule evaluation panicked; continuing with remaining rules"
            );
            vec![RuleViolation {
                rule_id: rule.id.to_string(),
                rule_name: rule.name.to_string(),
                severity: Severity::Low,
                detail: format!("rule execution error: {detail}"),
            }]
        }
    }
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
