use serde::{Deserialize, Serialize};

use super::passport::{RiskLevel, RulesReport, Severity};

/// Adjudication outcome for a screened document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScreeningDecision {
    Approved,
    Review { reasons: Vec<String> },
    Suspected { reasons: Vec<String> },
}

impl ScreeningDecision {
    pub fn label(&self) -> &'static str {
        match self {
            ScreeningDecision::Approved => "approved",
            ScreeningDecision::Review { .. } => "review",
            ScreeningDecision::Suspected { .. } => "suspected",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, ScreeningDecision::Approved)
    }

    pub fn summary(&self) -> String {
        match self {
            ScreeningDecision::Approved => "document approved".to_string(),
            ScreeningDecision::Review { reasons } => {
                if reasons.is_empty() {
                    "requires manual review".to_string()
                } else {
                    format!("manual review required: {}", reasons.join("; "))
                }
            }
            ScreeningDecision::Suspected { reasons } => {
                if reasons.is_empty() {
                    "suspected tampering".to_string()
                } else {
                    format!("suspected tampering: {}", reasons.join("; "))
                }
            }
        }
    }
}

/// Map a rules report to the screening outcome. Critical findings mean the
/// document itself fails its own arithmetic or contradicts the printed
/// face; elevated risk without criticals goes to a human queue.
pub fn decide(report: &RulesReport) -> ScreeningDecision {
    let critical: Vec<String> = report
        .violations
        .iter()
        .filter(|violation| violation.severity == Severity::Critical)
        .map(|violation| violation.detail.clone())
        .collect();
    if !critical.is_empty() {
        return ScreeningDecision::Suspected { reasons: critical };
    }

    if report.risk_level >= RiskLevel::High {
        return ScreeningDecision::Review {
            reasons: vec![format!(
                "risk level {} (score {:.3})",
                report.risk_level.label(),
                report.risk_score
            )],
        };
    }

    ScreeningDecision::Approved
}
