use serde::{Deserialize, Serialize};

/// Severity of a single finding, ordered least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

/// Aggregate risk band derived from the weighted score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }
}

/// Calibration of the risk aggregation: per-severity weights, the weight
/// sum that saturates the score at 1.0, and the band thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub low_weight: f64,
    pub medium_weight: f64,
    pub high_weight: f64,
    pub critical_weight: f64,
    pub score_divisor: f64,
    pub medium_threshold: f64,
    pub high_threshold: f64,
    pub critical_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            low_weight: 0.5,
            medium_weight: 1.0,
            high_weight: 2.0,
            critical_weight: 3.0,
            score_divisor: 15.0,
            medium_threshold: 0.2,
            high_threshold: 0.4,
            critical_threshold: 0.7,
        }
    }
}

impl ScoringConfig {
    pub fn weight(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Low => self.low_weight,
            Severity::Medium => self.medium_weight,
            Severity::High => self.high_weight,
            Severity::Critical => self.critical_weight,
        }
    }

    /// Weighted severity sum capped at 1.0, rounded to three decimals so
    /// reports stay byte-stable across runs.
    pub fn score(&self, violations: &[RuleViolation]) -> f64 {
        let total: f64 = violations
            .iter()
            .map(|violation| self.weight(violation.severity))
            .sum();
        let bounded = (total / self.score_divisor).min(1.0);
        (bounded * 1000.0).round() / 1000.0
    }

    pub fn level_for(&self, score: f64) -> RiskLevel {
        if score >= self.critical_threshold {
            RiskLevel::Critical
        } else if score >= self.high_threshold {
            RiskLevel::High
        } else if score >= self.medium_threshold {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// A triggered rule together with the concrete values that tripped it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule_id: String,
    pub rule_name: String,
    pub severity: Severity,
    pub detail: String,
}

/// Outcome of one catalog run over a capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesReport {
    pub rules_total: usize,
    pub rules_passed: usize,
    pub rules_failed: usize,
    pub violations: Vec<RuleViolation>,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub rules_version: String,
}

impl RulesReport {
    pub fn has_critical(&self) -> bool {
        self.violations
            .iter()
            .any(|violation| violation.severity == Severity::Critical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(severity: Severity) -> RuleViolation {
        RuleViolation {
            rule_id: "TEST".to_string(),
            rule_name: "Test".to_string(),
            severity,
            detail: "detail".to_string(),
        }
    }

    #[test]
    fn score_weights_severities_and_rounds() {
        let config = ScoringConfig::default();
        let violations = vec![
            violation(Severity::Critical),
            violation(Severity::High),
            violation(Severity::Medium),
            violation(Severity::Low),
        ];
        // (3 + 2 + 1 + 0.5) / 15 = 0.4333...
        assert_eq!(config.score(&violations), 0.433);
    }

    #[test]
    fn score_saturates_at_one() {
        let config = ScoringConfig::default();
        let violations: Vec<_> = (0..8).map(|_| violation(Severity::Critical)).collect();
        assert_eq!(config.score(&violations), 1.0);
    }

    #[test]
    fn score_of_no_violations_is_zero() {
        let config = ScoringConfig::default();
        assert_eq!(config.score(&[]), 0.0);
        assert_eq!(config.level_for(0.0), RiskLevel::Low);
    }

    #[test]
    fn level_thresholds_are_inclusive() {
        let config = ScoringConfig::default();
        assert_eq!(config.level_for(0.199), RiskLevel::Low);
        assert_eq!(config.level_for(0.2), RiskLevel::Medium);
        assert_eq!(config.level_for(0.4), RiskLevel::High);
        assert_eq!(config.level_for(0.7), RiskLevel::Critical);
        assert_eq!(config.level_for(1.0), RiskLevel::Critical);
    }

    #[test]
    fn single_critical_lands_on_medium_boundary() {
        let config = ScoringConfig::default();
        let score = config.score(&[violation(Severity::Critical)]);
        assert_eq!(score, 0.2);
        assert_eq!(config.level_for(score), RiskLevel::Medium);
    }

    #[test]
    fn severity_orders_and_serializes_uppercase() {
        assert!(Severity::Low < Severity::Critical);
        assert!(RiskLevel::Medium < RiskLevel::High);
        let json = serde_json::to_string(&Severity::Critical).expect("serializes");
        assert_eq!(json, "\"CRITICAL\"");
        let level: RiskLevel = serde_json::from_str("\"HIGH\"").expect("deserializes");
        assert_eq!(level, RiskLevel::High);
    }
}
