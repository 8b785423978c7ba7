//! Primary symptom rule engine.
//!
//! Three independent rules over the WPI region count, the total SSS and the
//! symptom-duration flag, OR-combined into a binary primary score. The
//! per-rule outcomes are kept for the audit row.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PrimaryEvaluation {
    /// (WPI 2–3 and SSS 4–5) or (WPI ≥ 4 and SSS ≥ 4) or
    /// (SSS ≥ 6 with some pain and ≥4-week duration).
    pub rule_early_severity: bool,
    /// Pain reported in at least two regions.
    pub rule_pain_spread: bool,
    /// Symptoms persisting four weeks or more.
    pub rule_persistence: bool,
}

impl PrimaryEvaluation {
    pub fn any_met(&self) -> bool {
        self.rule_early_severity || self.rule_pain_spread || self.rule_persistence
    }

    /// Binary primary score: 1.0 when any rule is met.
    pub fn score(&self) -> f64 {
        if self.any_met() {
            1.0
        } else {
            0.0
        }
    }

    pub fn rules_met(&self) -> u32 {
        [
            self.rule_early_severity,
            self.rule_pain_spread,
            self.rule_persistence,
        ]
        .iter()
        .filter(|b| **b)
        .count() as u32
    }
}

pub fn evaluate_primary(wpi_score: u32, sss_score: u32, duration_4_weeks: bool) -> PrimaryEvaluation {
    let rule_early_severity = ((2..=3).contains(&wpi_score) && (4..=5).contains(&sss_score))
        || (wpi_score >= 4 && sss_score >= 4)
        || (sss_score >= 6 && wpi_score > 0 && duration_4_weeks);

    PrimaryEvaluation {
        rule_early_severity,
        rule_pain_spread: wpi_score >= 2,
        rule_persistence: duration_4_weeks,
    }
}
