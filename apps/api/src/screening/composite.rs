//! Composite score and classifier.
//!
//! Combines the three module sub-scores under a fixed weighting scheme,
//! maps the result onto a three-level risk category, evaluates the ACR
//! diagnostic criteria independently on the raw counts, and reconciles the
//! two into an eligibility verdict.
//!
//! Canonical policy: weights 0.6/0.3/0.1 (primary/secondary/risk) and
//! category-only eligibility. ACR is computed and persisted but does not
//! OR into the verdict. Both live here as explicit config structs, not
//! hidden literals.

use serde::{Deserialize, Serialize};

/// Composite weighting: primary 0.6, secondary 0.3, risk factors 0.1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub primary: f64,
    pub secondary: f64,
    pub risk: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            primary: 0.6,
            secondary: 0.3,
            risk: 0.1,
        }
    }
}

/// Category cutoffs, inclusive: score ≥ high → High, ≥ moderate → Moderate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub high: f64,
    pub moderate: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: 0.7,
            moderate: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Moderate,
    High,
}

impl RiskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Moderate => "Moderate",
            RiskCategory::High => "High",
        }
    }

    /// Maps a classifier label back onto a category (the label encoder's
    /// inverse direction).
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Low" => Some(RiskCategory::Low),
            "Moderate" => Some(RiskCategory::Moderate),
            "High" => Some(RiskCategory::High),
            _ => None,
        }
    }
}

/// Weighted composite of the three module sub-scores, clamped to [0, 1].
pub fn composite_score(
    primary_scaled: f64,
    secondary_norm: f64,
    risk_fraction: f64,
    weights: &ScoringWeights,
) -> f64 {
    (weights.primary * primary_scaled
        + weights.secondary * secondary_norm
        + weights.risk * risk_fraction)
        .clamp(0.0, 1.0)
}

pub fn categorize(score: f64, thresholds: &RiskThresholds) -> RiskCategory {
    if score >= thresholds.high {
        RiskCategory::High
    } else if score >= thresholds.moderate {
        RiskCategory::Moderate
    } else {
        RiskCategory::Low
    }
}

/// ACR diagnostic criteria on raw integer counts:
/// (WPI ≥ 7 and SSS ≥ 5) or (WPI 3–6 and SSS ≥ 9).
pub fn acr_criteria_met(wpi_score: u32, sss_score: u32) -> bool {
    (wpi_score >= 7 && sss_score >= 5) || ((3..=6).contains(&wpi_score) && sss_score >= 9)
}

/// Eligibility verdict: High or Moderate category. ACR alone does not
/// qualify.
pub fn is_eligible(category: RiskCategory) -> bool {
    matches!(category, RiskCategory::High | RiskCategory::Moderate)
}
