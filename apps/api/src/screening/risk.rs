//! Risk factor aggregator.
//!
//! Six submitted boolean factors plus an implicit seventh when the stored
//! sex is Female, each worth 0.25. The fraction normalizes against the
//! maximum attainable sum (7 × 0.25 = 1.75) and clamps to 1.0 so the
//! composite stays bounded.

use crate::models::profile::Sex;
use crate::screening::normalize::RiskFactorFlags;

pub const FACTOR_WEIGHT: f64 = 0.25;
const MAX_FACTOR_SUM: f64 = 1.75;

#[derive(Debug, Clone, Copy)]
pub struct RiskAssessment {
    /// Count of true submitted factors, excluding the sex factor.
    pub active_factors: u32,
    pub sex_factor: bool,
    pub risk_sum: f64,
    pub fraction: f64,
}

pub fn aggregate_risk_factors(flags: &RiskFactorFlags, sex: Option<Sex>) -> RiskAssessment {
    let active_factors = [
        flags.family_history,
        flags.comorbid_conditions,
        flags.trauma_history,
        flags.ptsd,
        flags.anxiety_depression,
        flags.physical_inactivity,
    ]
    .iter()
    .filter(|b| **b)
    .count() as u32;

    let sex_factor = sex == Some(Sex::Female);
    let total = active_factors + u32::from(sex_factor);
    let risk_sum = f64::from(total) * FACTOR_WEIGHT;
    let fraction = (risk_sum / MAX_FACTOR_SUM).min(1.0);

    RiskAssessment {
        active_factors,
        sex_factor,
        risk_sum,
        fraction,
    }
}
