//! Screening submission normalizer.
//!
//! Converts the wire payload (typed optional-field record, never ad hoc map
//! probing) into bounded, deduplicated inputs for the module scorers.
//! Pure validation: no storage access, no write on failure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::Sex;

/// FiRST pre-screen: six yes/no items, wire keys f1–f6.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FirstAnswers {
    #[serde(rename = "f1", default)]
    pub widespread_pain: bool,
    #[serde(rename = "f2", default)]
    pub fatigue: bool,
    #[serde(rename = "f3", default)]
    pub pain_type: bool,
    #[serde(rename = "f4", default)]
    pub unusual_sensations: bool,
    #[serde(rename = "f5", default)]
    pub other_health_problems: bool,
    #[serde(rename = "f6", default)]
    pub impact_on_life: bool,
}

impl FirstAnswers {
    pub fn score(&self) -> u32 {
        [
            self.widespread_pain,
            self.fatigue,
            self.pain_type,
            self.unusual_sensations,
            self.other_health_problems,
            self.impact_on_life,
        ]
        .iter()
        .filter(|b| **b)
        .count() as u32
    }
}

/// SSS part A: fatigue/sleep/cognitive subscales, 0–3 each. Missing values
/// count as 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SssAnswers {
    pub fatigue: Option<i64>,
    pub sleep: Option<i64>,
    pub cognitive: Option<i64>,
}

/// SSS part B: three binary somatic flags.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SssSomatic {
    pub headache: Option<i64>,
    #[serde(rename = "abdomenPain")]
    pub abdomen_pain: Option<i64>,
    pub depression: Option<i64>,
}

/// Six named risk factors, wire keys r1–r6.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RiskFactorFlags {
    #[serde(rename = "r1", default)]
    pub family_history: bool,
    #[serde(rename = "r2", default)]
    pub comorbid_conditions: bool,
    #[serde(rename = "r3", default)]
    pub trauma_history: bool,
    #[serde(rename = "r4", default)]
    pub ptsd: bool,
    #[serde(rename = "r5", default)]
    pub anxiety_depression: bool,
    #[serde(rename = "r6", default)]
    pub physical_inactivity: bool,
}

/// Raw screening payload as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreeningSubmission {
    pub user_id: Uuid,
    #[serde(default)]
    pub first_answers: FirstAnswers,
    #[serde(default)]
    pub wpi_regions: Vec<String>,
    #[serde(default)]
    pub sss_answers: SssAnswers,
    #[serde(default)]
    pub sss_somatic: SssSomatic,
    #[serde(default)]
    pub secondary_symptoms: Vec<String>,
    #[serde(default)]
    pub risk_factors: RiskFactorFlags,
    #[serde(default)]
    pub duration_4_weeks: bool,
    /// Overrides the stored profile sex when present.
    #[serde(default)]
    pub user_sex: Option<Sex>,
}

/// Validated, bounded screening inputs.
#[derive(Debug, Clone)]
pub struct NormalizedScreening {
    pub first_answers: FirstAnswers,
    pub wpi_regions: Vec<String>,
    pub sss_fatigue: u32,
    pub sss_sleep: u32,
    pub sss_cognitive: u32,
    pub somatic_headache: u32,
    pub somatic_abdomen_pain: u32,
    pub somatic_depression: u32,
    pub secondary_symptoms: Vec<String>,
    pub risk_factors: RiskFactorFlags,
    pub duration_4_weeks: bool,
    pub user_sex: Option<Sex>,
}

impl NormalizedScreening {
    /// Widespread Pain Index: count of distinct ticked regions.
    pub fn wpi_score(&self) -> u32 {
        self.wpi_regions.len() as u32
    }

    /// SSS part A: fatigue + sleep + cognitive, 0–9.
    pub fn sss_part_a(&self) -> u32 {
        self.sss_fatigue + self.sss_sleep + self.sss_cognitive
    }

    /// SSS part B: somatic flags, 0–3.
    pub fn sss_part_b(&self) -> u32 {
        self.somatic_headache + self.somatic_abdomen_pain + self.somatic_depression
    }

    /// Total Symptom Severity Score, 0–12.
    pub fn sss_score(&self) -> u32 {
        self.sss_part_a() + self.sss_part_b()
    }

    pub fn first_score(&self) -> u32 {
        self.first_answers.score()
    }
}

pub fn normalize_screening(
    submission: &ScreeningSubmission,
) -> Result<NormalizedScreening, AppError> {
    let sss_fatigue = bounded("sss_answers.fatigue", submission.sss_answers.fatigue, 0, 3)?;
    let sss_sleep = bounded("sss_answers.sleep", submission.sss_answers.sleep, 0, 3)?;
    let sss_cognitive = bounded(
        "sss_answers.cognitive",
        submission.sss_answers.cognitive,
        0,
        3,
    )?;
    let somatic_headache = bounded("sss_somatic.headache", submission.sss_somatic.headache, 0, 1)?;
    let somatic_abdomen_pain = bounded(
        "sss_somatic.abdomenPain",
        submission.sss_somatic.abdomen_pain,
        0,
        1,
    )?;
    let somatic_depression = bounded(
        "sss_somatic.depression",
        submission.sss_somatic.depression,
        0,
        1,
    )?;

    let mut wpi_regions = submission.wpi_regions.clone();
    wpi_regions.sort();
    wpi_regions.dedup();

    let mut secondary_symptoms = submission.secondary_symptoms.clone();
    secondary_symptoms.sort();
    secondary_symptoms.dedup();

    Ok(NormalizedScreening {
        first_answers: submission.first_answers,
        wpi_regions,
        sss_fatigue,
        sss_sleep,
        sss_cognitive,
        somatic_headache,
        somatic_abdomen_pain,
        somatic_depression,
        secondary_symptoms,
        risk_factors: submission.risk_factors,
        duration_4_weeks: submission.duration_4_weeks,
        user_sex: submission.user_sex,
    })
}

/// Checks an optional subscale value against its closed bound. Missing
/// values normalize to 0; present values outside the bound are rejected
/// with a field-level message.
fn bounded(field: &str, value: Option<i64>, min: i64, max: i64) -> Result<u32, AppError> {
    match value {
        None => Ok(0),
        Some(v) if v >= min && v <= max => Ok(v as u32),
        Some(v) => Err(AppError::Validation(format!(
            "{field} must be between {min} and {max}, got {v}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_submission() -> ScreeningSubmission {
        ScreeningSubmission {
            user_id: Uuid::new_v4(),
            first_answers: FirstAnswers::default(),
            wpi_regions: vec![],
            sss_answers: SssAnswers::default(),
            sss_somatic: SssSomatic::default(),
            secondary_symptoms: vec![],
            risk_factors: RiskFactorFlags::default(),
            duration_4_weeks: false,
            user_sex: None,
        }
    }

    #[test]
    fn test_missing_subscales_normalize_to_zero() {
        let normalized = normalize_screening(&base_submission()).unwrap();
        assert_eq!(normalized.sss_score(), 0);
        assert_eq!(normalized.wpi_score(), 0);
    }

    #[test]
    fn test_sss_parts_sum() {
        let mut sub = base_submission();
        sub.sss_answers = SssAnswers {
            fatigue: Some(3),
            sleep: Some(2),
            cognitive: Some(2),
        };
        sub.sss_somatic = SssSomatic {
            headache: Some(1),
            abdomen_pain: Some(1),
            depression: Some(0),
        };
        let normalized = normalize_screening(&sub).unwrap();
        assert_eq!(normalized.sss_part_a(), 7);
        assert_eq!(normalized.sss_part_b(), 2);
        assert_eq!(normalized.sss_score(), 9);
    }

    #[test]
    fn test_subscale_above_bound_rejected() {
        let mut sub = base_submission();
        sub.sss_answers.fatigue = Some(4);
        let err = normalize_screening(&sub).unwrap_err();
        assert!(err.to_string().contains("sss_answers.fatigue"));
    }

    #[test]
    fn test_somatic_flag_above_bound_rejected() {
        let mut sub = base_submission();
        sub.sss_somatic.depression = Some(2);
        assert!(normalize_screening(&sub).is_err());
    }

    #[test]
    fn test_negative_subscale_rejected() {
        let mut sub = base_submission();
        sub.sss_answers.sleep = Some(-1);
        assert!(normalize_screening(&sub).is_err());
    }

    #[test]
    fn test_wpi_regions_deduplicated() {
        let mut sub = base_submission();
        sub.wpi_regions = vec![
            "neck".to_string(),
            "jaw_left".to_string(),
            "neck".to_string(),
        ];
        let normalized = normalize_screening(&sub).unwrap();
        assert_eq!(normalized.wpi_score(), 2);
    }

    #[test]
    fn test_first_score_counts_yes_answers() {
        let mut sub = base_submission();
        sub.first_answers.widespread_pain = true;
        sub.first_answers.impact_on_life = true;
        let normalized = normalize_screening(&sub).unwrap();
        assert_eq!(normalized.first_score(), 2);
    }

    #[test]
    fn test_wire_keys_deserialize() {
        let json = r#"{
            "user_id": "6f2c0b6a-58a3-4a6e-9d0e-3f4c8a2b1d00",
            "first_answers": {"f1": true, "f4": true},
            "wpi_regions": ["neck", "chest"],
            "sss_answers": {"fatigue": 2, "sleep": 1, "cognitive": 0},
            "sss_somatic": {"headache": 1, "abdomenPain": 0, "depression": 1},
            "secondary_symptoms": ["headache"],
            "risk_factors": {"r1": true, "r5": true},
            "duration_4_weeks": true,
            "user_sex": "Female"
        }"#;
        let sub: ScreeningSubmission = serde_json::from_str(json).unwrap();
        assert!(sub.first_answers.widespread_pain);
        assert!(sub.first_answers.unusual_sensations);
        assert!(sub.risk_factors.family_history);
        assert!(sub.risk_factors.anxiety_depression);
        assert!(!sub.risk_factors.ptsd);
        assert_eq!(sub.sss_somatic.abdomen_pain, Some(0));
        assert_eq!(sub.user_sex, Some(Sex::Female));
    }
}
