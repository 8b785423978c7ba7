//! Daily entry validation.
//!
//! The submission is a typed optional-field record: the entry date is the
//! only mandatory field, and every present score must sit inside its
//! closed bound. Absent fields stay `None`: they are stored as NULL and
//! never defaulted to zero. Pure validation, no storage access.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

const VALID_WORKLOAD: [&str; 4] = ["Light", "Moderate", "Heavy", "None"];

/// Daily SSS sub-map as submitted: fatigue/cognitive/sleep/somatic, 0–3
/// each when present.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DailySss {
    pub fatigue: Option<i64>,
    pub cognitive: Option<i64>,
    pub sleep: Option<i64>,
    pub somatic: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyEntrySubmission {
    pub user_id: Uuid,
    pub entry_date: Option<String>,
    #[serde(default)]
    pub pain_score: Option<i64>,
    #[serde(default)]
    pub fatigue_score: Option<i64>,
    #[serde(default)]
    pub stress_score: Option<i64>,
    #[serde(default)]
    pub mood_score: Option<i64>,
    #[serde(default)]
    pub sleep_quality: Option<i64>,
    #[serde(default)]
    pub cognitive_difficulty: Option<i64>,
    #[serde(default)]
    pub sensory_score: Option<i64>,
    #[serde(default)]
    pub weather_score: Option<i64>,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    #[serde(default)]
    pub exercise: Option<bool>,
    #[serde(default)]
    pub exercise_type: Option<String>,
    #[serde(default)]
    pub exercise_duration_minutes: Option<i64>,
    #[serde(default)]
    pub workload: Option<String>,
    #[serde(default)]
    pub illness: Option<bool>,
    #[serde(default)]
    pub wpi: Option<Vec<String>>,
    #[serde(default)]
    pub sss: Option<DailySss>,
}

/// A submission that passed validation, with parsed types.
#[derive(Debug, Clone)]
pub struct ValidatedDailyEntry {
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub pain_score: Option<i32>,
    pub fatigue_score: Option<i32>,
    pub stress_score: Option<i32>,
    pub mood_score: Option<i32>,
    pub sleep_quality: Option<i32>,
    pub cognitive_difficulty: Option<i32>,
    pub sensory_score: Option<i32>,
    pub weather_score: Option<i32>,
    pub sleep_hours: Option<f64>,
    pub exercise: Option<bool>,
    pub exercise_type: Option<String>,
    pub exercise_duration_minutes: Option<i32>,
    pub workload: Option<String>,
    pub illness: Option<bool>,
    pub wpi: Option<Vec<String>>,
    pub sss: Option<DailySss>,
}

pub fn validate_daily_entry(
    submission: &DailyEntrySubmission,
) -> Result<ValidatedDailyEntry, AppError> {
    let date_str = submission
        .entry_date
        .as_deref()
        .ok_or_else(|| AppError::Validation("Missing field: entry_date".to_string()))?;
    let entry_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!("entry_date '{date_str}' is not a valid YYYY-MM-DD date"))
    })?;

    let pain_score = score_in_range("pain_score", submission.pain_score, 0, 10)?;
    let fatigue_score = score_in_range("fatigue_score", submission.fatigue_score, 0, 10)?;
    let stress_score = score_in_range("stress_score", submission.stress_score, 0, 10)?;
    let mood_score = score_in_range("mood_score", submission.mood_score, 0, 10)?;
    let sleep_quality = score_in_range("sleep_quality", submission.sleep_quality, 0, 10)?;
    let cognitive_difficulty =
        score_in_range("cognitive_difficulty", submission.cognitive_difficulty, 0, 10)?;
    let sensory_score = score_in_range("sensory_score", submission.sensory_score, 0, 10)?;
    let weather_score = score_in_range("weather_score", submission.weather_score, 0, 10)?;

    let sss = match submission.sss {
        Some(sss) => {
            score_in_range("sss.fatigue", sss.fatigue, 0, 3)?;
            score_in_range("sss.cognitive", sss.cognitive, 0, 3)?;
            score_in_range("sss.sleep", sss.sleep, 0, 3)?;
            score_in_range("sss.somatic", sss.somatic, 0, 3)?;
            Some(sss)
        }
        None => None,
    };

    if let Some(workload) = submission.workload.as_deref() {
        if !VALID_WORKLOAD.contains(&workload) {
            return Err(AppError::Validation(format!(
                "Invalid workload '{workload}'. Allowed: {}",
                VALID_WORKLOAD.join(", ")
            )));
        }
    }

    Ok(ValidatedDailyEntry {
        user_id: submission.user_id,
        entry_date,
        pain_score,
        fatigue_score,
        stress_score,
        mood_score,
        sleep_quality,
        cognitive_difficulty,
        sensory_score,
        weather_score,
        sleep_hours: submission.sleep_hours,
        exercise: submission.exercise,
        exercise_type: submission.exercise_type.clone(),
        exercise_duration_minutes: submission.exercise_duration_minutes.map(|v| v as i32),
        workload: submission.workload.clone(),
        illness: submission.illness,
        wpi: submission.wpi.clone(),
        sss,
    })
}

fn score_in_range(
    field: &str,
    value: Option<i64>,
    min: i64,
    max: i64,
) -> Result<Option<i32>, AppError> {
    match value {
        None => Ok(None),
        Some(v) if v >= min && v <= max => Ok(Some(v as i32)),
        Some(v) => Err(AppError::Validation(format!(
            "{field} must be between {min} and {max}, got {v}"
        ))),
    }
}
