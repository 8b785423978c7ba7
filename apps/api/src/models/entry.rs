use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One immutable calendar-day record. `wpi` holds the JSON list of ticked
/// body regions; `sss` the JSON severity sub-map (fatigue/cognitive/sleep/
/// somatic). Absent scores stay NULL, never coerced to zero.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyEntryRow {
    pub id: Uuid,
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
    pub wpi: Option<Value>,
    pub sss: Option<Value>,
    pub created_at: DateTime<Utc>,
}
