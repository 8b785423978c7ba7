#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One monthly PHQ-9/GAD-7 assessment. Append-only per user per month.
/// `*_answers` hold the raw item answers and per-item response latencies;
/// `*_severity`/`*_confidence` hold the predicted label when a severity
/// model produced one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MonthlyAssessmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub phq9_score: i32,
    pub gad7_score: i32,
    pub phq9_answers: Value,
    pub gad7_answers: Value,
    pub phq9_severity: Option<String>,
    pub phq9_confidence: Option<f64>,
    pub gad7_severity: Option<String>,
    pub gad7_confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
}
