#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Audit row for the primary-symptom rule engine: the raw counts the rules
/// saw plus each rule's outcome.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PrimarySymptomsRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub screening_id: Uuid,
    pub wpi_score: i32,
    pub sss_part_a: i32,
    pub sss_part_b: i32,
    pub sss_score: i32,
    pub duration_4_weeks: bool,
    pub rule_early_severity: bool,
    pub rule_pain_spread: bool,
    pub rule_persistence: bool,
    pub rules_met: i32,
    pub primary_score: f64,
    pub created_at: DateTime<Utc>,
}

/// Audit row for the secondary-symptom counter: one flag column per
/// catalog item plus the recognized count and its normalization.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SecondarySymptomsRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub screening_id: Uuid,
    pub headache: bool,
    pub paresthesia: bool,
    pub allodynia: bool,
    pub ibs: bool,
    pub depression: bool,
    pub sweating: bool,
    pub sensory_sensitivity: bool,
    pub menstrual_pain: bool,
    pub morning_stiffness: bool,
    pub jaw_pain: bool,
    pub total_count: i32,
    pub score_norm: f64,
    pub created_at: DateTime<Utc>,
}

/// Audit row for the risk-factor aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RiskFactorsRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub screening_id: Uuid,
    pub family_history: bool,
    pub comorbid_conditions: bool,
    pub trauma_history: bool,
    pub ptsd: bool,
    pub anxiety_depression: bool,
    pub physical_inactivity: bool,
    pub sex_factor: bool,
    pub risk_sum: f64,
    pub risk_fraction: f64,
    pub created_at: DateTime<Utc>,
}

/// The classifier verdict row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScreeningResultRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub screening_id: Uuid,
    pub risk_probability: f64,
    pub risk_category: String,
    pub screening_status: String,
    pub created_at: DateTime<Utc>,
}

/// Summary row: the authoritative record per submission. The latest one
/// per user backs the profile display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScreeningRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pain_regions: Value,
    pub secondary_symptoms: Value,
    pub sss_detail: Value,
    pub duration: String,
    pub first_score: i32,
    pub wpi_score: i32,
    pub sss_score: i32,
    pub composite_score: f64,
    pub meets_criteria: bool,
    pub risk_level: String,
    pub is_eligible: bool,
    pub score_source: String,
    pub fallback_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
