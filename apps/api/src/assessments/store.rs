//! Monthly assessment persistence. Append-only per user per month.

use chrono::NaiveDate;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

pub struct AssessmentRecord<'a> {
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub phq9_score: i32,
    pub gad7_score: i32,
    pub phq9_answers: &'a Value,
    pub gad7_answers: &'a Value,
    pub phq9_severity: Option<&'a str>,
    pub phq9_confidence: Option<f64>,
    pub gad7_severity: Option<&'a str>,
    pub gad7_confidence: Option<f64>,
}

pub async fn insert_assessment(
    pool: &PgPool,
    record: &AssessmentRecord<'_>,
) -> Result<Uuid, AppError> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO monthly_assessments
            (id, user_id, entry_date, phq9_score, gad7_score, phq9_answers,
             gad7_answers, phq9_severity, phq9_confidence, gad7_severity,
             gad7_confidence)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(id)
    .bind(record.user_id)
    .bind(record.entry_date)
    .bind(record.phq9_score)
    .bind(record.gad7_score)
    .bind(record.phq9_answers)
    .bind(record.gad7_answers)
    .bind(record.phq9_severity)
    .bind(record.phq9_confidence)
    .bind(record.gad7_severity)
    .bind(record.gad7_confidence)
    .execute(pool)
    .await?;
    Ok(id)
}
