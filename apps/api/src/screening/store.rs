//! Screening persistence.
//!
//! One submission produces five rows: the summary row plus one audit row
//! per scoring module and the verdict row, written in a single
//! transaction so a mid-write failure leaves nothing behind.

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::screening::ScreeningRow;
use crate::screening::normalize::NormalizedScreening;
use crate::screening::predictor::ResolvedRisk;
use crate::screening::primary::PrimaryEvaluation;
use crate::screening::risk::RiskAssessment;
use crate::screening::secondary;

/// Everything computed for one submission, ready to persist.
pub struct ScreeningOutcome<'a> {
    pub user_id: Uuid,
    pub normalized: &'a NormalizedScreening,
    pub primary: PrimaryEvaluation,
    pub secondary_count: u32,
    pub secondary_norm: f64,
    pub risk: RiskAssessment,
    pub composite: f64,
    pub resolved: ResolvedRisk,
    pub acr_met: bool,
    pub eligible: bool,
}

pub async fn insert_screening(
    pool: &PgPool,
    outcome: &ScreeningOutcome<'_>,
) -> Result<Uuid, AppError> {
    let screening_id = Uuid::new_v4();
    let n = outcome.normalized;

    let sss_detail = json!({
        "part_a": {
            "fatigue": n.sss_fatigue,
            "sleep": n.sss_sleep,
            "cognitive": n.sss_cognitive,
        },
        "part_b": {
            "headache": n.somatic_headache,
            "abdomenPain": n.somatic_abdomen_pain,
            "depression": n.somatic_depression,
        },
    });
    let duration = if n.duration_4_weeks {
        "4_weeks_or_more"
    } else {
        "less_than_4_weeks"
    };

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO screenings
            (id, user_id, pain_regions, secondary_symptoms, sss_detail, duration,
             first_score, wpi_score, sss_score, composite_score, meets_criteria,
             risk_level, is_eligible, score_source, fallback_reason)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#,
    )
    .bind(screening_id)
    .bind(outcome.user_id)
    .bind(json!(n.wpi_regions))
    .bind(json!(n.secondary_symptoms))
    .bind(sss_detail)
    .bind(duration)
    .bind(n.first_score() as i32)
    .bind(n.wpi_score() as i32)
    .bind(n.sss_score() as i32)
    .bind(outcome.composite)
    .bind(outcome.acr_met)
    .bind(outcome.resolved.category.as_str())
    .bind(outcome.eligible)
    .bind(outcome.resolved.source.as_str())
    .bind(outcome.resolved.source.fallback_reason())
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO primary_symptoms
            (id, user_id, screening_id, wpi_score, sss_part_a, sss_part_b, sss_score,
             duration_4_weeks, rule_early_severity, rule_pain_spread, rule_persistence,
             rules_met, primary_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(outcome.user_id)
    .bind(screening_id)
    .bind(n.wpi_score() as i32)
    .bind(n.sss_part_a() as i32)
    .bind(n.sss_part_b() as i32)
    .bind(n.sss_score() as i32)
    .bind(n.duration_4_weeks)
    .bind(outcome.primary.rule_early_severity)
    .bind(outcome.primary.rule_pain_spread)
    .bind(outcome.primary.rule_persistence)
    .bind(outcome.primary.rules_met() as i32)
    .bind(outcome.primary.score())
    .execute(&mut *tx)
    .await?;

    let flags = &n.secondary_symptoms;
    sqlx::query(
        r#"
        INSERT INTO secondary_symptoms
            (id, user_id, screening_id, headache, paresthesia, allodynia, ibs,
             depression, sweating, sensory_sensitivity, menstrual_pain,
             morning_stiffness, jaw_pain, total_count, score_norm)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(outcome.user_id)
    .bind(screening_id)
    .bind(secondary::has_flag(flags, "headache"))
    .bind(secondary::has_flag(flags, "paresthesia"))
    .bind(secondary::has_flag(flags, "allodynia"))
    .bind(secondary::has_flag(flags, "ibs"))
    .bind(secondary::has_flag(flags, "depression"))
    .bind(secondary::has_flag(flags, "sweating"))
    .bind(secondary::has_flag(flags, "sensory_sensitivity"))
    .bind(secondary::has_flag(flags, "menstrual_pain"))
    .bind(secondary::has_flag(flags, "morning_stiffness"))
    .bind(secondary::has_flag(flags, "jaw_pain"))
    .bind(outcome.secondary_count as i32)
    .bind(outcome.secondary_norm)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO risk_factors
            (id, user_id, screening_id, family_history, comorbid_conditions,
             trauma_history, ptsd, anxiety_depression, physical_inactivity,
             sex_factor, risk_sum, risk_fraction)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(outcome.user_id)
    .bind(screening_id)
    .bind(n.risk_factors.family_history)
    .bind(n.risk_factors.comorbid_conditions)
    .bind(n.risk_factors.trauma_history)
    .bind(n.risk_factors.ptsd)
    .bind(n.risk_factors.anxiety_depression)
    .bind(n.risk_factors.physical_inactivity)
    .bind(outcome.risk.sex_factor)
    .bind(outcome.risk.risk_sum)
    .bind(outcome.risk.fraction)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO screening_results
            (id, user_id, screening_id, risk_probability, risk_category, screening_status)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(outcome.user_id)
    .bind(screening_id)
    .bind(outcome.resolved.probability)
    .bind(outcome.resolved.category.as_str())
    .bind("Completed")
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(screening_id)
}

/// The most recent screening for a user, if any. Authoritative for the
/// profile display.
pub async fn latest_screening(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<ScreeningRow>, AppError> {
    let row = sqlx::query_as(
        "SELECT * FROM screenings WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
