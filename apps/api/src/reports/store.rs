//! Report persistence. Weekly summaries are append-only (every request
//! writes a fresh row); the final report is one row per user, replaced on
//! each recompute.

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::report::WeeklySummaryRow;
use crate::reports::weekly::WeeklySummary;

pub async fn insert_weekly_summary(
    pool: &PgPool,
    user_id: Uuid,
    summary: &WeeklySummary,
) -> Result<Uuid, AppError> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO weekly_summaries
            (id, user_id, week_start, week_end, week_number, averages, acr_status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(summary.week_start)
    .bind(summary.week_end)
    .bind(summary.week_number)
    .bind(serde_json::to_value(&summary.averages).map_err(anyhow::Error::from)?)
    .bind(summary.acr_status)
    .execute(pool)
    .await?;
    Ok(id)
}

/// The weekly series in week order, oldest first.
pub async fn weekly_summaries_ascending(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<WeeklySummaryRow>, AppError> {
    let rows = sqlx::query_as(
        "SELECT * FROM weekly_summaries WHERE user_id = $1 ORDER BY week_start ASC, created_at ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// The weekly series newest first, for dashboards.
pub async fn weekly_summaries_descending(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<WeeklySummaryRow>, AppError> {
    let rows = sqlx::query_as(
        "SELECT * FROM weekly_summaries WHERE user_id = $1 ORDER BY week_start DESC, created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Last-write-wins upsert of the per-user final report.
pub async fn upsert_final_report(
    pool: &PgPool,
    user_id: Uuid,
    report: &Value,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO final_reports (id, user_id, report, generated_at)
        VALUES ($1, $2, $3, now())
        ON CONFLICT (user_id)
        DO UPDATE SET report = EXCLUDED.report, generated_at = now()
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(report)
    .execute(pool)
    .await?;
    Ok(())
}
