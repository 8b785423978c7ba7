//! Daily entry persistence. Entries are insert-only: there is no update
//! path, and the (user_id, entry_date) unique constraint rejects a second
//! submission for the same day.

use chrono::NaiveDate;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::{map_unique_violation, AppError};
use crate::models::entry::DailyEntryRow;
use crate::tracking::validate::ValidatedDailyEntry;

pub async fn insert_entry(pool: &PgPool, entry: &ValidatedDailyEntry) -> Result<Uuid, AppError> {
    let id = Uuid::new_v4();
    let wpi = entry.wpi.as_ref().map(|regions| json!(regions));
    let sss = entry.sss.as_ref().map(|sss| json!(sss));

    sqlx::query(
        r#"
        INSERT INTO daily_entries
            (id, user_id, entry_date, pain_score, fatigue_score, stress_score,
             mood_score, sleep_quality, cognitive_difficulty, sensory_score,
             weather_score, sleep_hours, exercise, exercise_type,
             exercise_duration_minutes, workload, illness, wpi, sss)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19)
        "#,
    )
    .bind(id)
    .bind(entry.user_id)
    .bind(entry.entry_date)
    .bind(entry.pain_score)
    .bind(entry.fatigue_score)
    .bind(entry.stress_score)
    .bind(entry.mood_score)
    .bind(entry.sleep_quality)
    .bind(entry.cognitive_difficulty)
    .bind(entry.sensory_score)
    .bind(entry.weather_score)
    .bind(entry.sleep_hours)
    .bind(entry.exercise)
    .bind(entry.exercise_type.as_deref())
    .bind(entry.exercise_duration_minutes)
    .bind(entry.workload.as_deref())
    .bind(entry.illness)
    .bind(wpi)
    .bind(sss)
    .execute(pool)
    .await
    .map_err(|e| {
        map_unique_violation(
            e,
            &format!("An entry for {} already exists", entry.entry_date),
        )
    })?;

    Ok(id)
}

pub async fn entry_for_date(
    pool: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
) -> Result<Option<DailyEntryRow>, AppError> {
    let row = sqlx::query_as("SELECT * FROM daily_entries WHERE user_id = $1 AND entry_date = $2")
        .bind(user_id)
        .bind(date)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// All entries for a user, newest first.
pub async fn entries_descending(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<DailyEntryRow>, AppError> {
    let rows =
        sqlx::query_as("SELECT * FROM daily_entries WHERE user_id = $1 ORDER BY entry_date DESC")
            .bind(user_id)
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

/// All entries for a user in date order; the aggregators and exporters
/// depend on the ascending ordering.
pub async fn entries_ascending(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<DailyEntryRow>, AppError> {
    let rows =
        sqlx::query_as("SELECT * FROM daily_entries WHERE user_id = $1 ORDER BY entry_date ASC")
            .bind(user_id)
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub async fn entries_in_range(
    pool: &PgPool,
    user_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DailyEntryRow>, AppError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM daily_entries
        WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3
        ORDER BY entry_date ASC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
