use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::report::WeeklySummaryRow;
use crate::reports::export::{project_rows, week_slice, ExportRow};
use crate::reports::final_report::{build_final_report, FinalReport};
use crate::reports::store;
use crate::reports::weekly::{build_weekly_summary, week_bounds, WeeklySummary};
use crate::state::AppState;
use crate::tracking;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// Week selector: any date inside the week, or its Monday directly.
#[derive(Deserialize)]
pub struct WeeklyQuery {
    pub user_id: Uuid,
    pub date: Option<NaiveDate>,
    pub week_start: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct WeeklyExportQuery {
    pub user_id: Uuid,
    pub week_number: usize,
}

#[derive(Serialize)]
pub struct WeeklySummaryListResponse {
    pub weekly_summaries: Vec<WeeklySummaryRow>,
}

#[derive(Serialize)]
pub struct ExportResponse {
    pub rows: Vec<ExportRow>,
}

/// GET /api/v1/reports/weekly?user_id=…&date=YYYY-MM-DD
///
/// Recomputes the week from its daily entries and appends a fresh summary
/// row; no update-in-place.
pub async fn handle_weekly_summary(
    State(state): State<AppState>,
    Query(params): Query<WeeklyQuery>,
) -> Result<Json<WeeklySummary>, AppError> {
    let week_start = match (params.date, params.week_start) {
        (Some(date), _) => week_bounds(date).0,
        (None, Some(week_start)) => week_bounds(week_start).0,
        (None, None) => {
            return Err(AppError::Validation(
                "Provide date or week_start parameter as YYYY-MM-DD".to_string(),
            ))
        }
    };
    let week_end = week_bounds(week_start).1;

    let entries =
        tracking::store::entries_in_range(&state.db, params.user_id, week_start, week_end).await?;
    if entries.is_empty() {
        return Err(AppError::InsufficientData(format!(
            "No entries recorded between {week_start} and {week_end}"
        )));
    }

    let summary = build_weekly_summary(week_start, &entries);
    store::insert_weekly_summary(&state.db, params.user_id, &summary).await?;
    info!(
        "Weekly summary appended for week {} ({} entries, acr={})",
        summary.week_number,
        entries.len(),
        summary.acr_status
    );

    Ok(Json(summary))
}

/// GET /api/v1/reports/weekly/all?user_id=…
pub async fn handle_list_weekly_summaries(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<WeeklySummaryListResponse>, AppError> {
    let weekly_summaries = store::weekly_summaries_descending(&state.db, params.user_id).await?;
    Ok(Json(WeeklySummaryListResponse { weekly_summaries }))
}

/// GET /api/v1/reports/final?user_id=…
///
/// Requires twelve weekly summaries; replaces the stored report on every
/// successful recompute.
pub async fn handle_final_report(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<FinalReport>, AppError> {
    let weeks = store::weekly_summaries_ascending(&state.db, params.user_id).await?;
    let report = build_final_report(&weeks)?;

    let report_json = serde_json::to_value(&report).map_err(anyhow::Error::from)?;
    store::upsert_final_report(&state.db, params.user_id, &report_json).await?;
    info!(
        "Final report generated over {} weeks (acr_overall={})",
        report.weekly_data.len(),
        report.acr_overall
    );

    Ok(Json(report))
}

/// GET /api/v1/reports/export/weekly?user_id=…&week_number=N
pub async fn handle_export_weekly(
    State(state): State<AppState>,
    Query(params): Query<WeeklyExportQuery>,
) -> Result<Json<ExportResponse>, AppError> {
    let entries = tracking::store::entries_ascending(&state.db, params.user_id).await?;
    if entries.is_empty() {
        return Err(AppError::NotFound("No entries to export".to_string()));
    }
    let slice = week_slice(&entries, params.week_number).ok_or_else(|| {
        AppError::Validation(format!("week_number {} is out of range", params.week_number))
    })?;
    Ok(Json(ExportResponse {
        rows: project_rows(slice),
    }))
}

/// GET /api/v1/reports/export/final?user_id=…
pub async fn handle_export_final(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ExportResponse>, AppError> {
    let entries = tracking::store::entries_ascending(&state.db, params.user_id).await?;
    if entries.is_empty() {
        return Err(AppError::NotFound("No entries to export".to_string()));
    }
    Ok(Json(ExportResponse {
        rows: project_rows(&entries),
    }))
}
