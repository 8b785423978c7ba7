use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::entry::DailyEntryRow;
use crate::state::AppState;
use crate::tracking::store;
use crate::tracking::validate::{validate_daily_entry, DailyEntrySubmission};

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct EntryQuery {
    pub user_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Serialize)]
pub struct CreateEntryResponse {
    pub id: Uuid,
    pub entry_date: NaiveDate,
}

#[derive(Serialize)]
pub struct EntryListResponse {
    pub entries: Vec<DailyEntryRow>,
}

/// POST /api/v1/entries
pub async fn handle_create_entry(
    State(state): State<AppState>,
    Json(submission): Json<DailyEntrySubmission>,
) -> Result<(StatusCode, Json<CreateEntryResponse>), AppError> {
    let entry = validate_daily_entry(&submission)?;
    let id = store::insert_entry(&state.db, &entry).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateEntryResponse {
            id,
            entry_date: entry.entry_date,
        }),
    ))
}

/// GET /api/v1/entries?user_id=…&date=YYYY-MM-DD
pub async fn handle_get_entry(
    State(state): State<AppState>,
    Query(params): Query<EntryQuery>,
) -> Result<Json<DailyEntryRow>, AppError> {
    store::entry_for_date(&state.db, params.user_id, params.date)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No entry for {}", params.date)))
}

/// GET /api/v1/entries/all?user_id=…
pub async fn handle_list_entries(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<EntryListResponse>, AppError> {
    let entries = store::entries_descending(&state.db, params.user_id).await?;
    Ok(Json(EntryListResponse { entries }))
}
