#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One computed week. Recomputed and appended on every request; rows are
/// never updated in place, so the series doubles as a recomputation log.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeeklySummaryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub week_number: i32,
    pub averages: Value,
    pub acr_status: bool,
    pub created_at: DateTime<Utc>,
}

/// One final report per user, replaced on each recompute.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FinalReportRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub report: Value,
    pub generated_at: DateTime<Utc>,
}
