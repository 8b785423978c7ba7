//! Export row projection.
//!
//! The spreadsheet/PDF collaborators render from flattened per-day rows:
//! entry date, the pain/stress/mood scores and the SSS sub-map expanded
//! into its fatigue/cognitive/sleep/somatic keys. Values absent in storage
//! are rendered as 0 in this projection only; storage keeps its NULLs.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::models::entry::DailyEntryRow;

pub const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub entry_date: NaiveDate,
    pub pain: i64,
    pub fatigue: i64,
    pub cognitive: i64,
    pub sleep: i64,
    pub somatic: i64,
    pub stress: i64,
    pub mood: i64,
}

pub fn project_rows(entries: &[DailyEntryRow]) -> Vec<ExportRow> {
    entries.iter().map(project_row).collect()
}

/// The 1-based `week_number` slice of the user's date-ordered entries.
/// `None` when the slice starts past the end of the series.
pub fn week_slice(entries: &[DailyEntryRow], week_number: usize) -> Option<&[DailyEntryRow]> {
    if week_number == 0 {
        return None;
    }
    let start = (week_number - 1) * DAYS_PER_WEEK;
    if start >= entries.len() {
        return None;
    }
    let end = (start + DAYS_PER_WEEK).min(entries.len());
    Some(&entries[start..end])
}

fn project_row(entry: &DailyEntryRow) -> ExportRow {
    ExportRow {
        entry_date: entry.entry_date,
        pain: i64::from(entry.pain_score.unwrap_or(0)),
        fatigue: sss_value(entry.sss.as_ref(), "fatigue"),
        cognitive: sss_value(entry.sss.as_ref(), "cognitive"),
        sleep: sss_value(entry.sss.as_ref(), "sleep"),
        somatic: sss_value(entry.sss.as_ref(), "somatic"),
        stress: i64::from(entry.stress_score.unwrap_or(0)),
        mood: i64::from(entry.mood_score.unwrap_or(0)),
    }
}

fn sss_value(sss: Option<&Value>, key: &str) -> i64 {
    sss.and_then(|v| v.get(key))
        .and_then(Value::as_i64)
        .unwrap_or(0)
}
