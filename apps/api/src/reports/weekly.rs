//! Weekly rollup.
//!
//! Aggregates the daily entries of one Monday-start week into per-metric
//! means. Entries missing a field are excluded from that field's mean,
//! never counted as zero. The ACR status is evaluated on the *averaged*
//! WPI count and SSS total, truncating the mean region count to an
//! integer; a pointwise diagnostic rule applied to continuous means (see
//! DESIGN.md).

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::entry::DailyEntryRow;

/// Monday-start 7-day window containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Days::new(u64::from(date.weekday().num_days_from_monday()));
    (start, start + Days::new(6))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAverages {
    pub avg_pain: Option<f64>,
    pub avg_fatigue: Option<f64>,
    pub avg_stress: Option<f64>,
    pub avg_mood: Option<f64>,
    pub avg_sleep: Option<f64>,
    pub avg_wpi_count: f64,
    pub avg_sss_total: f64,
}

/// One computed week as returned to the caller (and appended to storage).
#[derive(Debug, Clone, Serialize)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub week_number: i32,
    pub averages: WeeklyAverages,
    pub acr_status: bool,
}

pub fn aggregate_week(entries: &[DailyEntryRow]) -> WeeklyAverages {
    let wpi_counts: Vec<f64> = entries
        .iter()
        .filter_map(|e| e.wpi.as_ref())
        .filter_map(Value::as_array)
        .map(|regions| regions.len() as f64)
        .collect();
    let sss_totals: Vec<f64> = entries
        .iter()
        .filter_map(|e| e.sss.as_ref())
        .filter_map(sss_total)
        .collect();

    WeeklyAverages {
        avg_pain: mean_of(entries, |e| e.pain_score),
        avg_fatigue: mean_of(entries, |e| e.fatigue_score),
        avg_stress: mean_of(entries, |e| e.stress_score),
        avg_mood: mean_of(entries, |e| e.mood_score),
        avg_sleep: mean_of(entries, |e| e.sleep_quality),
        avg_wpi_count: mean(&wpi_counts).map(round2).unwrap_or(0.0),
        avg_sss_total: mean(&sss_totals).map(round2).unwrap_or(0.0),
    }
}

pub fn build_weekly_summary(week_start: NaiveDate, entries: &[DailyEntryRow]) -> WeeklySummary {
    let averages = aggregate_week(entries);
    let acr_status = acr_on_averages(averages.avg_wpi_count, averages.avg_sss_total);
    WeeklySummary {
        week_start,
        week_end: week_start + Days::new(6),
        week_number: week_start.iso_week().week() as i32,
        averages,
        acr_status,
    }
}

/// ACR rule on averaged inputs: the mean region count is truncated to an
/// integer (mirroring the pointwise integer count), the mean SSS compared
/// as a float.
pub fn acr_on_averages(avg_wpi_count: f64, avg_sss_total: f64) -> bool {
    let wpi = avg_wpi_count.trunc() as i64;
    (wpi >= 7 && avg_sss_total >= 5.0) || ((3..=6).contains(&wpi) && avg_sss_total >= 9.0)
}

/// Sum of the numeric subscale values present in a stored SSS map.
fn sss_total(sss: &Value) -> Option<f64> {
    sss.as_object()
        .map(|map| map.values().filter_map(Value::as_f64).sum())
}

fn mean_of(entries: &[DailyEntryRow], field: impl Fn(&DailyEntryRow) -> Option<i32>) -> Option<f64> {
    let values: Vec<f64> = entries.iter().filter_map(&field).map(f64::from).collect();
    mean(&values).map(round2)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
