//! Final report: the multi-week rollup.
//!
//! Requires at least twelve persisted weekly summaries. Emits the full
//! weekly series, start-vs-end trend deltas for the five tracked metrics,
//! and an overall ACR flag that is true when any week met the criteria.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::report::WeeklySummaryRow;

pub const MIN_WEEKS_FOR_FINAL: usize = 12;

/// Metrics trended first-week vs last-week.
pub const TREND_METRICS: [&str; 5] = [
    "avg_pain",
    "avg_fatigue",
    "avg_stress",
    "avg_mood",
    "avg_sleep",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub start: Option<f64>,
    pub end: Option<f64>,
    /// end − start; absent when either endpoint is missing.
    pub delta: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportWeek {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub week_number: i32,
    pub averages: Value,
    pub acr_status: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    pub weekly_data: Vec<ReportWeek>,
    pub trend: BTreeMap<String, TrendPoint>,
    pub acr_overall: bool,
}

/// Builds the final report from the weekly series (ordered by week_start).
pub fn build_final_report(weeks: &[WeeklySummaryRow]) -> Result<FinalReport, AppError> {
    if weeks.len() < MIN_WEEKS_FOR_FINAL {
        return Err(AppError::InsufficientData(format!(
            "Final report requires {MIN_WEEKS_FOR_FINAL} weekly summaries, found {}",
            weeks.len()
        )));
    }

    let weekly_data: Vec<ReportWeek> = weeks
        .iter()
        .map(|w| ReportWeek {
            week_start: w.week_start,
            week_end: w.week_end,
            week_number: w.week_number,
            averages: w.averages.clone(),
            acr_status: w.acr_status,
        })
        .collect();

    let first = &weeks[0].averages;
    let last = &weeks[weeks.len() - 1].averages;
    let mut trend = BTreeMap::new();
    for metric in TREND_METRICS {
        let start = metric_value(first, metric);
        let end = metric_value(last, metric);
        let delta = match (start, end) {
            (Some(s), Some(e)) => Some(round2(e - s)),
            _ => None,
        };
        trend.insert(metric.to_string(), TrendPoint { start, end, delta });
    }

    let acr_overall = weeks.iter().any(|w| w.acr_status);

    Ok(FinalReport {
        weekly_data,
        trend,
        acr_overall,
    })
}

fn metric_value(averages: &Value, metric: &str) -> Option<f64> {
    averages.get(metric).and_then(Value::as_f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, Utc};
    use serde_json::json;
    use uuid::Uuid;

    fn make_week(index: u64, avg_pain: Option<f64>, acr: bool) -> WeeklySummaryRow {
        let week_start = "2026-01-05".parse::<NaiveDate>().unwrap() + Days::new(index * 7);
        let averages = match avg_pain {
            Some(p) => json!({
                "avg_pain": p,
                "avg_fatigue": 4.0,
                "avg_stress": 5.0,
                "avg_mood": 6.0,
                "avg_sleep": 7.0,
                "avg_wpi_count": 2.0,
                "avg_sss_total": 3.0
            }),
            None => json!({
                "avg_fatigue": 4.0,
                "avg_stress": 5.0,
                "avg_mood": 6.0,
                "avg_sleep": 7.0
            }),
        };
        WeeklySummaryRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            week_start,
            week_end: week_start + Days::new(6),
            week_number: (index + 2) as i32,
            averages,
            acr_status: acr,
            created_at: Utc::now(),
        }
    }

    fn make_series(count: u64) -> Vec<WeeklySummaryRow> {
        (0..count)
            .map(|i| make_week(i, Some(6.0 - i as f64 * 0.25), false))
            .collect()
    }

    #[test]
    fn test_eleven_weeks_insufficient() {
        let err = build_final_report(&make_series(11)).unwrap_err();
        assert!(matches!(err, AppError::InsufficientData(_)));
    }

    #[test]
    fn test_twelve_weeks_produces_report() {
        let report = build_final_report(&make_series(12)).unwrap();
        assert_eq!(report.weekly_data.len(), 12);
        assert_eq!(report.trend.len(), TREND_METRICS.len());
        for metric in TREND_METRICS {
            assert!(report.trend[metric].delta.is_some(), "no delta for {metric}");
        }
    }

    #[test]
    fn test_trend_delta_is_last_minus_first() {
        let report = build_final_report(&make_series(12)).unwrap();
        let pain = &report.trend["avg_pain"];
        assert_eq!(pain.start, Some(6.0));
        assert_eq!(pain.end, Some(3.25));
        assert_eq!(pain.delta, Some(-2.75));
    }

    #[test]
    fn test_missing_metric_yields_no_delta() {
        let mut weeks = make_series(12);
        weeks[0] = make_week(0, None, false);
        let report = build_final_report(&weeks).unwrap();
        let pain = &report.trend["avg_pain"];
        assert_eq!(pain.start, None);
        assert_eq!(pain.delta, None);
        // the other metrics still trend
        assert!(report.trend["avg_stress"].delta.is_some());
    }

    #[test]
    fn test_acr_overall_true_when_any_week_positive() {
        let mut weeks = make_series(12);
        assert!(!build_final_report(&weeks).unwrap().acr_overall);
        weeks[4].acr_status = true;
        assert!(build_final_report(&weeks).unwrap().acr_overall);
    }
}
