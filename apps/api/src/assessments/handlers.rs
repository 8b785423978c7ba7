use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::assessments::scoring::{
    gad7_severity_band, phq9_severity_band, resolve_severity, total_score, validate_scale,
    ScaleAnswers, GAD7_ITEMS, PHQ9_ITEMS,
};
use crate::assessments::store::{self, AssessmentRecord};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssessmentSubmission {
    pub user_id: Uuid,
    /// Defaults to today when absent.
    pub entry_date: Option<NaiveDate>,
    pub phq9: ScaleAnswers,
    pub gad7: ScaleAnswers,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub id: Uuid,
    pub entry_date: NaiveDate,
    pub phq9_score: i32,
    pub phq9_severity: String,
    pub gad7_score: i32,
    pub gad7_severity: String,
}

/// POST /api/v1/assessments
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    Json(submission): Json<AssessmentSubmission>,
) -> Result<(StatusCode, Json<AssessmentResponse>), AppError> {
    validate_scale("phq9", &submission.phq9, PHQ9_ITEMS)?;
    validate_scale("gad7", &submission.gad7, GAD7_ITEMS)?;

    let entry_date = submission
        .entry_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let phq9_score = total_score(&submission.phq9);
    let gad7_score = total_score(&submission.gad7);

    let phq9_verdict = resolve_severity(
        state.models.phq9.as_ref(),
        &submission.phq9,
        PHQ9_ITEMS,
        phq9_severity_band(phq9_score),
    );
    let gad7_verdict = resolve_severity(
        state.models.gad7.as_ref(),
        &submission.gad7,
        GAD7_ITEMS,
        gad7_severity_band(gad7_score),
    );

    let phq9_answers = serde_json::to_value(&submission.phq9).map_err(anyhow::Error::from)?;
    let gad7_answers = serde_json::to_value(&submission.gad7).map_err(anyhow::Error::from)?;

    let record = AssessmentRecord {
        user_id: submission.user_id,
        entry_date,
        phq9_score,
        gad7_score,
        phq9_answers: &phq9_answers,
        gad7_answers: &gad7_answers,
        phq9_severity: phq9_verdict.from_model.then_some(phq9_verdict.severity.as_str()),
        phq9_confidence: phq9_verdict.confidence,
        gad7_severity: gad7_verdict.from_model.then_some(gad7_verdict.severity.as_str()),
        gad7_confidence: gad7_verdict.confidence,
    };
    let id = store::insert_assessment(&state.db, &record).await?;

    info!(
        "Monthly assessment {id} saved: phq9={phq9_score} ({}), gad7={gad7_score} ({})",
        phq9_verdict.severity, gad7_verdict.severity
    );

    Ok((
        StatusCode::CREATED,
        Json(AssessmentResponse {
            id,
            entry_date,
            phq9_score,
            phq9_severity: phq9_verdict.severity,
            gad7_score,
            gad7_severity: gad7_verdict.severity,
        }),
    ))
}
