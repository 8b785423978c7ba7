use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::screening::ScreeningRow;
use crate::profile;
use crate::screening::composite::{
    acr_criteria_met, categorize, composite_score, is_eligible, RiskCategory,
};
use crate::screening::normalize::{normalize_screening, ScreeningSubmission};
use crate::screening::predictor::{resolve_risk, ScreeningFeatures};
use crate::screening::primary::evaluate_primary;
use crate::screening::risk::aggregate_risk_factors;
use crate::screening::secondary::{recognized_count, secondary_score_norm};
use crate::screening::store::{self, ScreeningOutcome};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// The eligibility verdict returned to the client.
#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub risk_level: RiskCategory,
    pub risk_probability: f64,
    pub is_eligible: bool,
    pub wpi_score: u32,
    pub sss_score: u32,
}

/// POST /api/v1/screenings
///
/// Normalize → module scores → composite/category → optional model
/// override → one transactional write of the summary, audit and verdict
/// rows.
pub async fn handle_submit_screening(
    State(state): State<AppState>,
    Json(submission): Json<ScreeningSubmission>,
) -> Result<Json<ScreeningResponse>, AppError> {
    let normalized = normalize_screening(&submission)?;

    // The payload may carry sex directly; otherwise use the stored profile.
    let sex = match normalized.user_sex {
        Some(s) => Some(s),
        None => profile::stored_sex(&state.db, submission.user_id).await?,
    };

    let primary = evaluate_primary(
        normalized.wpi_score(),
        normalized.sss_score(),
        normalized.duration_4_weeks,
    );
    let secondary_count = recognized_count(&normalized.secondary_symptoms);
    let secondary_norm = secondary_score_norm(&normalized.secondary_symptoms);
    let risk = aggregate_risk_factors(&normalized.risk_factors, sex);

    let composite = composite_score(primary.score(), secondary_norm, risk.fraction, &state.weights);
    let rule_category = categorize(composite, &state.thresholds);

    let features = ScreeningFeatures {
        wpi_score: normalized.wpi_score(),
        sss_score: normalized.sss_score(),
        secondary_score_norm: secondary_norm,
        risk_factor_fraction: risk.fraction,
        risk_factor_sum: risk.risk_sum,
        duration_4_weeks: normalized.duration_4_weeks,
    };
    let resolved = resolve_risk(
        state.risk_predictor.as_ref(),
        &features,
        rule_category,
        composite,
    )
    .await;

    let acr_met = acr_criteria_met(normalized.wpi_score(), normalized.sss_score());
    let eligible = is_eligible(resolved.category);

    let outcome = ScreeningOutcome {
        user_id: submission.user_id,
        normalized: &normalized,
        primary,
        secondary_count,
        secondary_norm,
        risk,
        composite,
        resolved,
        acr_met,
        eligible,
    };
    let screening_id = store::insert_screening(&state.db, &outcome).await?;

    info!(
        "Screening {screening_id} saved: category={} source={} composite={:.3} acr={}",
        resolved.category.as_str(),
        resolved.source.as_str(),
        composite,
        acr_met
    );

    Ok(Json(ScreeningResponse {
        risk_level: resolved.category,
        risk_probability: resolved.probability,
        is_eligible: eligible,
        wpi_score: normalized.wpi_score(),
        sss_score: normalized.sss_score(),
    }))
}

/// GET /api/v1/screenings/latest
pub async fn handle_latest_screening(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ScreeningRow>, AppError> {
    store::latest_screening(&state.db, params.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No screening on record".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::Sex;
    use crate::screening::composite::{RiskThresholds, ScoringWeights};
    use crate::screening::normalize::{RiskFactorFlags, SssAnswers, SssSomatic};

    /// Full pipeline on the acceptance scenario: 7 regions, SSS 9,
    /// persistent symptoms, 3 secondary items, 2 risk factors + Female.
    #[tokio::test]
    async fn test_submission_pipeline_end_to_end() {
        let submission = ScreeningSubmission {
            user_id: Uuid::new_v4(),
            first_answers: Default::default(),
            wpi_regions: vec![
                "neck", "chest", "upper_back", "lower_back", "hip_left", "hip_right", "jaw_left",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            sss_answers: SssAnswers {
                fatigue: Some(3),
                sleep: Some(2),
                cognitive: Some(2),
            },
            sss_somatic: SssSomatic {
                headache: Some(1),
                abdomen_pain: Some(1),
                depression: Some(0),
            },
            secondary_symptoms: vec!["headache", "ibs", "morning_stiffness"]
                .into_iter()
                .map(String::from)
                .collect(),
            risk_factors: RiskFactorFlags {
                family_history: true,
                anxiety_depression: true,
                ..Default::default()
            },
            duration_4_weeks: true,
            user_sex: Some(Sex::Female),
        };

        let normalized = normalize_screening(&submission).unwrap();
        assert_eq!(normalized.wpi_score(), 7);
        assert_eq!(normalized.sss_part_a(), 7);
        assert_eq!(normalized.sss_part_b(), 2);
        assert_eq!(normalized.sss_score(), 9);

        let primary = evaluate_primary(
            normalized.wpi_score(),
            normalized.sss_score(),
            normalized.duration_4_weeks,
        );
        assert!(primary.rule_early_severity);
        assert!(primary.rule_pain_spread);
        assert_eq!(primary.score(), 1.0);

        let secondary_norm = secondary_score_norm(&normalized.secondary_symptoms);
        assert!((secondary_norm - 0.3).abs() < 1e-12);

        let risk = aggregate_risk_factors(&normalized.risk_factors, normalized.user_sex);
        assert_eq!(risk.risk_sum, 0.75);
        assert!((risk.fraction - 0.428_571).abs() < 1e-4);

        let weights = ScoringWeights::default();
        let thresholds = RiskThresholds::default();
        let composite = composite_score(primary.score(), secondary_norm, risk.fraction, &weights);
        assert!((composite - 0.732_857).abs() < 1e-4, "composite {composite}");

        let rule_category = categorize(composite, &thresholds);
        assert_eq!(rule_category, RiskCategory::High);

        // No model loaded: the verdict stays rule-based.
        let features = ScreeningFeatures {
            wpi_score: normalized.wpi_score(),
            sss_score: normalized.sss_score(),
            secondary_score_norm: secondary_norm,
            risk_factor_fraction: risk.fraction,
            risk_factor_sum: risk.risk_sum,
            duration_4_weeks: normalized.duration_4_weeks,
        };
        let resolved = resolve_risk(None, &features, rule_category, composite).await;
        assert_eq!(resolved.category, RiskCategory::High);

        assert!(acr_criteria_met(normalized.wpi_score(), normalized.sss_score()));
        assert!(is_eligible(resolved.category));
    }
}
