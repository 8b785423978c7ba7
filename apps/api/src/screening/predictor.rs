//! Risk-category override predictor.
//!
//! Pluggable, trait-based: `AppState` carries an `Option<Arc<dyn
//! RiskPredictor>>`, built at startup from the model registry. The override
//! is advisory: any failure (no artifact, malformed features, timeout)
//! takes the explicit fallback branch to the rule-based verdict with a
//! recorded reason code. The ML path can never abort a submission.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::ml::forest::{ForestModel, PredictError};
use crate::screening::composite::RiskCategory;

/// Upper bound on a single inference call. The fallback fires on expiry.
pub const PREDICT_TIMEOUT: Duration = Duration::from_secs(2);

/// Feature order the screening model was trained on.
pub const FEATURE_ORDER: [&str; 7] = [
    "WPI",
    "SSS",
    "pain_regions",
    "symptom_persistence",
    "secondary_score_norm",
    "risk_factor_fraction",
    "rf_total",
];

/// Module outputs and raw counts fed to the classifier.
#[derive(Debug, Clone, Copy)]
pub struct ScreeningFeatures {
    pub wpi_score: u32,
    pub sss_score: u32,
    pub secondary_score_norm: f64,
    pub risk_factor_fraction: f64,
    pub risk_factor_sum: f64,
    pub duration_4_weeks: bool,
}

impl ScreeningFeatures {
    /// Numeric encoding of the boolean duration flag the model was trained
    /// with: 6 when persistent, 1 otherwise.
    pub fn persistence_proxy(&self) -> f64 {
        if self.duration_4_weeks {
            6.0
        } else {
            1.0
        }
    }

    /// Values in `FEATURE_ORDER`. The region count appears twice because
    /// the training data carried WPI and pain_regions as separate columns.
    pub fn to_vector(&self) -> Vec<f64> {
        let vector = vec![
            f64::from(self.wpi_score),
            f64::from(self.sss_score),
            f64::from(self.wpi_score),
            self.persistence_proxy(),
            self.secondary_score_norm,
            self.risk_factor_fraction,
            self.risk_factor_sum,
        ];
        debug_assert_eq!(vector.len(), FEATURE_ORDER.len());
        vector
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RiskPrediction {
    pub category: RiskCategory,
    /// Probability mass the model assigns to "High".
    pub probability: f64,
}

#[derive(Debug, Error)]
pub enum PredictorError {
    #[error(transparent)]
    Model(#[from] PredictError),

    #[error("model label '{0}' is not a known risk category")]
    UnknownLabel(String),
}

/// The category-override trait. Implement to swap classifier backends
/// without touching the submission flow.
#[async_trait]
pub trait RiskPredictor: Send + Sync {
    async fn predict(&self, features: &ScreeningFeatures) -> Result<RiskPrediction, PredictorError>;
}

/// Default backend: the JSON forest artifact loaded by the registry.
pub struct ForestRiskPredictor {
    model: Arc<ForestModel>,
}

impl ForestRiskPredictor {
    pub fn new(model: Arc<ForestModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl RiskPredictor for ForestRiskPredictor {
    async fn predict(&self, features: &ScreeningFeatures) -> Result<RiskPrediction, PredictorError> {
        let prediction = self.model.predict(&features.to_vector())?;
        let category = RiskCategory::from_label(&prediction.label)
            .ok_or_else(|| PredictorError::UnknownLabel(prediction.label.clone()))?;

        // Report the mass on "High"; if the model never saw that class,
        // fall back to the winning class's own probability.
        let probability = prediction
            .probability_of(&self.model.classes, RiskCategory::High.as_str())
            .unwrap_or_else(|| {
                prediction
                    .probabilities
                    .iter()
                    .copied()
                    .fold(0.0, f64::max)
            });

        Ok(RiskPrediction {
            category,
            probability,
        })
    }
}

/// Why a submission scored rule-based instead of via the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    ModelAbsent,
    InferenceFailed,
    Timeout,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::ModelAbsent => "model_absent",
            FallbackReason::InferenceFailed => "inference_failed",
            FallbackReason::Timeout => "timeout",
        }
    }
}

/// Where the final category/probability came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    Model,
    Rules { fallback: FallbackReason },
}

impl ScoreSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreSource::Model => "model",
            ScoreSource::Rules { .. } => "rules",
        }
    }

    pub fn fallback_reason(&self) -> Option<&'static str> {
        match self {
            ScoreSource::Model => None,
            ScoreSource::Rules { fallback } => Some(fallback.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResolvedRisk {
    pub category: RiskCategory,
    pub probability: f64,
    pub source: ScoreSource,
}

/// Attempts the model override, falling back to the rule-based verdict on
/// any failure. The two branches are explicit and the fallback reason is
/// recorded for observability.
pub async fn resolve_risk(
    predictor: Option<&Arc<dyn RiskPredictor>>,
    features: &ScreeningFeatures,
    rule_category: RiskCategory,
    rule_score: f64,
) -> ResolvedRisk {
    let rule_based = |fallback: FallbackReason| ResolvedRisk {
        category: rule_category,
        probability: rule_score,
        source: ScoreSource::Rules { fallback },
    };

    let Some(predictor) = predictor else {
        return rule_based(FallbackReason::ModelAbsent);
    };

    match tokio::time::timeout(PREDICT_TIMEOUT, predictor.predict(features)).await {
        Ok(Ok(prediction)) => ResolvedRisk {
            category: prediction.category,
            probability: prediction.probability,
            source: ScoreSource::Model,
        },
        Ok(Err(e)) => {
            warn!("Risk prediction failed, using rule-based category: {e}");
            rule_based(FallbackReason::InferenceFailed)
        }
        Err(_) => {
            warn!(
                "Risk prediction exceeded {}s, using rule-based category",
                PREDICT_TIMEOUT.as_secs()
            );
            rule_based(FallbackReason::Timeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::forest::{DecisionTree, TreeNode};

    fn features() -> ScreeningFeatures {
        ScreeningFeatures {
            wpi_score: 7,
            sss_score: 9,
            secondary_score_norm: 0.3,
            risk_factor_fraction: 0.4286,
            risk_factor_sum: 0.75,
            duration_4_weeks: true,
        }
    }

    /// Single stump on WPI: ≥ 4 regions predicts High, otherwise Low.
    fn high_low_model() -> Arc<ForestModel> {
        Arc::new(ForestModel {
            feature_names: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
            classes: vec!["High".to_string(), "Low".to_string(), "Moderate".to_string()],
            trees: vec![DecisionTree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 0,
                        threshold: 3.5,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf { class: 1 },
                    TreeNode::Leaf { class: 0 },
                ],
            }],
        })
    }

    struct FailingPredictor;

    #[async_trait]
    impl RiskPredictor for FailingPredictor {
        async fn predict(
            &self,
            _features: &ScreeningFeatures,
        ) -> Result<RiskPrediction, PredictorError> {
            Err(PredictorError::Model(PredictError::EmptyForest))
        }
    }

    struct HangingPredictor;

    #[async_trait]
    impl RiskPredictor for HangingPredictor {
        async fn predict(
            &self,
            _features: &ScreeningFeatures,
        ) -> Result<RiskPrediction, PredictorError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!()
        }
    }

    #[test]
    fn test_persistence_proxy_encoding() {
        let mut f = features();
        assert_eq!(f.persistence_proxy(), 6.0);
        f.duration_4_weeks = false;
        assert_eq!(f.persistence_proxy(), 1.0);
    }

    #[test]
    fn test_feature_vector_order() {
        let v = features().to_vector();
        assert_eq!(v.len(), FEATURE_ORDER.len());
        assert_eq!(v[0], 7.0); // WPI
        assert_eq!(v[1], 9.0); // SSS
        assert_eq!(v[2], 7.0); // pain_regions duplicates WPI
        assert_eq!(v[3], 6.0); // persistence proxy
        assert_eq!(v[4], 0.3);
        assert_eq!(v[5], 0.4286);
        assert_eq!(v[6], 0.75);
    }

    #[tokio::test]
    async fn test_forest_predictor_overrides_category() {
        let predictor = ForestRiskPredictor::new(high_low_model());
        let prediction = predictor.predict(&features()).await.unwrap();
        assert_eq!(prediction.category, RiskCategory::High);
        assert_eq!(prediction.probability, 1.0);
    }

    #[tokio::test]
    async fn test_resolve_without_predictor_records_absent() {
        let resolved = resolve_risk(None, &features(), RiskCategory::Moderate, 0.55).await;
        assert_eq!(resolved.category, RiskCategory::Moderate);
        assert_eq!(resolved.probability, 0.55);
        assert_eq!(
            resolved.source,
            ScoreSource::Rules {
                fallback: FallbackReason::ModelAbsent
            }
        );
        assert_eq!(resolved.source.fallback_reason(), Some("model_absent"));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_on_inference_error() {
        let predictor: Arc<dyn RiskPredictor> = Arc::new(FailingPredictor);
        let resolved = resolve_risk(Some(&predictor), &features(), RiskCategory::Low, 0.1).await;
        assert_eq!(resolved.category, RiskCategory::Low);
        assert_eq!(
            resolved.source,
            ScoreSource::Rules {
                fallback: FallbackReason::InferenceFailed
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_falls_back_on_timeout() {
        let predictor: Arc<dyn RiskPredictor> = Arc::new(HangingPredictor);
        let resolved = resolve_risk(Some(&predictor), &features(), RiskCategory::Low, 0.1).await;
        assert_eq!(
            resolved.source,
            ScoreSource::Rules {
                fallback: FallbackReason::Timeout
            }
        );
    }

    #[tokio::test]
    async fn test_resolve_uses_model_verdict() {
        let predictor: Arc<dyn RiskPredictor> =
            Arc::new(ForestRiskPredictor::new(high_low_model()));
        let resolved = resolve_risk(Some(&predictor), &features(), RiskCategory::Low, 0.1).await;
        assert_eq!(resolved.category, RiskCategory::High);
        assert_eq!(resolved.source, ScoreSource::Model);
        assert_eq!(resolved.source.fallback_reason(), None);
    }
}
