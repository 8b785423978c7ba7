//! PHQ-9 / GAD-7 assessment scoring.
//!
//! Totals are the plain item sums. Severity labels come from the trained
//! per-scale classifier when one is loaded (its features are the item
//! answers plus the average and maximum per-item response latency) and
//! otherwise from the published raw-score bands.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::ml::forest::ForestModel;

pub const PHQ9_ITEMS: usize = 9;
pub const GAD7_ITEMS: usize = 7;

/// One scale's submitted answers (0–3 each) with optional per-item
/// response latencies in milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScaleAnswers {
    pub answers: Vec<i64>,
    #[serde(default)]
    pub response_times_ms: Vec<f64>,
}

pub fn validate_scale(name: &str, scale: &ScaleAnswers, items: usize) -> Result<(), AppError> {
    if scale.answers.len() != items {
        return Err(AppError::Validation(format!(
            "{name} requires {items} answers, got {}",
            scale.answers.len()
        )));
    }
    for (i, answer) in scale.answers.iter().enumerate() {
        if !(0..=3).contains(answer) {
            return Err(AppError::Validation(format!(
                "{name} answer {} must be between 0 and 3, got {answer}",
                i + 1
            )));
        }
    }
    if !scale.response_times_ms.is_empty() && scale.response_times_ms.len() != items {
        return Err(AppError::Validation(format!(
            "{name} requires {items} response times when provided, got {}",
            scale.response_times_ms.len()
        )));
    }
    Ok(())
}

pub fn total_score(scale: &ScaleAnswers) -> i32 {
    scale.answers.iter().sum::<i64>() as i32
}

/// PHQ-9 raw-score bands.
pub fn phq9_severity_band(total: i32) -> &'static str {
    match total {
        i32::MIN..=4 => "Minimal",
        5..=9 => "Mild",
        10..=14 => "Moderate",
        15..=19 => "Moderately Severe",
        _ => "Severe",
    }
}

/// GAD-7 raw-score bands.
pub fn gad7_severity_band(total: i32) -> &'static str {
    match total {
        i32::MIN..=4 => "Minimal anxiety",
        5..=9 => "Mild anxiety",
        10..=14 => "Moderate anxiety",
        _ => "Moderate to severe anxiety",
    }
}

/// Classifier features: the item answers followed by the average and
/// maximum response latency. Missing latencies count as zero.
pub fn latency_features(scale: &ScaleAnswers, items: usize) -> Vec<f64> {
    let times: Vec<f64> = if scale.response_times_ms.is_empty() {
        vec![0.0; items]
    } else {
        scale.response_times_ms.clone()
    };
    let avg = times.iter().sum::<f64>() / times.len() as f64;
    let max = times.iter().copied().fold(0.0, f64::max);

    let mut features: Vec<f64> = scale.answers.iter().map(|a| *a as f64).collect();
    features.push(avg);
    features.push(max);
    features
}

#[derive(Debug, Clone)]
pub struct SeverityVerdict {
    pub severity: String,
    /// Winning-class probability when a model produced the label.
    pub confidence: Option<f64>,
    pub from_model: bool,
}

/// Attempts the model, falling back to the raw-score band on any failure.
pub fn resolve_severity(
    model: Option<&Arc<ForestModel>>,
    scale: &ScaleAnswers,
    items: usize,
    band_label: &str,
) -> SeverityVerdict {
    if let Some(model) = model {
        match model.predict(&latency_features(scale, items)) {
            Ok(prediction) => {
                let confidence = prediction
                    .probabilities
                    .iter()
                    .copied()
                    .fold(0.0, f64::max);
                return SeverityVerdict {
                    severity: prediction.label,
                    confidence: Some(confidence),
                    from_model: true,
                };
            }
            Err(e) => {
                warn!("Severity prediction failed, using raw-score band: {e}");
            }
        }
    }
    SeverityVerdict {
        severity: band_label.to_string(),
        confidence: None,
        from_model: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::forest::{DecisionTree, TreeNode};

    fn phq9(answers: [i64; 9]) -> ScaleAnswers {
        ScaleAnswers {
            answers: answers.to_vec(),
            response_times_ms: vec![],
        }
    }

    #[test]
    fn test_total_score_is_item_sum() {
        assert_eq!(total_score(&phq9([1, 2, 0, 3, 1, 0, 2, 1, 0])), 10);
    }

    #[test]
    fn test_wrong_item_count_rejected() {
        let scale = ScaleAnswers {
            answers: vec![1, 2, 3],
            response_times_ms: vec![],
        };
        assert!(validate_scale("phq9", &scale, PHQ9_ITEMS).is_err());
    }

    #[test]
    fn test_answer_out_of_range_rejected() {
        let scale = phq9([1, 2, 0, 4, 1, 0, 2, 1, 0]);
        let err = validate_scale("phq9", &scale, PHQ9_ITEMS).unwrap_err();
        assert!(err.to_string().contains("answer 4"));
    }

    #[test]
    fn test_partial_response_times_rejected() {
        let mut scale = phq9([0; 9]);
        scale.response_times_ms = vec![500.0, 800.0];
        assert!(validate_scale("phq9", &scale, PHQ9_ITEMS).is_err());
    }

    #[test]
    fn test_phq9_band_edges() {
        assert_eq!(phq9_severity_band(0), "Minimal");
        assert_eq!(phq9_severity_band(4), "Minimal");
        assert_eq!(phq9_severity_band(5), "Mild");
        assert_eq!(phq9_severity_band(10), "Moderate");
        assert_eq!(phq9_severity_band(14), "Moderate");
        assert_eq!(phq9_severity_band(15), "Moderately Severe");
        assert_eq!(phq9_severity_band(20), "Severe");
        assert_eq!(phq9_severity_band(27), "Severe");
    }

    #[test]
    fn test_gad7_band_edges() {
        assert_eq!(gad7_severity_band(4), "Minimal anxiety");
        assert_eq!(gad7_severity_band(5), "Mild anxiety");
        assert_eq!(gad7_severity_band(10), "Moderate anxiety");
        assert_eq!(gad7_severity_band(15), "Moderate to severe anxiety");
        assert_eq!(gad7_severity_band(21), "Moderate to severe anxiety");
    }

    #[test]
    fn test_latency_features_append_avg_and_max() {
        let scale = ScaleAnswers {
            answers: vec![1, 2, 3, 0, 1, 2, 3],
            response_times_ms: vec![400.0, 600.0, 500.0, 700.0, 300.0, 500.0, 1500.0],
        };
        let features = latency_features(&scale, GAD7_ITEMS);
        assert_eq!(features.len(), GAD7_ITEMS + 2);
        assert!((features[7] - 642.857).abs() < 1e-2); // avg
        assert_eq!(features[8], 1500.0); // max
    }

    #[test]
    fn test_missing_latencies_default_to_zero() {
        let features = latency_features(&phq9([0; 9]), PHQ9_ITEMS);
        assert_eq!(features[9], 0.0);
        assert_eq!(features[10], 0.0);
    }

    #[test]
    fn test_resolve_severity_without_model_uses_band() {
        let verdict = resolve_severity(None, &phq9([1; 9]), PHQ9_ITEMS, phq9_severity_band(9));
        assert_eq!(verdict.severity, "Mild");
        assert!(!verdict.from_model);
        assert_eq!(verdict.confidence, None);
    }

    #[test]
    fn test_resolve_severity_with_model_overrides_band() {
        // Stump on the first answer: > 0 predicts Severe.
        let model = Arc::new(ForestModel {
            feature_names: (0..11).map(|i| format!("f{i}")).collect(),
            classes: vec!["Minimal".to_string(), "Severe".to_string()],
            trees: vec![DecisionTree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 0,
                        threshold: 0.5,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf { class: 0 },
                    TreeNode::Leaf { class: 1 },
                ],
            }],
        });
        let verdict =
            resolve_severity(Some(&model), &phq9([3; 9]), PHQ9_ITEMS, phq9_severity_band(27));
        assert_eq!(verdict.severity, "Severe");
        assert!(verdict.from_model);
        assert_eq!(verdict.confidence, Some(1.0));
    }

    #[test]
    fn test_resolve_severity_falls_back_on_shape_mismatch() {
        // Model trained on the wrong feature count: prediction fails,
        // band label wins.
        let model = Arc::new(ForestModel {
            feature_names: vec!["only".to_string()],
            classes: vec!["Minimal".to_string()],
            trees: vec![DecisionTree {
                nodes: vec![TreeNode::Leaf { class: 0 }],
            }],
        });
        let verdict =
            resolve_severity(Some(&model), &phq9([2; 9]), PHQ9_ITEMS, phq9_severity_band(18));
        assert_eq!(verdict.severity, "Moderately Severe");
        assert!(!verdict.from_model);
    }
}
