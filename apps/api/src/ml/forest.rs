//! Decision-tree ensemble classifier deserialized from a JSON artifact.
//!
//! The artifact carries the trained feature order, the class-label list
//! (which doubles as the label encoder), and one flat node array per tree.
//! Prediction is a majority vote across trees; the reported probability
//! vector is the per-class vote fraction.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("feature vector has {got} values, model expects {expected}")]
    ShapeMismatch { got: usize, expected: usize },

    #[error("model has no trees")]
    EmptyForest,

    #[error("malformed tree: node index {0} out of range")]
    NodeOutOfRange(usize),

    #[error("malformed tree: split references feature index {0}")]
    FeatureOutOfRange(usize),

    #[error("malformed tree: leaf references class index {0}")]
    ClassOutOfRange(usize),
}

/// One node in a flattened decision tree. `left`/`right` are indices into
/// the owning tree's node array.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class: usize,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walks the tree from the root (node 0) to a leaf. The step limit of
    /// `nodes.len()` turns any cycle in a corrupt artifact into an error
    /// instead of an infinite loop.
    fn eval(&self, features: &[f64]) -> Result<usize, PredictError> {
        let mut idx = 0usize;
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(idx).ok_or(PredictError::NodeOutOfRange(idx))? {
                TreeNode::Leaf { class } => return Ok(*class),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features
                        .get(*feature)
                        .ok_or(PredictError::FeatureOutOfRange(*feature))?;
                    idx = if *value <= *threshold { *left } else { *right };
                }
            }
        }
        Err(PredictError::NodeOutOfRange(idx))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForestModel {
    /// Feature order the model was trained on. Callers must supply values
    /// in exactly this order.
    pub feature_names: Vec<String>,
    /// Human-readable class labels, indexed by the leaf `class` field.
    pub classes: Vec<String>,
    pub trees: Vec<DecisionTree>,
}

/// A single classification result: the winning label plus the per-class
/// probability vector (parallel to `ForestModel::classes`).
#[derive(Debug, Clone)]
pub struct Prediction {
    pub class_index: usize,
    pub label: String,
    pub probabilities: Vec<f64>,
}

impl Prediction {
    /// Probability mass assigned to a named class, if the model knows it.
    pub fn probability_of(&self, classes: &[String], label: &str) -> Option<f64> {
        classes
            .iter()
            .position(|c| c == label)
            .map(|i| self.probabilities[i])
    }
}

impl ForestModel {
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn predict(&self, features: &[f64]) -> Result<Prediction, PredictError> {
        if self.trees.is_empty() {
            return Err(PredictError::EmptyForest);
        }
        if features.len() != self.feature_names.len() {
            return Err(PredictError::ShapeMismatch {
                got: features.len(),
                expected: self.feature_names.len(),
            });
        }

        let mut votes = vec![0usize; self.classes.len()];
        for tree in &self.trees {
            let class = tree.eval(features)?;
            if class >= votes.len() {
                return Err(PredictError::ClassOutOfRange(class));
            }
            votes[class] += 1;
        }

        let total = self.trees.len() as f64;
        let probabilities: Vec<f64> = votes.iter().map(|v| *v as f64 / total).collect();
        let class_index = votes
            .iter()
            .enumerate()
            .max_by_key(|(_, v)| **v)
            .map(|(i, _)| i)
            .unwrap_or(0);

        Ok(Prediction {
            class_index,
            label: self.classes[class_index].clone(),
            probabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two stumps splitting on feature 0 at 0.5: both vote class 1 above
    /// the threshold; below, they disagree (classes 0 and 2).
    fn make_forest() -> ForestModel {
        ForestModel {
            feature_names: vec!["a".to_string(), "b".to_string()],
            classes: vec!["Low".to_string(), "High".to_string(), "Moderate".to_string()],
            trees: vec![
                DecisionTree {
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
                },
                DecisionTree {
                    nodes: vec![
                        TreeNode::Split {
                            feature: 0,
                            threshold: 0.5,
                            left: 1,
                            right: 2,
                        },
                        TreeNode::Leaf { class: 2 },
                        TreeNode::Leaf { class: 1 },
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_unanimous_vote() {
        let model = make_forest();
        let pred = model.predict(&[0.9, 0.0]).unwrap();
        assert_eq!(pred.label, "High");
        assert_eq!(pred.class_index, 1);
        assert_eq!(pred.probabilities, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_split_vote_yields_fractions() {
        let model = make_forest();
        let pred = model.predict(&[0.1, 0.0]).unwrap();
        // one vote each for Low and Moderate
        assert_eq!(pred.probabilities, vec![0.5, 0.0, 0.5]);
    }

    #[test]
    fn test_probability_of_named_class() {
        let model = make_forest();
        let pred = model.predict(&[0.9, 0.0]).unwrap();
        assert_eq!(pred.probability_of(&model.classes, "High"), Some(1.0));
        assert_eq!(pred.probability_of(&model.classes, "Severe"), None);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let model = make_forest();
        let err = model.predict(&[0.9]).unwrap_err();
        assert!(matches!(
            err,
            PredictError::ShapeMismatch { got: 1, expected: 2 }
        ));
    }

    #[test]
    fn test_empty_forest_rejected() {
        let model = ForestModel {
            feature_names: vec!["a".to_string()],
            classes: vec!["Low".to_string()],
            trees: vec![],
        };
        assert!(matches!(
            model.predict(&[0.0]).unwrap_err(),
            PredictError::EmptyForest
        ));
    }

    #[test]
    fn test_dangling_node_index_rejected() {
        let model = ForestModel {
            feature_names: vec!["a".to_string()],
            classes: vec!["Low".to_string(), "High".to_string()],
            trees: vec![DecisionTree {
                nodes: vec![TreeNode::Split {
                    feature: 0,
                    threshold: 0.5,
                    left: 7,
                    right: 8,
                }],
            }],
        };
        assert!(matches!(
            model.predict(&[0.0]).unwrap_err(),
            PredictError::NodeOutOfRange(7)
        ));
    }

    #[test]
    fn test_artifact_round_trip() {
        let json = r#"{
            "feature_names": ["wpi", "sss"],
            "classes": ["Low", "Moderate", "High"],
            "trees": [{
                "nodes": [
                    {"kind": "split", "feature": 0, "threshold": 3.5, "left": 1, "right": 2},
                    {"kind": "leaf", "class": 0},
                    {"kind": "leaf", "class": 2}
                ]
            }]
        }"#;
        let model = ForestModel::from_json(json.as_bytes()).unwrap();
        assert_eq!(model.predict(&[7.0, 9.0]).unwrap().label, "High");
        assert_eq!(model.predict(&[1.0, 2.0]).unwrap().label, "Low");
    }
}
