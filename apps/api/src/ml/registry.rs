//! Loads classifier artifacts once at startup.
//!
//! The registry is built in `main` and handed to `AppState`; handlers never
//! reach into ambient global state for a model. A missing or unreadable
//! artifact leaves its slot `None`; every consumer has a rule-based path.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::ml::forest::ForestModel;

const SCREENING_ARTIFACT: &str = "screening_risk.json";
const PHQ9_ARTIFACT: &str = "phq9_severity.json";
const GAD7_ARTIFACT: &str = "gad7_severity.json";

#[derive(Debug, Default)]
pub struct ModelRegistry {
    /// Risk-category override for screening submissions.
    pub screening: Option<Arc<ForestModel>>,
    /// PHQ-9 severity predictor for monthly assessments.
    pub phq9: Option<Arc<ForestModel>>,
    /// GAD-7 severity predictor for monthly assessments.
    pub gad7: Option<Arc<ForestModel>>,
}

impl ModelRegistry {
    pub fn load(dir: &Path) -> Self {
        Self {
            screening: load_artifact(dir, SCREENING_ARTIFACT),
            phq9: load_artifact(dir, PHQ9_ARTIFACT),
            gad7: load_artifact(dir, GAD7_ARTIFACT),
        }
    }
}

fn load_artifact(dir: &Path, name: &str) -> Option<Arc<ForestModel>> {
    let path = dir.join(name);
    let bytes = match std::fs::read(&path) {
        Ok(b) => b,
        Err(e) => {
            info!("Model artifact {} not loaded: {e}", path.display());
            return None;
        }
    };
    match ForestModel::from_json(&bytes) {
        Ok(model) => {
            info!(
                "Loaded model artifact {} ({} trees, classes: {:?})",
                path.display(),
                model.trees.len(),
                model.classes
            );
            Some(Arc::new(model))
        }
        Err(e) => {
            warn!("Could not parse model artifact {}: {e}", path.display());
            None
        }
    }
}
