use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::ml::registry::ModelRegistry;
use crate::screening::composite::{RiskThresholds, ScoringWeights};
use crate::screening::predictor::RiskPredictor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Classifier artifacts loaded once at startup. Absent artifacts stay
    /// `None`; every consumer has a rule-based path.
    pub models: Arc<ModelRegistry>,
    /// Pluggable screening-category predictor. `None` when no screening
    /// artifact was loaded; the submission flow then stays rule-based.
    pub risk_predictor: Option<Arc<dyn RiskPredictor>>,
    /// Composite weighting scheme (primary 0.6 / secondary 0.3 / risk 0.1).
    pub weights: ScoringWeights,
    /// Category cutoffs (High ≥ 0.7, Moderate ≥ 0.4).
    pub thresholds: RiskThresholds,
}
