mod assessments;
mod config;
mod db;
mod errors;
mod ml;
mod models;
mod profile;
mod reports;
mod routes;
mod screening;
mod state;
mod tracking;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::ml::registry::ModelRegistry;
use crate::routes::build_router;
use crate::screening::composite::{RiskThresholds, ScoringWeights};
use crate::screening::predictor::{ForestRiskPredictor, RiskPredictor};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting FibroTrack API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Load classifier artifacts. The service stays fully functional with
    // an empty registry; submissions then score rule-based only.
    let models = Arc::new(ModelRegistry::load(&config.model_dir));
    info!(
        "Model registry loaded (screening: {}, phq9: {}, gad7: {})",
        models.screening.is_some(),
        models.phq9.is_some(),
        models.gad7.is_some()
    );

    let risk_predictor: Option<Arc<dyn RiskPredictor>> = models
        .screening
        .clone()
        .map(|m| Arc::new(ForestRiskPredictor::new(m)) as Arc<dyn RiskPredictor>);

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        models,
        risk_predictor,
        weights: ScoringWeights::default(),
        thresholds: RiskThresholds::default(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
