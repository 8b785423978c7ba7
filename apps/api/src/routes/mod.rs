pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessments;
use crate::profile;
use crate::reports;
use crate::screening;
use crate::state::AppState;
use crate::tracking;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Daily tracking
        .route(
            "/api/v1/entries",
            post(tracking::handlers::handle_create_entry)
                .get(tracking::handlers::handle_get_entry),
        )
        .route(
            "/api/v1/entries/all",
            get(tracking::handlers::handle_list_entries),
        )
        // Screening
        .route(
            "/api/v1/screenings",
            post(screening::handlers::handle_submit_screening),
        )
        .route(
            "/api/v1/screenings/latest",
            get(screening::handlers::handle_latest_screening),
        )
        // Reports
        .route(
            "/api/v1/reports/weekly",
            get(reports::handlers::handle_weekly_summary),
        )
        .route(
            "/api/v1/reports/weekly/all",
            get(reports::handlers::handle_list_weekly_summaries),
        )
        .route(
            "/api/v1/reports/final",
            get(reports::handlers::handle_final_report),
        )
        .route(
            "/api/v1/reports/export/weekly",
            get(reports::handlers::handle_export_weekly),
        )
        .route(
            "/api/v1/reports/export/final",
            get(reports::handlers::handle_export_final),
        )
        // Monthly assessments
        .route(
            "/api/v1/assessments",
            post(assessments::handlers::handle_submit_assessment),
        )
        // Profile
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_update_profile),
        )
        .with_state(state)
}
