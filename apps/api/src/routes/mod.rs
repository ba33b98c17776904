pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::essays::handlers as essays;
use crate::matching::handlers as matching;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Student profiles
        .route("/api/v1/students", put(profile::handle_upsert_student))
        // Scholarship analysis
        .route(
            "/api/v1/scholarships/analyze",
            post(analysis::handle_analyze),
        )
        .route(
            "/api/v1/scholarships/:id/analysis",
            get(analysis::handle_get_analysis),
        )
        // Matching
        .route("/api/v1/matches", post(matching::handle_match))
        // Essays
        .route("/api/v1/essays/drafts", post(essays::handle_generate_drafts))
        .with_state(state)
}
