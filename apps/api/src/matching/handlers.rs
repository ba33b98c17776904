//! Axum route handlers for the Matching API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::scorer::{match_scholarships, MatchResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub student_id: Option<Uuid>,
    pub limit: Option<usize>,
}

/// POST /api/v1/matches
///
/// Scores the student against the listed, already-analyzed scholarships.
/// `matches` may be empty; that is not an error.
pub async fn handle_match(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, AppError> {
    let Json(request) = payload?;
    let student_id = request
        .student_id
        .ok_or_else(|| AppError::Validation("student_id is required".to_string()))?;
    if request.limit == Some(0) {
        return Err(AppError::Validation("limit must be at least 1".to_string()));
    }

    let limit = state.config.match_limit(request.limit);
    let response = match_scholarships(
        state.store.as_ref(),
        state.llm.as_ref(),
        student_id,
        limit,
        state.config.llm_concurrency,
    )
    .await?;
    Ok(Json(response))
}
