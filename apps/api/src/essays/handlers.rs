//! Axum route handlers for the Essay API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::essays::strategist::{generate_essay_drafts, EssayDraftsResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EssayDraftsRequest {
    pub student_id: Option<Uuid>,
    pub scholarship_id: Option<Uuid>,
    #[serde(default)]
    pub essay_prompt_index: usize,
}

/// POST /api/v1/essays/drafts
///
/// Returns one draft per angle that succeeded, in angle order, plus the
/// essay prompt and analysis they were written against.
pub async fn handle_generate_drafts(
    State(state): State<AppState>,
    payload: Result<Json<EssayDraftsRequest>, JsonRejection>,
) -> Result<Json<EssayDraftsResponse>, AppError> {
    let Json(request) = payload?;
    let student_id = request
        .student_id
        .ok_or_else(|| AppError::Validation("student_id is required".to_string()))?;
    let scholarship_id = request
        .scholarship_id
        .ok_or_else(|| AppError::Validation("scholarship_id is required".to_string()))?;

    let response = generate_essay_drafts(
        state.store.as_ref(),
        state.llm.as_ref(),
        student_id,
        scholarship_id,
        request.essay_prompt_index,
        state.config.llm_concurrency,
    )
    .await?;
    Ok(Json(response))
}
