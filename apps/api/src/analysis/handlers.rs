//! Axum route handlers for the Analysis API.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::analysis::analyzer::{analyze_scholarship, AnalyzeResponse};
use crate::errors::AppError;
use crate::models::scholarship::ScholarshipAnalysis;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub scholarship_id: Option<Uuid>,
}

/// POST /api/v1/scholarships/analyze
///
/// Returns the stored analysis, or runs one and stores it. `cached` tells the
/// caller which happened.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = payload?;
    let scholarship_id = request
        .scholarship_id
        .ok_or_else(|| AppError::Validation("scholarship_id is required".to_string()))?;

    let response =
        analyze_scholarship(state.store.as_ref(), state.llm.as_ref(), scholarship_id).await?;
    Ok(Json(response))
}

/// GET /api/v1/scholarships/:id/analysis
///
/// Read-only lookup. Never triggers an analysis.
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ScholarshipAnalysis>, AppError> {
    let Path(scholarship_id) = path?;
    let analysis = state
        .store
        .get_analysis(scholarship_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No analysis stored for scholarship {scholarship_id}"))
        })?;
    Ok(Json(analysis))
}
