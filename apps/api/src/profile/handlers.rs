use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::errors::AppError;
use crate::models::student::{StudentProfile, UpsertStudentRequest};
use crate::state::AppState;

/// PUT /api/v1/students
///
/// Creates or fully overwrites the caller's profile. Fields left out of the
/// body are cleared, never merged with the stored row.
pub async fn handle_upsert_student(
    State(state): State<AppState>,
    payload: Result<Json<UpsertStudentRequest>, JsonRejection>,
) -> Result<Json<StudentProfile>, AppError> {
    let Json(request) = payload?;
    let user_id = request
        .user_id
        .ok_or_else(|| AppError::Validation("user_id is required".to_string()))?;

    if request.record.full_name.trim().is_empty() {
        return Err(AppError::Validation("full_name cannot be empty".to_string()));
    }
    if let Some(gpa) = request.record.gpa {
        if !(0.0..=5.0).contains(&gpa) {
            return Err(AppError::Validation(format!(
                "gpa must be between 0.0 and 5.0, got {gpa}"
            )));
        }
    }

    let profile = state.store.upsert_student(user_id, &request.record).await?;
    Ok(Json(profile))
}
