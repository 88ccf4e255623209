//! Axum route handlers for the Base Resume API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{BaseResume, BaseResumeRow, ResumeSection};
use crate::resumes::store::{delete_resume, get_resume, insert_resume, list_resumes};
use crate::routes::UserIdQuery;
use crate::state::AppState;
use crate::tailoring::sections::canonical_sections;

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub user_id: Uuid,
    pub title: String,
    pub content: BaseResume,
}

#[derive(Debug, Serialize)]
pub struct SectionsResponse {
    pub resume_id: Uuid,
    /// `true` when the layout came from the resume itself rather than derivation.
    pub explicit: bool,
    pub sections: Vec<ResumeSection>,
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(request): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<BaseResumeRow>), AppError> {
    validate_new_resume(&request)?;
    let content = serde_json::to_value(&request.content)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize resume: {e}")))?;
    let row = insert_resume(&state.db, request.user_id, request.title.trim(), &content).await?;
    tracing::info!("Stored base resume {} for user {}", row.id, row.user_id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<BaseResumeRow>>, AppError> {
    Ok(Json(list_resumes(&state.db, params.user_id).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<BaseResumeRow>, AppError> {
    let row = get_resume(&state.db, params.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(row))
}

/// GET /api/v1/resumes/:id/sections
///
/// The layout a tailored version of this resume has to keep.
pub async fn handle_get_sections(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<SectionsResponse>, AppError> {
    let row = get_resume(&state.db, params.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    let resume = row
        .document()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored resume {id} is corrupt: {e}")))?;

    Ok(Json(SectionsResponse {
        resume_id: id,
        explicit: !resume.sections.is_empty(),
        sections: canonical_sections(&resume),
    }))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    if !delete_resume(&state.db, params.user_id, id).await? {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn validate_new_resume(request: &CreateResumeRequest) -> Result<(), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if request.content.contact.name.trim().is_empty() {
        return Err(AppError::Validation(
            "resume contact name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
