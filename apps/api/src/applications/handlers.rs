//! Axum route handlers for the Application API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::applications::store::{
    get_application, insert_application, list_applications, list_status_events, update_status,
    NewApplication,
};
use crate::errors::AppError;
use crate::jobs::store::get_posting;
use crate::models::application::{ApplicationRow, ApplicationStatus, StatusEventRow};
use crate::resumes::store::get_resume;
use crate::routes::UserIdQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub user_id: Uuid,
    pub job_posting_id: Uuid,
    pub base_resume_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListApplicationsQuery {
    pub user_id: Uuid,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub user_id: Uuid,
    pub status: String,
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    Json(request): Json<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    if get_posting(&state.db, request.user_id, request.job_posting_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "Job posting {} not found",
            request.job_posting_id
        )));
    }
    if let Some(resume_id) = request.base_resume_id {
        if get_resume(&state.db, request.user_id, resume_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
        }
    }

    let notes = request
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let row = insert_application(
        &state.db,
        NewApplication {
            user_id: request.user_id,
            job_posting_id: request.job_posting_id,
            base_resume_id: request.base_resume_id,
            notes,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<ListApplicationsQuery>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<ApplicationStatus>)
        .transpose()?;
    Ok(Json(
        list_applications(&state.db, params.user_id, status).await?,
    ))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ApplicationRow>, AppError> {
    Ok(Json(load_application(&state, params.user_id, id).await?))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let target: ApplicationStatus = request.status.parse()?;
    let application = load_application(&state, request.user_id, id).await?;
    let current = application.current_status()?;

    check_transition(current, target)?;

    let row = update_status(&state.db, &application, current, target)
        .await?
        .ok_or_else(|| stale_status(id, current))?;
    Ok(Json(row))
}

/// GET /api/v1/applications/:id/history
pub async fn handle_status_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<StatusEventRow>>, AppError> {
    let application = load_application(&state, params.user_id, id).await?;
    Ok(Json(list_status_events(&state.db, application.id).await?))
}

pub(crate) async fn load_application(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
) -> Result<ApplicationRow, AppError> {
    get_application(&state.db, user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

fn stale_status(id: Uuid, expected: ApplicationStatus) -> AppError {
    AppError::Conflict(format!(
        "Application {id} is no longer '{expected}', reload and try again"
    ))
}

/// Any move is allowed except staying put. Terminal statuses can be reopened.
fn check_transition(from: ApplicationStatus, to: ApplicationStatus) -> Result<(), AppError> {
    if from == to {
        return Err(AppError::Validation(format!(
            "Application is already '{to}'"
        )));
    }
    if from.is_terminal() && !to.is_terminal() {
        tracing::info!("Reopening application from terminal status '{from}' to '{to}'");
    }
    Ok(())
}
