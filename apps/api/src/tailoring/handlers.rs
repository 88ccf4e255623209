//! Axum route handlers for the Tailoring API.

use std::future::Future;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::applications::handlers::load_application;
use crate::errors::AppError;
use crate::jobs::store::get_posting;
use crate::models::resume::{BaseResume, TailoredCandidate, TailoredResumeRow};
use crate::resumes::store::get_resume;
use crate::routes::UserIdQuery;
use crate::state::AppState;
use crate::tailoring::export::{export_key, render_markdown, upload_export};
use crate::tailoring::generator::generate_tailored_resume;
use crate::tailoring::store::{
    get_tailored, insert_tailored, list_tailored_for_application, set_export_key,
    NewTailoredResume,
};

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub base_resume: BaseResume,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub candidate: TailoredCandidate,
}

#[derive(Debug, Deserialize)]
pub struct TailorApplicationRequest {
    pub user_id: Uuid,
    /// Overrides the resume linked to the application.
    pub base_resume_id: Option<Uuid>,
}

/// POST /api/v1/tailor/preview
///
/// Tailors an inline resume without touching the database.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    require_job_description(&request.job_description)?;

    let candidate = generate_tailored_resume(
        &request.base_resume,
        &request.job_description,
        state.generator.as_ref(),
    )
    .await?;

    Ok(Json(PreviewResponse { candidate }))
}

/// POST /api/v1/applications/:id/tailor
///
/// Tailors the application's resume to its job posting, stores the result and
/// its Markdown export.
pub async fn handle_tailor_application(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Json(request): Json<TailorApplicationRequest>,
) -> Result<(StatusCode, Json<TailoredResumeRow>), AppError> {
    let user_id = request.user_id;
    let application = load_application(&state, user_id, application_id).await?;

    let resume_id = request
        .base_resume_id
        .or(application.base_resume_id)
        .ok_or_else(|| {
            AppError::Validation(
                "No base resume given and none linked to this application".to_string(),
            )
        })?;

    let resume_row = get_resume(&state.db, user_id, resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
    let base = resume_row.document().map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Stored resume {resume_id} is corrupt: {e}"))
    })?;

    let posting = get_posting(&state.db, user_id, application.job_posting_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Job posting {} not found",
                application.job_posting_id
            ))
        })?;
    require_job_description(&posting.description)?;

    info!(
        "Tailoring resume {} for application {} ({} at {})",
        resume_id, application_id, posting.title, posting.company
    );
    let candidate =
        generate_tailored_resume(&base, &posting.description, state.generator.as_ref()).await?;

    let content = serde_json::to_value(&candidate).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Failed to serialize tailored resume: {e}"))
    })?;

    let tailored_id = Uuid::new_v4();
    let row = persist_then_export(
        || {
            insert_tailored(
                &state.db,
                NewTailoredResume {
                    id: tailored_id,
                    user_id,
                    application_id,
                    base_resume_id: resume_id,
                    content: &content,
                    keywords: &candidate.keywords,
                    s3_key: None,
                },
            )
        },
        |row| export_tailored(&state, &base, &candidate, row),
    )
    .await?;

    info!(
        "Stored tailored resume {} with {} keywords",
        row.id,
        row.keywords.len()
    );
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/tailored/:id
pub async fn handle_get_tailored(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<TailoredResumeRow>, AppError> {
    let row = get_tailored(&state.db, params.user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tailored resume {id} not found")))?;
    Ok(Json(row))
}

/// GET /api/v1/applications/:id/tailored
pub async fn handle_list_tailored(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<TailoredResumeRow>>, AppError> {
    let application = load_application(&state, params.user_id, application_id).await?;
    Ok(Json(
        list_tailored_for_application(&state.db, params.user_id, application.id).await?,
    ))
}

/// Runs `export` only once `persist` has stored the row, so a failed insert
/// never leaves an export object behind.
async fn persist_then_export<P, PFut, X, XFut>(
    persist: P,
    export: X,
) -> Result<TailoredResumeRow, AppError>
where
    P: FnOnce() -> PFut,
    PFut: Future<Output = Result<TailoredResumeRow, sqlx::Error>>,
    X: FnOnce(TailoredResumeRow) -> XFut,
    XFut: Future<Output = TailoredResumeRow>,
{
    let row = persist().await?;
    Ok(export(row).await)
}

/// Uploads the Markdown export and records its key. Best-effort: on failure
/// the stored row is returned without a key.
async fn export_tailored(
    state: &AppState,
    base: &BaseResume,
    candidate: &TailoredCandidate,
    row: TailoredResumeRow,
) -> TailoredResumeRow {
    let key = export_key(row.user_id, row.id);
    if let Err(e) = upload_export(
        &state.s3,
        &state.s3_bucket,
        &key,
        render_markdown(base, candidate),
    )
    .await
    {
        warn!("Skipping export for tailored resume {}: {e}", row.id);
        return row;
    }

    match set_export_key(&state.db, row.user_id, row.id, &key).await {
        Ok(updated) => updated,
        Err(e) => {
            warn!("Uploaded {key} but could not record it on {}: {e}", row.id);
            row
        }
    }
}

fn require_job_description(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "job description cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn stored_row() -> TailoredResumeRow {
        TailoredResumeRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
            base_resume_id: Uuid::new_v4(),
            content: json!({}),
            keywords: vec!["rust".to_string()],
            s3_key: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_failed_insert_skips_export() {
        let exported = AtomicBool::new(false);
        let result = persist_then_export(
            || async { Err::<TailoredResumeRow, _>(sqlx::Error::RowNotFound) },
            |row| {
                exported.store(true, Ordering::SeqCst);
                async move { row }
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert!(!exported.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_export_sees_stored_row() {
        let row = stored_row();
        let expected_id = row.id;
        let result = persist_then_export(
            || async move { Ok::<_, sqlx::Error>(row) },
            |mut row| async move {
                row.s3_key = Some(export_key(row.user_id, row.id));
                row
            },
        )
        .await
        .unwrap();

        assert_eq!(result.id, expected_id);
        assert_eq!(
            result.s3_key,
            Some(format!("tailored/{}/{}.md", result.user_id, expected_id))
        );
    }

    #[test]
    fn test_blank_job_description_rejected() {
        assert!(matches!(
            require_job_description(" \n "),
            Err(AppError::Validation(_))
        ));
        assert!(require_job_description("Rust role").is_ok());
    }
}
