//! Axum route handlers for the Job Posting API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::extraction::{normalize_extracted, normalize_manual, ExtractedPosting};
use crate::jobs::store::{find_posting_by_url, insert_posting, list_postings};
use crate::models::job::JobPostingRow;
use crate::routes::UserIdQuery;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub user_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub description: String,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobPostingRow>), AppError> {
    let posting = normalize_manual(
        request.user_id,
        &request.title,
        &request.company,
        request.location.as_deref(),
        request.url.as_deref(),
        &request.description,
    )?;

    let inserted = insert_posting(&state.db, &posting).await?;
    let row = created_or_duplicate(inserted, posting.url.as_deref())?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// POST /api/v1/jobs/import
///
/// Called by the browser extension. Importing the same URL twice returns the
/// posting saved the first time with 200 instead of 201.
pub async fn handle_import_job(
    State(state): State<AppState>,
    Json(raw): Json<ExtractedPosting>,
) -> Result<(StatusCode, Json<JobPostingRow>), AppError> {
    let posting = normalize_extracted(raw)?;

    let inserted = insert_posting(&state.db, &posting).await?;
    let existing = match (&inserted, posting.url.as_deref()) {
        (None, Some(url)) => find_posting_by_url(&state.db, posting.user_id, url).await?,
        _ => None,
    };

    let (status, row) = imported_or_existing(inserted, existing)?;
    if status == StatusCode::CREATED {
        info!(
            "Imported posting {} from {} for user {}",
            row.id, row.source, row.user_id
        );
    } else {
        info!("Posting {} already imported", row.id);
    }
    Ok((status, Json(row)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<JobPostingRow>>, AppError> {
    Ok(Json(list_postings(&state.db, params.user_id).await?))
}

/// Manual entry never reuses an existing posting.
fn created_or_duplicate(
    inserted: Option<JobPostingRow>,
    url: Option<&str>,
) -> Result<JobPostingRow, AppError> {
    inserted.ok_or_else(|| {
        AppError::Validation(format!(
            "A posting for {} already exists",
            url.unwrap_or("this URL")
        ))
    })
}

fn imported_or_existing(
    inserted: Option<JobPostingRow>,
    existing: Option<JobPostingRow>,
) -> Result<(StatusCode, JobPostingRow), AppError> {
    match (inserted, existing) {
        (Some(row), _) => Ok((StatusCode::CREATED, row)),
        (None, Some(row)) => Ok((StatusCode::OK, row)),
        // Conflicting row deleted between the insert and the lookup.
        (None, None) => Err(AppError::Conflict(
            "Posting changed while importing, try again".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn posting(url: &str) -> JobPostingRow {
        JobPostingRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            location: None,
            url: Some(url.to_string()),
            description: "Rust and Postgres".to_string(),
            source: "greenhouse".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_import_is_created() {
        let row = posting("https://boards.greenhouse.io/acme/1");
        let (status, returned) = imported_or_existing(Some(row.clone()), None).unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(returned.id, row.id);
    }

    #[test]
    fn test_conflicting_import_returns_stored_posting() {
        let stored = posting("https://boards.greenhouse.io/acme/1");
        let (status, returned) = imported_or_existing(None, Some(stored.clone())).unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(returned.id, stored.id);
    }

    #[test]
    fn test_vanished_conflict_is_reported_not_500() {
        let err = imported_or_existing(None, None).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_manual_duplicate_is_validation_error() {
        let err = created_or_duplicate(None, Some("https://jobs.lever.co/acme/2")).unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert_eq!(msg, "A posting for https://jobs.lever.co/acme/2 already exists")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_manual_insert_is_returned() {
        let row = posting("https://jobs.lever.co/acme/2");
        assert_eq!(created_or_duplicate(Some(row.clone()), None).unwrap().id, row.id);
    }
}
