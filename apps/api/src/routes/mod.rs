pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::applications::handlers as applications;
use crate::jobs::handlers as jobs;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

/// `?user_id=` on read endpoints. Every query is scoped to this user.
#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Base resumes
        .route(
            "/api/v1/resumes",
            post(resumes::handle_create_resume).get(resumes::handle_list_resumes),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume).delete(resumes::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/sections",
            get(resumes::handle_get_sections),
        )
        // Job postings
        .route(
            "/api/v1/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .route("/api/v1/jobs/import", post(jobs::handle_import_job))
        // Applications
        .route(
            "/api/v1/applications",
            post(applications::handle_create_application)
                .get(applications::handle_list_applications),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get_application),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_update_status),
        )
        .route(
            "/api/v1/applications/:id/history",
            get(applications::handle_status_history),
        )
        // Tailoring
        .route("/api/v1/tailor/preview", post(tailoring::handle_preview))
        .route(
            "/api/v1/applications/:id/tailor",
            post(tailoring::handle_tailor_application),
        )
        .route(
            "/api/v1/applications/:id/tailored",
            get(tailoring::handle_list_tailored),
        )
        .route("/api/v1/tailored/:id", get(tailoring::handle_get_tailored))
        .with_state(state)
}
