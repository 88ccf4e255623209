use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::jobs::extraction::ExtractionError;
use crate::models::application::StatusError;
use crate::tailoring::generator::TailorError;

/// Message shown for every tailoring failure, followed by a reason that is
/// safe to show.
const TAILORING_FAILED: &str = "Failed to generate a valid tailored resume";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {detail}")]
    Llm {
        reason: &'static str,
        detail: String,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<TailorError> for AppError {
    fn from(err: TailorError) -> Self {
        match err {
            TailorError::Generation(e) => AppError::Llm {
                reason: e.public_reason(),
                detail: e.to_string(),
            },
            TailorError::Rejected(report) => {
                AppError::UnprocessableEntity(format!("{TAILORING_FAILED}: {}", report.reason))
            }
            TailorError::Prompt(e) => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

impl From<StatusError> for AppError {
    fn from(err: StatusError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm { reason, detail } => {
                tracing::error!("LLM error: {detail}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    format!("{TAILORING_FAILED}: {reason}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::tailoring::generator::FailureReport;
    use crate::tailoring::validator::Violation;

    #[test]
    fn test_rejection_maps_to_422_with_reason() {
        let err: AppError = TailorError::Rejected(FailureReport {
            reason: "Section count changed".to_string(),
            violation: Violation::SectionCountChanged,
            attempts: 2,
        })
        .into();
        match &err {
            AppError::UnprocessableEntity(msg) => assert_eq!(
                msg,
                "Failed to generate a valid tailored resume: Section count changed"
            ),
            other => panic!("unexpected mapping: {other:?}"),
        }
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_generation_failure_maps_to_bad_gateway() {
        let err: AppError = TailorError::Generation(LlmError::EmptyContent).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert_eq!(
            body["error"]["message"],
            "Failed to generate a valid tailored resume: model returned no content"
        );
    }

    #[tokio::test]
    async fn test_upstream_error_text_is_not_returned() {
        let err: AppError = TailorError::Generation(LlmError::Api {
            status: 401,
            message: "invalid x-api-key sk-ant-secret; org 1234 internal".to_string(),
        })
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(response).await;
        assert_eq!(
            body["error"]["message"],
            "Failed to generate a valid tailored resume: model request failed"
        );
        let body = body.to_string();
        assert!(!body.contains("sk-ant-secret"));
        assert!(!body.contains("x-api-key"));
        assert!(!body.contains("401"));
    }

    #[test]
    fn test_conflict_status() {
        let response = AppError::Conflict("changed underneath".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_status_error_is_bad_request() {
        let err: AppError = StatusError("nope".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_status() {
        let response = AppError::NotFound("Resume x not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
