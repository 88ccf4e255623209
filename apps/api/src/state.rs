use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::tailoring::generator::CandidateGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub s3_bucket: String,
    /// Produces tailored candidates. Claude-backed in production, scripted in tests.
    pub generator: Arc<dyn CandidateGenerator>,
}
