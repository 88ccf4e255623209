use sqlx::PgPool;
use uuid::Uuid;

use crate::jobs::extraction::NewJobPosting;
use crate::models::job::JobPostingRow;

/// Ignores a posting whose URL the user already saved, matching the partial
/// unique index on `(user_id, url)`.
const INSERT_POSTING_SQL: &str = r#"
    INSERT INTO job_postings (id, user_id, title, company, location, url, description, source)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
    ON CONFLICT (user_id, url) WHERE url IS NOT NULL DO NOTHING
    RETURNING *
"#;

/// Returns `None` when the user already has a posting with this URL.
pub async fn insert_posting(
    pool: &PgPool,
    posting: &NewJobPosting,
) -> Result<Option<JobPostingRow>, sqlx::Error> {
    sqlx::query_as::<_, JobPostingRow>(INSERT_POSTING_SQL)
    .bind(Uuid::new_v4())
    .bind(posting.user_id)
    .bind(&posting.title)
    .bind(&posting.company)
    .bind(&posting.location)
    .bind(&posting.url)
    .bind(&posting.description)
    .bind(&posting.source)
    .fetch_optional(pool)
    .await
}

pub async fn find_posting_by_url(
    pool: &PgPool,
    user_id: Uuid,
    url: &str,
) -> Result<Option<JobPostingRow>, sqlx::Error> {
    sqlx::query_as::<_, JobPostingRow>(
        "SELECT * FROM job_postings WHERE user_id = $1 AND url = $2",
    )
    .bind(user_id)
    .bind(url)
    .fetch_optional(pool)
    .await
}

pub async fn get_posting(
    pool: &PgPool,
    user_id: Uuid,
    posting_id: Uuid,
) -> Result<Option<JobPostingRow>, sqlx::Error> {
    sqlx::query_as::<_, JobPostingRow>(
        "SELECT * FROM job_postings WHERE id = $1 AND user_id = $2",
    )
    .bind(posting_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_postings(pool: &PgPool, user_id: Uuid) -> Result<Vec<JobPostingRow>, sqlx::Error> {
    sqlx::query_as::<_, JobPostingRow>(
        "SELECT * FROM job_postings WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
