use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::TailoredResumeRow;

pub struct NewTailoredResume<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub application_id: Uuid,
    pub base_resume_id: Uuid,
    pub content: &'a Value,
    pub keywords: &'a [String],
    pub s3_key: Option<&'a str>,
}

pub async fn insert_tailored(
    pool: &PgPool,
    new: NewTailoredResume<'_>,
) -> Result<TailoredResumeRow, sqlx::Error> {
    sqlx::query_as::<_, TailoredResumeRow>(
        r#"
        INSERT INTO tailored_resumes
            (id, user_id, application_id, base_resume_id, content, keywords, s3_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(new.id)
    .bind(new.user_id)
    .bind(new.application_id)
    .bind(new.base_resume_id)
    .bind(new.content)
    .bind(new.keywords)
    .bind(new.s3_key)
    .fetch_one(pool)
    .await
}

/// Records where the Markdown export was uploaded.
pub async fn set_export_key(
    pool: &PgPool,
    user_id: Uuid,
    tailored_id: Uuid,
    s3_key: &str,
) -> Result<TailoredResumeRow, sqlx::Error> {
    sqlx::query_as::<_, TailoredResumeRow>(
        r#"
        UPDATE tailored_resumes SET s3_key = $1
        WHERE id = $2 AND user_id = $3
        RETURNING *
        "#,
    )
    .bind(s3_key)
    .bind(tailored_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn get_tailored(
    pool: &PgPool,
    user_id: Uuid,
    tailored_id: Uuid,
) -> Result<Option<TailoredResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, TailoredResumeRow>(
        "SELECT * FROM tailored_resumes WHERE id = $1 AND user_id = $2",
    )
    .bind(tailored_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_tailored_for_application(
    pool: &PgPool,
    user_id: Uuid,
    application_id: Uuid,
) -> Result<Vec<TailoredResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, TailoredResumeRow>(
        r#"
        SELECT * FROM tailored_resumes
        WHERE application_id = $1 AND user_id = $2
        ORDER BY created_at DESC
        "#,
    )
    .bind(application_id)
    .bind(user_id)
    .fetch_all(pool)
    .await
}
