use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::BaseResumeRow;

pub async fn insert_resume(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    content: &Value,
) -> Result<BaseResumeRow, sqlx::Error> {
    sqlx::query_as::<_, BaseResumeRow>(
        r#"
        INSERT INTO base_resumes (id, user_id, title, content)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(title)
    .bind(content)
    .fetch_one(pool)
    .await
}

pub async fn get_resume(
    pool: &PgPool,
    user_id: Uuid,
    resume_id: Uuid,
) -> Result<Option<BaseResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, BaseResumeRow>(
        "SELECT * FROM base_resumes WHERE id = $1 AND user_id = $2",
    )
    .bind(resume_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_resumes(pool: &PgPool, user_id: Uuid) -> Result<Vec<BaseResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, BaseResumeRow>(
        "SELECT * FROM base_resumes WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Returns `true` when a row was deleted.
pub async fn delete_resume(
    pool: &PgPool,
    user_id: Uuid,
    resume_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM base_resumes WHERE id = $1 AND user_id = $2")
        .bind(resume_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
