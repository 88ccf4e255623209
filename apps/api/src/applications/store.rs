use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::application::{ApplicationRow, ApplicationStatus, StatusEventRow};

pub struct NewApplication<'a> {
    pub user_id: Uuid,
    pub job_posting_id: Uuid,
    pub base_resume_id: Option<Uuid>,
    pub notes: Option<&'a str>,
}

/// Inserts the application with status `saved` and records the opening event.
pub async fn insert_application(
    pool: &PgPool,
    new: NewApplication<'_>,
) -> Result<ApplicationRow, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (id, user_id, job_posting_id, base_resume_id, status, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(new.job_posting_id)
    .bind(new.base_resume_id)
    .bind(ApplicationStatus::Saved.as_str())
    .bind(new.notes)
    .fetch_one(&mut *tx)
    .await?;

    insert_event(&mut tx, row.id, None, ApplicationStatus::Saved).await?;
    tx.commit().await?;

    Ok(row)
}

pub async fn get_application(
    pool: &PgPool,
    user_id: Uuid,
    application_id: Uuid,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE id = $1 AND user_id = $2",
    )
    .bind(application_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_applications(
    pool: &PgPool,
    user_id: Uuid,
    status: Option<ApplicationStatus>,
) -> Result<Vec<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        SELECT * FROM applications
        WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
        ORDER BY updated_at DESC
        "#,
    )
    .bind(user_id)
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await
}

/// Moves the application from `from` to `to` and appends a status event. The
/// first move to `applied` stamps `applied_at`.
///
/// Returns `None` when the stored status is no longer `from`.
pub async fn update_status(
    pool: &PgPool,
    application: &ApplicationRow,
    from: ApplicationStatus,
    to: ApplicationStatus,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query_as::<_, ApplicationRow>(UPDATE_STATUS_SQL)
        .bind(to.as_str())
        .bind(to == ApplicationStatus::Applied)
        .bind(application.id)
        .bind(application.user_id)
        .bind(from.as_str())
        .fetch_optional(&mut *tx)
        .await?;

    let Some(row) = updated else {
        tx.rollback().await?;
        return Ok(None);
    };

    insert_event(&mut tx, row.id, Some(from), to).await?;
    tx.commit().await?;

    info!("Application {} moved {from} -> {to}", row.id);
    Ok(Some(row))
}

const UPDATE_STATUS_SQL: &str = r#"
    UPDATE applications
    SET status = $1,
        applied_at = CASE WHEN $2 AND applied_at IS NULL THEN now() ELSE applied_at END,
        updated_at = now()
    WHERE id = $3 AND user_id = $4 AND status = $5
    RETURNING *
"#;

pub async fn list_status_events(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<Vec<StatusEventRow>, sqlx::Error> {
    sqlx::query_as::<_, StatusEventRow>(
        r#"
        SELECT * FROM application_status_events
        WHERE application_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(application_id)
    .fetch_all(pool)
    .await
}

async fn insert_event(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    application_id: Uuid,
    from: Option<ApplicationStatus>,
    to: ApplicationStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO application_status_events (id, application_id, from_status, to_status)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(application_id)
    .bind(from.map(|s| s.as_str()))
    .bind(to.as_str())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_update_is_guarded_by_previous_status() {
        let sql = UPDATE_STATUS_SQL.split_whitespace().collect::<Vec<_>>().join(" ");
        assert!(sql.contains("WHERE id = $3 AND user_id = $4 AND status = $5"));
    }
}
