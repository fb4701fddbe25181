use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::{
    models::{ChangeRecord, ChangeType},
    utils::sql,
};

pub async fn insert(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
    user_id: Uuid,
    change_type: ChangeType,
    change_detail: Option<&str>,
    changing_user_id: Uuid,
) -> Result<ChangeRecord, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, ChangeRecord>(&sql(r#"
        INSERT INTO
            changes (
                id,
                group_id,
                user_id,
                change_type,
                change_detail,
                changing_user_id,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            group_id,
            user_id,
            change_type,
            change_detail,
            changing_user_id,
            created_at,
            updated_at
    "#))
    .bind(Uuid::new_v4())
    .bind(group_id)
    .bind(user_id)
    .bind(change_type)
    .bind(change_detail)
    .bind(changing_user_id)
    .bind(now)
    .bind(now)
    .fetch_one(ex)
    .await
}

/// Records for a group with `created_at` in `[start, end)`, oldest first,
/// optionally narrowed to one affected member.
pub async fn list_for_group(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    user_id: Option<Uuid>,
) -> Result<Vec<ChangeRecord>, sqlx::Error> {
    sqlx::query_as::<_, ChangeRecord>(&sql(r#"
        SELECT
            id,
            group_id,
            user_id,
            change_type,
            change_detail,
            changing_user_id,
            created_at,
            updated_at
        FROM
            changes
        WHERE
            group_id = ?
            AND created_at >= ?
            AND created_at < ?
            AND (?::uuid IS NULL OR user_id = ?)
        ORDER BY
            created_at ASC
    "#))
    .bind(group_id)
    .bind(start)
    .bind(end)
    .bind(user_id)
    .bind(user_id)
    .fetch_all(ex)
    .await
}
