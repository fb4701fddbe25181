use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::{models::InviteLink, utils::sql};

pub async fn insert(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
    code: &str,
    expires_at: DateTime<Utc>,
) -> Result<InviteLink, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, InviteLink>(&sql(r#"
        INSERT INTO
            invite_link (
                id,
                code,
                group_id,
                expires_at,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            code,
            group_id,
            used_at,
            expires_at,
            created_at,
            updated_at
    "#))
    .bind(Uuid::new_v4())
    .bind(code)
    .bind(group_id)
    .bind(expires_at)
    .bind(now)
    .bind(now)
    .fetch_one(ex)
    .await
}

/// Atomically marks an unused, unexpired code as used. Exactly one of any
/// set of concurrent redeemers gets the row back.
pub async fn consume(
    ex: impl PgExecutor<'_>,
    code: &str,
) -> Result<Option<InviteLink>, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, InviteLink>(&sql(r#"
        UPDATE invite_link
        SET
            used_at = ?,
            updated_at = ?
        WHERE
            code = ?
            AND used_at IS NULL
            AND expires_at > ?
        RETURNING
            id,
            code,
            group_id,
            used_at,
            expires_at,
            created_at,
            updated_at
    "#))
    .bind(now)
    .bind(now)
    .bind(code)
    .bind(now)
    .fetch_optional(ex)
    .await
}

pub async fn list_for_group(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
) -> Result<Vec<InviteLink>, sqlx::Error> {
    sqlx::query_as::<_, InviteLink>(&sql(r#"
        SELECT
            id,
            code,
            group_id,
            used_at,
            expires_at,
            created_at,
            updated_at
        FROM
            invite_link
        WHERE
            group_id = ?
        ORDER BY
            created_at DESC
    "#))
    .bind(group_id)
    .fetch_all(ex)
    .await
}
