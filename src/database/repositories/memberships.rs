use chrono::{DateTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::{
    models::{GroupMembership, lifecycle::ACTIVE_ROWS},
    utils::sql,
};

/// Inserts a membership, or returns None when an active one already exists
/// for the (group, user) pair.
pub async fn insert(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
    user_id: Uuid,
    view_access: bool,
    admin_access: bool,
    controlled_user: bool,
    email_confirmed_at: Option<DateTime<Utc>>,
) -> Result<Option<GroupMembership>, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, GroupMembership>(&sql(r#"
        INSERT INTO
            group_users (
                id,
                group_id,
                user_id,
                view_access,
                admin_access,
                controlled_user,
                email_confirmed_at,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (group_id, user_id) WHERE deleted_at IS NULL
        DO NOTHING
        RETURNING
            id,
            group_id,
            user_id,
            view_access,
            admin_access,
            controlled_user,
            email_confirmed_at,
            created_at,
            updated_at,
            deleted_at
    "#))
    .bind(Uuid::new_v4())
    .bind(group_id)
    .bind(user_id)
    .bind(view_access)
    .bind(admin_access)
    .bind(controlled_user)
    .bind(email_confirmed_at)
    .bind(now)
    .bind(now)
    .fetch_optional(ex)
    .await
}

pub async fn find_active(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<Option<GroupMembership>, sqlx::Error> {
    sqlx::query_as::<_, GroupMembership>(&sql(&format!(
        r#"
        SELECT
            id,
            group_id,
            user_id,
            view_access,
            admin_access,
            controlled_user,
            email_confirmed_at,
            created_at,
            updated_at,
            deleted_at
        FROM
            group_users
        WHERE
            group_id = ?
            AND user_id = ?
            AND {ACTIVE_ROWS}
        "#
    )))
    .bind(group_id)
    .bind(user_id)
    .fetch_optional(ex)
    .await
}

pub async fn list_for_group(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
) -> Result<Vec<GroupMembership>, sqlx::Error> {
    sqlx::query_as::<_, GroupMembership>(&sql(&format!(
        r#"
        SELECT
            id,
            group_id,
            user_id,
            view_access,
            admin_access,
            controlled_user,
            email_confirmed_at,
            created_at,
            updated_at,
            deleted_at
        FROM
            group_users
        WHERE
            group_id = ?
            AND {ACTIVE_ROWS}
        ORDER BY
            created_at
        "#
    )))
    .bind(group_id)
    .fetch_all(ex)
    .await
}

pub async fn group_ids_for_user(
    ex: impl PgExecutor<'_>,
    user_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(&sql(&format!(
        r#"
        SELECT group_id
        FROM group_users
        WHERE user_id = ? AND {ACTIVE_ROWS}
        "#
    )))
    .bind(user_id)
    .fetch_all(ex)
    .await
}

pub async fn update_permissions(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
    user_id: Uuid,
    view_access: bool,
    admin_access: bool,
    controlled_user: bool,
) -> Result<Option<GroupMembership>, sqlx::Error> {
    sqlx::query_as::<_, GroupMembership>(&sql(&format!(
        r#"
        UPDATE group_users
        SET
            view_access = ?,
            admin_access = ?,
            controlled_user = ?,
            updated_at = ?
        WHERE
            group_id = ?
            AND user_id = ?
            AND {ACTIVE_ROWS}
        RETURNING
            id,
            group_id,
            user_id,
            view_access,
            admin_access,
            controlled_user,
            email_confirmed_at,
            created_at,
            updated_at,
            deleted_at
        "#
    )))
    .bind(view_access)
    .bind(admin_access)
    .bind(controlled_user)
    .bind(Utc::now())
    .bind(group_id)
    .bind(user_id)
    .fetch_optional(ex)
    .await
}

pub async fn soft_delete(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<Option<GroupMembership>, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, GroupMembership>(&sql(&format!(
        r#"
        UPDATE group_users
        SET
            deleted_at = ?,
            updated_at = ?
        WHERE
            group_id = ?
            AND user_id = ?
            AND {ACTIVE_ROWS}
        RETURNING
            id,
            group_id,
            user_id,
            view_access,
            admin_access,
            controlled_user,
            email_confirmed_at,
            created_at,
            updated_at,
            deleted_at
        "#
    )))
    .bind(now)
    .bind(now)
    .bind(group_id)
    .bind(user_id)
    .fetch_optional(ex)
    .await
}
