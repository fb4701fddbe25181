use chrono::Utc;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::{
    models::{Group, lifecycle::ACTIVE_ROWS},
    utils::sql,
};

pub async fn insert(
    ex: impl PgExecutor<'_>,
    group_name: &str,
    default_vacation_days: i32,
    default_home_office_days: i32,
    manager_user_id: Uuid,
    main_approval_user_id: Option<Uuid>,
    temp_approval_user_id: Option<Uuid>,
) -> Result<Group, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Group>(&sql(r#"
        INSERT INTO
            groups (
                id,
                group_name,
                default_vacation_days,
                default_home_office_days,
                manager_user_id,
                main_approval_user_id,
                temp_approval_user_id,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING
            id,
            group_name,
            default_vacation_days,
            default_home_office_days,
            manager_user_id,
            main_approval_user_id,
            temp_approval_user_id,
            created_at,
            updated_at,
            deleted_at
    "#))
    .bind(Uuid::new_v4())
    .bind(group_name)
    .bind(default_vacation_days)
    .bind(default_home_office_days)
    .bind(manager_user_id)
    .bind(main_approval_user_id)
    .bind(temp_approval_user_id)
    .bind(now)
    .bind(now)
    .fetch_one(ex)
    .await
}

pub async fn find_active(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(&sql(&format!(
        r#"
        SELECT
            id,
            group_name,
            default_vacation_days,
            default_home_office_days,
            manager_user_id,
            main_approval_user_id,
            temp_approval_user_id,
            created_at,
            updated_at,
            deleted_at
        FROM
            groups
        WHERE
            id = ?
            AND {ACTIVE_ROWS}
        "#
    )))
    .bind(group_id)
    .fetch_optional(ex)
    .await
}

pub async fn find_all_active(
    ex: impl PgExecutor<'_>,
    group_ids: &[Uuid],
) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(&sql(&format!(
        r#"
        SELECT
            id,
            group_name,
            default_vacation_days,
            default_home_office_days,
            manager_user_id,
            main_approval_user_id,
            temp_approval_user_id,
            created_at,
            updated_at,
            deleted_at
        FROM
            groups
        WHERE
            id = ANY(?)
            AND {ACTIVE_ROWS}
        ORDER BY
            created_at
        "#
    )))
    .bind(group_ids)
    .fetch_all(ex)
    .await
}

pub async fn update_approvers(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
    main_approval_user_id: Option<Uuid>,
    temp_approval_user_id: Option<Uuid>,
) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(&sql(&format!(
        r#"
        UPDATE groups
        SET
            main_approval_user_id = ?,
            temp_approval_user_id = ?,
            updated_at = ?
        WHERE
            id = ?
            AND {ACTIVE_ROWS}
        RETURNING
            id,
            group_name,
            default_vacation_days,
            default_home_office_days,
            manager_user_id,
            main_approval_user_id,
            temp_approval_user_id,
            created_at,
            updated_at,
            deleted_at
        "#
    )))
    .bind(main_approval_user_id)
    .bind(temp_approval_user_id)
    .bind(Utc::now())
    .bind(group_id)
    .fetch_optional(ex)
    .await
}

pub async fn update_quota_defaults(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
    default_vacation_days: i32,
    default_home_office_days: i32,
) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(&sql(&format!(
        r#"
        UPDATE groups
        SET
            default_vacation_days = ?,
            default_home_office_days = ?,
            updated_at = ?
        WHERE
            id = ?
            AND {ACTIVE_ROWS}
        RETURNING
            id,
            group_name,
            default_vacation_days,
            default_home_office_days,
            manager_user_id,
            main_approval_user_id,
            temp_approval_user_id,
            created_at,
            updated_at,
            deleted_at
        "#
    )))
    .bind(default_vacation_days)
    .bind(default_home_office_days)
    .bind(Utc::now())
    .bind(group_id)
    .fetch_optional(ex)
    .await
}

pub async fn soft_delete(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
) -> Result<Option<Group>, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, Group>(&sql(&format!(
        r#"
        UPDATE groups
        SET
            deleted_at = ?,
            updated_at = ?
        WHERE
            id = ?
            AND {ACTIVE_ROWS}
        RETURNING
            id,
            group_name,
            default_vacation_days,
            default_home_office_days,
            manager_user_id,
            main_approval_user_id,
            temp_approval_user_id,
            created_at,
            updated_at,
            deleted_at
        "#
    )))
    .bind(now)
    .bind(now)
    .bind(group_id)
    .fetch_optional(ex)
    .await
}
