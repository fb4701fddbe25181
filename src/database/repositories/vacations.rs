use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::database::{
    models::{VacationRequest, VacationType, lifecycle::ACTIVE_ROWS},
    utils::sql,
};

/// Inserts a request, or returns None when the user already holds an active
/// request for that day.
pub async fn insert(
    ex: impl PgExecutor<'_>,
    user_id: Uuid,
    group_id: Uuid,
    requested_day: NaiveDate,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
    vacation_type: VacationType,
) -> Result<Option<VacationRequest>, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, VacationRequest>(&sql(r#"
        INSERT INTO
            vacation (
                id,
                user_id,
                group_id,
                requested_day,
                start_time,
                end_time,
                vacation_type,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (user_id, requested_day) WHERE deleted_at IS NULL
        DO NOTHING
        RETURNING
            id,
            user_id,
            group_id,
            requested_day,
            start_time,
            end_time,
            vacation_type,
            approved_at,
            approved_by,
            rejected_at,
            rejected_by,
            created_at,
            updated_at,
            deleted_at
    "#))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(group_id)
    .bind(requested_day)
    .bind(start_time)
    .bind(end_time)
    .bind(vacation_type)
    .bind(now)
    .bind(now)
    .fetch_optional(ex)
    .await
}

pub async fn find_active(
    ex: impl PgExecutor<'_>,
    vacation_id: Uuid,
) -> Result<Option<VacationRequest>, sqlx::Error> {
    sqlx::query_as::<_, VacationRequest>(&sql(&format!(
        r#"
        SELECT
            id,
            user_id,
            group_id,
            requested_day,
            start_time,
            end_time,
            vacation_type,
            approved_at,
            approved_by,
            rejected_at,
            rejected_by,
            created_at,
            updated_at,
            deleted_at
        FROM
            vacation
        WHERE
            id = ?
            AND {ACTIVE_ROWS}
        "#
    )))
    .bind(vacation_id)
    .fetch_optional(ex)
    .await
}

/// Row-locked variant used by decision transitions so concurrent decisions
/// on the same request serialize.
pub async fn find_active_for_update(
    ex: impl PgExecutor<'_>,
    vacation_id: Uuid,
) -> Result<Option<VacationRequest>, sqlx::Error> {
    sqlx::query_as::<_, VacationRequest>(&sql(&format!(
        r#"
        SELECT
            id,
            user_id,
            group_id,
            requested_day,
            start_time,
            end_time,
            vacation_type,
            approved_at,
            approved_by,
            rejected_at,
            rejected_by,
            created_at,
            updated_at,
            deleted_at
        FROM
            vacation
        WHERE
            id = ?
            AND {ACTIVE_ROWS}
        FOR UPDATE
        "#
    )))
    .bind(vacation_id)
    .fetch_optional(ex)
    .await
}

/// Active requests for a user with `requested_day` in `[start, end)`,
/// optionally narrowed to one group.
pub async fn list_for_user(
    ex: impl PgExecutor<'_>,
    user_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    group_id: Option<Uuid>,
) -> Result<Vec<VacationRequest>, sqlx::Error> {
    sqlx::query_as::<_, VacationRequest>(&sql(&format!(
        r#"
        SELECT
            id,
            user_id,
            group_id,
            requested_day,
            start_time,
            end_time,
            vacation_type,
            approved_at,
            approved_by,
            rejected_at,
            rejected_by,
            created_at,
            updated_at,
            deleted_at
        FROM
            vacation
        WHERE
            user_id = ?
            AND requested_day >= ?
            AND requested_day < ?
            AND (?::uuid IS NULL OR group_id = ?)
            AND {ACTIVE_ROWS}
        ORDER BY
            requested_day
        "#
    )))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .bind(group_id)
    .bind(group_id)
    .fetch_all(ex)
    .await
}

/// Marks the request approved and clears any previous rejection.
pub async fn approve(
    ex: impl PgExecutor<'_>,
    vacation_id: Uuid,
    approver_id: Uuid,
) -> Result<Option<VacationRequest>, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, VacationRequest>(&sql(&format!(
        r#"
        UPDATE vacation
        SET
            approved_at = ?,
            approved_by = ?,
            rejected_at = NULL,
            rejected_by = NULL,
            updated_at = ?
        WHERE
            id = ?
            AND {ACTIVE_ROWS}
        RETURNING
            id,
            user_id,
            group_id,
            requested_day,
            start_time,
            end_time,
            vacation_type,
            approved_at,
            approved_by,
            rejected_at,
            rejected_by,
            created_at,
            updated_at,
            deleted_at
        "#
    )))
    .bind(now)
    .bind(approver_id)
    .bind(now)
    .bind(vacation_id)
    .fetch_optional(ex)
    .await
}

/// Marks the request rejected and clears any previous approval.
pub async fn reject(
    ex: impl PgExecutor<'_>,
    vacation_id: Uuid,
    rejecter_id: Uuid,
) -> Result<Option<VacationRequest>, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, VacationRequest>(&sql(&format!(
        r#"
        UPDATE vacation
        SET
            rejected_at = ?,
            rejected_by = ?,
            approved_at = NULL,
            approved_by = NULL,
            updated_at = ?
        WHERE
            id = ?
            AND {ACTIVE_ROWS}
        RETURNING
            id,
            user_id,
            group_id,
            requested_day,
            start_time,
            end_time,
            vacation_type,
            approved_at,
            approved_by,
            rejected_at,
            rejected_by,
            created_at,
            updated_at,
            deleted_at
        "#
    )))
    .bind(now)
    .bind(rejecter_id)
    .bind(now)
    .bind(vacation_id)
    .fetch_optional(ex)
    .await
}

pub async fn soft_delete(
    ex: impl PgExecutor<'_>,
    vacation_id: Uuid,
) -> Result<Option<VacationRequest>, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, VacationRequest>(&sql(&format!(
        r#"
        UPDATE vacation
        SET
            deleted_at = ?,
            updated_at = ?
        WHERE
            id = ?
            AND {ACTIVE_ROWS}
        RETURNING
            id,
            user_id,
            group_id,
            requested_day,
            start_time,
            end_time,
            vacation_type,
            approved_at,
            approved_by,
            rejected_at,
            rejected_by,
            created_at,
            updated_at,
            deleted_at
        "#
    )))
    .bind(now)
    .bind(now)
    .bind(vacation_id)
    .fetch_optional(ex)
    .await
}
