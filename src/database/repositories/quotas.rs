use bigdecimal::BigDecimal;
use chrono::Utc;
use sqlx::{PgExecutor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::{models::UserYearQuota, utils::sql};

/// Balance row keyed by (user, group, year) waiting to be inserted.
#[derive(Debug, Clone)]
pub struct NewQuotaRow {
    pub user_id: Uuid,
    pub vacation_days: BigDecimal,
    pub home_office_days: BigDecimal,
}

pub async fn list(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
    related_year: &str,
    user_id: Option<Uuid>,
) -> Result<Vec<UserYearQuota>, sqlx::Error> {
    sqlx::query_as::<_, UserYearQuota>(&sql(r#"
        SELECT
            id,
            user_id,
            group_id,
            related_year,
            vacation_days,
            home_office_days,
            created_at,
            updated_at
        FROM
            user_year_quotas
        WHERE
            group_id = ?
            AND related_year = ?
            AND (?::uuid IS NULL OR user_id = ?)
        ORDER BY
            user_id
    "#))
    .bind(group_id)
    .bind(related_year)
    .bind(user_id)
    .bind(user_id)
    .fetch_all(ex)
    .await
}

/// Creates the balance row from the group defaults unless it already exists.
pub async fn ensure(
    ex: impl PgExecutor<'_>,
    user_id: Uuid,
    group_id: Uuid,
    related_year: &str,
    default_vacation_days: &BigDecimal,
    default_home_office_days: &BigDecimal,
) -> Result<(), sqlx::Error> {
    let now = Utc::now();

    sqlx::query(&sql(r#"
        INSERT INTO
            user_year_quotas (
                id,
                user_id,
                group_id,
                related_year,
                vacation_days,
                home_office_days,
                created_at,
                updated_at
            )
        VALUES
            (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (user_id, group_id, related_year)
        DO NOTHING
    "#))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(group_id)
    .bind(related_year)
    .bind(default_vacation_days)
    .bind(default_home_office_days)
    .bind(now)
    .bind(now)
    .execute(ex)
    .await?;

    Ok(())
}

/// Subtracts the deltas from the row's balances. Charging passes positive
/// deltas; restoring passes the negated ones.
pub async fn apply_delta(
    ex: impl PgExecutor<'_>,
    user_id: Uuid,
    group_id: Uuid,
    related_year: &str,
    vacation_delta: &BigDecimal,
    home_office_delta: &BigDecimal,
) -> Result<Option<UserYearQuota>, sqlx::Error> {
    sqlx::query_as::<_, UserYearQuota>(&sql(r#"
        UPDATE user_year_quotas
        SET
            vacation_days = vacation_days - ?,
            home_office_days = home_office_days - ?,
            updated_at = ?
        WHERE
            user_id = ?
            AND group_id = ?
            AND related_year = ?
        RETURNING
            id,
            user_id,
            group_id,
            related_year,
            vacation_days,
            home_office_days,
            created_at,
            updated_at
    "#))
    .bind(vacation_delta)
    .bind(home_office_delta)
    .bind(Utc::now())
    .bind(user_id)
    .bind(group_id)
    .bind(related_year)
    .fetch_optional(ex)
    .await
}

/// Bulk-creates balance rows for a group and year; rows that already exist
/// are left untouched and omitted from the result.
pub async fn insert_many(
    ex: impl PgExecutor<'_>,
    group_id: Uuid,
    related_year: &str,
    rows: &[NewQuotaRow],
) -> Result<Vec<UserYearQuota>, sqlx::Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let now = Utc::now();
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        "INSERT INTO user_year_quotas \
         (id, user_id, group_id, related_year, vacation_days, home_office_days, created_at, updated_at) ",
    );

    builder.push_values(rows, |mut b, row| {
        b.push_bind(Uuid::new_v4())
            .push_bind(row.user_id)
            .push_bind(group_id)
            .push_bind(related_year)
            .push_bind(&row.vacation_days)
            .push_bind(&row.home_office_days)
            .push_bind(now)
            .push_bind(now);
    });

    builder.push(
        " ON CONFLICT (user_id, group_id, related_year) DO NOTHING \
         RETURNING id, user_id, group_id, related_year, vacation_days, home_office_days, created_at, updated_at",
    );

    builder
        .build_query_as::<UserYearQuota>()
        .fetch_all(ex)
        .await
}

/// Absolute overwrite of one row's balances, scoped to its group.
pub async fn set_by_id(
    ex: impl PgExecutor<'_>,
    quota_id: Uuid,
    group_id: Uuid,
    vacation_days: &BigDecimal,
    home_office_days: &BigDecimal,
) -> Result<Option<UserYearQuota>, sqlx::Error> {
    sqlx::query_as::<_, UserYearQuota>(&sql(r#"
        UPDATE user_year_quotas
        SET
            vacation_days = ?,
            home_office_days = ?,
            updated_at = ?
        WHERE
            id = ?
            AND group_id = ?
        RETURNING
            id,
            user_id,
            group_id,
            related_year,
            vacation_days,
            home_office_days,
            created_at,
            updated_at
    "#))
    .bind(vacation_days)
    .bind(home_office_days)
    .bind(Utc::now())
    .bind(quota_id)
    .bind(group_id)
    .fetch_optional(ex)
    .await
}
