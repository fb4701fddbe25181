use actix_web::{
    HttpResponse, Result,
    web::{Data, Path, Query},
};
use chrono::NaiveTime;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    handlers::shared,
    services::{AuthSession, ChangeAudit},
    utils::month_range,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangesQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub user_id: Option<Uuid>,
}

/// Audit trail for a group over one calendar month, oldest first.
pub async fn get_changes(
    session: AuthSession,
    audit: Data<ChangeAudit>,
    path: Path<Uuid>,
    query: Query<ChangesQuery>,
) -> Result<HttpResponse> {
    let (year, month) = shared::resolve_calendar_window(query.year, query.month)?;
    let (start, end) =
        month_range(year, month).ok_or_else(|| AppError::validation(["Invalid year or month"]))?;

    let records = audit
        .changes_for_group(
            &session,
            path.into_inner(),
            start.and_time(NaiveTime::MIN).and_utc(),
            end.and_time(NaiveTime::MIN).and_utc(),
            query.user_id,
        )
        .await?;

    Ok(HttpResponse::Ok().json(records))
}
