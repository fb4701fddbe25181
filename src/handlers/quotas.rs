use actix_web::{
    HttpResponse, Result,
    web::{Data, Json, Path, Query},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    database::models::{InitQuotasInput, SetQuotaInput},
    error::AppError,
    handlers::shared,
    services::{AuthSession, QuotaLedger},
    utils::{MAX_QUERY_YEAR, MIN_QUERY_YEAR},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaQuery {
    pub year: Option<i32>,
    pub user_id: Option<Uuid>,
}

pub async fn get_quotas(
    session: AuthSession,
    ledger: Data<QuotaLedger>,
    path: Path<Uuid>,
    query: Query<QuotaQuery>,
) -> Result<HttpResponse> {
    let year = shared::resolve_query_year(query.year)?;

    let balances = ledger
        .balances(&session, path.into_inner(), &year.to_string(), query.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(balances))
}

/// Seeds balance rows for the group's members; existing rows are untouched.
pub async fn init_quotas(
    session: AuthSession,
    ledger: Data<QuotaLedger>,
    path: Path<Uuid>,
    input: Json<InitQuotasInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    let related_year = resolve_related_year(input.related_year)?;

    let created = ledger
        .initialize(&session, path.into_inner(), related_year, input.entries)
        .await?;

    Ok(HttpResponse::Created().json(created))
}

pub async fn set_quota(
    session: AuthSession,
    ledger: Data<QuotaLedger>,
    path: Path<(Uuid, Uuid)>,
    input: Json<SetQuotaInput>,
) -> Result<HttpResponse> {
    let (group_id, quota_id) = path.into_inner();

    let updated = ledger
        .set_balances(&session, group_id, quota_id, input.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// The year a quota row belongs to, defaulting to the current one. Stored as
/// a 4-digit string, so the format is checked before it reaches the ledger.
fn resolve_related_year(related_year: Option<String>) -> Result<String, AppError> {
    let Some(raw) = related_year else {
        return Ok(shared::resolve_query_year(None)?.to_string());
    };

    let parsed = (raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()))
        .then(|| raw.parse::<i32>().ok())
        .flatten();
    match parsed {
        Some(year) if (MIN_QUERY_YEAR..=MAX_QUERY_YEAR).contains(&year) => Ok(raw),
        _ => Err(AppError::validation([format!(
            "relatedYear must be a 4-digit year between {MIN_QUERY_YEAR} and {MAX_QUERY_YEAR}"
        )])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepts_a_plain_year() {
        assert_eq!(
            resolve_related_year(Some("2025".to_string())).unwrap(),
            "2025"
        );
    }

    #[test]
    fn defaults_to_the_current_year() {
        let year = resolve_related_year(None).unwrap();
        assert_eq!(year.len(), 4);
    }

    #[test]
    fn rejects_malformed_years() {
        assert!(resolve_related_year(Some("25".to_string())).is_err());
        assert!(resolve_related_year(Some("202X".to_string())).is_err());
        assert!(resolve_related_year(Some("1999".to_string())).is_err());
    }
}
