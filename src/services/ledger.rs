use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::{
    database::{
        Database,
        models::{Capability, ChangeType, QuotaInitEntry, SetQuotaInput, UserYearQuota},
        repositories::{
            groups, memberships,
            quotas::{self, NewQuotaRow},
        },
    },
    error::AppError,
    services::{audit, auth::AuthSession},
};

/// Per-member yearly balance bookkeeping. Charging and restoring on vacation
/// decisions lives in the vacation lifecycle; this service covers the
/// admin-facing reads and writes.
#[derive(Clone)]
pub struct QuotaLedger {
    db: Database,
}

impl QuotaLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn require_capability(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        capability: Capability,
    ) -> Result<(), AppError> {
        let membership = memberships::find_active(self.db.pool(), group_id, user_id).await?;
        if !membership.is_some_and(|m| m.grants(capability)) {
            return Err(AppError::forbidden("No permission for related group"));
        }

        Ok(())
    }

    pub async fn balances(
        &self,
        actor: &AuthSession,
        group_id: Uuid,
        related_year: &str,
        user_filter: Option<Uuid>,
    ) -> Result<Vec<UserYearQuota>, AppError> {
        self.require_capability(group_id, actor.user_id, Capability::View)
            .await?;

        Ok(quotas::list(self.db.pool(), group_id, related_year, user_filter).await?)
    }

    /// Seeds one quota row per entry for the given year. Members that already
    /// have a row for that year keep it untouched; the returned rows are the
    /// ones actually created.
    pub async fn initialize(
        &self,
        actor: &AuthSession,
        group_id: Uuid,
        related_year: String,
        entries: Vec<QuotaInitEntry>,
    ) -> Result<Vec<UserYearQuota>, AppError> {
        self.require_capability(group_id, actor.user_id, Capability::Admin)
            .await?;

        let group = groups::find_active(self.db.pool(), group_id)
            .await?
            .ok_or_else(|| AppError::not_found("Group not found"))?;

        let default_vacation = BigDecimal::from(group.default_vacation_days);
        let default_home_office = BigDecimal::from(group.default_home_office_days);
        let rows: Vec<NewQuotaRow> = entries
            .into_iter()
            .map(|entry| NewQuotaRow {
                user_id: entry.user_id,
                vacation_days: entry
                    .vacation_days
                    .unwrap_or_else(|| default_vacation.clone()),
                home_office_days: entry
                    .home_office_days
                    .unwrap_or_else(|| default_home_office.clone()),
            })
            .collect();
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let actor_id = actor.user_id;

        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let inserted =
                        quotas::insert_many(&mut **tx, group_id, &related_year, &rows).await?;

                    let detail = format!(
                        "Quotas initialized for {} of {} members for {}",
                        inserted.len(),
                        rows.len(),
                        related_year
                    );
                    audit::record(
                        tx,
                        group_id,
                        actor_id,
                        ChangeType::UserYearQuotas,
                        detail,
                        actor_id,
                    )
                    .await?;

                    Ok(inserted)
                })
            })
            .await
    }

    pub async fn set_balances(
        &self,
        actor: &AuthSession,
        group_id: Uuid,
        quota_id: Uuid,
        input: SetQuotaInput,
    ) -> Result<UserYearQuota, AppError> {
        self.require_capability(group_id, actor.user_id, Capability::Admin)
            .await?;

        let actor_id = actor.user_id;

        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let updated = quotas::set_by_id(
                        &mut **tx,
                        quota_id,
                        group_id,
                        &input.vacation_days,
                        &input.home_office_days,
                    )
                    .await?
                    .ok_or_else(|| AppError::not_found("Quota not found"))?;

                    let detail = format!(
                        "Balances set to {} vacation / {} home office for {}",
                        updated.vacation_days, updated.home_office_days, updated.related_year
                    );
                    audit::record(
                        tx,
                        group_id,
                        updated.user_id,
                        ChangeType::UserYearQuotas,
                        detail,
                        actor_id,
                    )
                    .await?;

                    Ok(updated)
                })
            })
            .await
    }
}
