use std::sync::Arc;

use bigdecimal::{BigDecimal, num_bigint::BigInt};
use chrono::{Datelike, Duration, NaiveTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    database::{
        Database,
        models::{ChangeType, CreateVacationInput, Group, VacationRequest, VacationType},
        repositories::{groups, memberships, quotas, vacations},
    },
    error::AppError,
    services::{audit, auth::AuthSession, directory, notifier::ApproverNotifier},
    utils::month_range,
};

/// Filing, deciding and withdrawing vacation requests, with the yearly
/// balances kept in step inside the same transaction as the decision.
#[derive(Clone)]
pub struct VacationLifecycle {
    db: Database,
    notifier: Arc<dyn ApproverNotifier>,
}

impl VacationLifecycle {
    pub fn new(db: Database, notifier: Arc<dyn ApproverNotifier>) -> Self {
        Self { db, notifier }
    }

    /// Files a request for the calling user. Only controlled members of the
    /// target group may file; one active request per user and day.
    pub async fn file_request(
        &self,
        actor: &AuthSession,
        input: CreateVacationInput,
    ) -> Result<VacationRequest, AppError> {
        let user_id = actor.user_id;
        let group_id = input.group_id;
        let requested_day = input.requested_day;
        let start_time = input.start_time;
        let end_time = input.end_time;
        let vacation_type = input.vacation_type.unwrap_or_default();

        let request = self
            .db
            .transaction(|tx| {
                Box::pin(async move {
                    let membership =
                        memberships::find_active(&mut **tx, group_id, user_id).await?;
                    match membership {
                        Some(m) if m.controlled_user => {}
                        _ => return Err(AppError::forbidden("No access for related group")),
                    }

                    let request = vacations::insert(
                        &mut **tx,
                        user_id,
                        group_id,
                        requested_day,
                        start_time,
                        end_time,
                        vacation_type,
                    )
                    .await?
                    .ok_or_else(|| AppError::internal("Failed to create vacation"))?;

                    audit::record(
                        tx,
                        group_id,
                        user_id,
                        ChangeType::Vacation,
                        format!("Vacation requested for {}", request.requested_day),
                        user_id,
                    )
                    .await?;

                    Ok(request)
                })
            })
            .await?;

        self.notify_approvers(&request);

        Ok(request)
    }

    /// Approves the request and charges the owner's balance, unless it was
    /// already approved. Only the group's approvers may decide.
    pub async fn approve(
        &self,
        actor: &AuthSession,
        vacation_id: Uuid,
    ) -> Result<VacationRequest, AppError> {
        let actor_id = actor.user_id;

        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let (request, group) = locked_request(tx, vacation_id).await?;
                    require_approver(&group, actor_id, "You are not allowed to approve this vacation")?;

                    let was_approved = request.is_approved();
                    let approved = vacations::approve(&mut **tx, vacation_id, actor_id)
                        .await?
                        .ok_or_else(|| AppError::not_found("Vacation not found"))?;

                    if !was_approved {
                        charge_quota(tx, &approved, &group, actor_id).await?;
                    }

                    audit::record(
                        tx,
                        approved.group_id,
                        approved.user_id,
                        ChangeType::Vacation,
                        format!("Vacation for {} approved", approved.requested_day),
                        actor_id,
                    )
                    .await?;

                    Ok(approved)
                })
            })
            .await
    }

    /// Rejects the request; a previously approved one has its charge
    /// restored.
    pub async fn reject(
        &self,
        actor: &AuthSession,
        vacation_id: Uuid,
    ) -> Result<VacationRequest, AppError> {
        let actor_id = actor.user_id;

        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let (request, group) = locked_request(tx, vacation_id).await?;
                    require_approver(&group, actor_id, "You are not allowed to approve this vacation")?;

                    let was_approved = request.is_approved();
                    let rejected = vacations::reject(&mut **tx, vacation_id, actor_id)
                        .await?
                        .ok_or_else(|| AppError::not_found("Vacation not found"))?;

                    if was_approved {
                        restore_quota(tx, &rejected, &group, actor_id).await?;
                    }

                    audit::record(
                        tx,
                        rejected.group_id,
                        rejected.user_id,
                        ChangeType::Vacation,
                        format!("Vacation for {} rejected", rejected.requested_day),
                        actor_id,
                    )
                    .await?;

                    Ok(rejected)
                })
            })
            .await
    }

    /// Withdraws the request. The owner and the group's approvers may delete;
    /// an approved request hands its charge back first.
    pub async fn soft_delete(
        &self,
        actor: &AuthSession,
        vacation_id: Uuid,
    ) -> Result<(), AppError> {
        let actor_id = actor.user_id;

        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let (request, group) = locked_request(tx, vacation_id).await?;

                    let is_owner = request.user_id == actor_id;
                    if !is_owner && !is_approver(&group, actor_id) {
                        return Err(AppError::forbidden(
                            "You are not allowed to delete this vacation",
                        ));
                    }

                    let was_approved = request.is_approved();
                    let deleted = vacations::soft_delete(&mut **tx, vacation_id)
                        .await?
                        .ok_or_else(|| AppError::not_found("Vacation not found"))?;

                    if was_approved {
                        restore_quota(tx, &deleted, &group, actor_id).await?;
                    }

                    audit::record(
                        tx,
                        deleted.group_id,
                        deleted.user_id,
                        ChangeType::Vacation,
                        format!("Vacation for {} deleted", deleted.requested_day),
                        actor_id,
                    )
                    .await?;

                    Ok(())
                })
            })
            .await
    }

    /// The calling user's active requests within one calendar month,
    /// optionally narrowed to a single group.
    pub async fn list_for_user(
        &self,
        actor: &AuthSession,
        year: i32,
        month: u32,
        group_filter: Option<Uuid>,
    ) -> Result<Vec<VacationRequest>, AppError> {
        let (start, end) = month_range(year, month)
            .ok_or_else(|| AppError::validation(["Invalid year or month"]))?;

        Ok(
            vacations::list_for_user(self.db.pool(), actor.user_id, start, end, group_filter)
                .await?,
        )
    }

    /// Fire-and-forget approver notification; the filed request never fails
    /// because delivery did.
    fn notify_approvers(&self, request: &VacationRequest) {
        let db = self.db.clone();
        let notifier = Arc::clone(&self.notifier);
        let request = request.clone();

        tokio::spawn(async move {
            let approvers = match directory::resolve_approvers(&db, request.group_id).await {
                Ok(Some(approvers)) => approvers,
                Ok(None) => return,
                Err(err) => {
                    log::warn!("skipping approver notification: {}", err.log_detail());
                    return;
                }
            };

            if let Err(err) = notifier.request_filed(&request, &approvers).await {
                log::warn!("approver notification failed: {err:#}");
            }
        });
    }
}

/// Loads the request under a row lock together with its group, so concurrent
/// decisions on the same request serialize.
async fn locked_request(
    tx: &mut Transaction<'_, Postgres>,
    vacation_id: Uuid,
) -> Result<(VacationRequest, Group), AppError> {
    let request = vacations::find_active_for_update(&mut **tx, vacation_id)
        .await?
        .ok_or_else(|| AppError::not_found("Vacation not found"))?;

    let group = groups::find_active(&mut **tx, request.group_id)
        .await?
        .ok_or_else(|| AppError::not_found("Not able to verify approvers"))?;

    Ok((request, group))
}

fn is_approver(group: &Group, user_id: Uuid) -> bool {
    Some(user_id) == group.main_approval_user_id || Some(user_id) == group.temp_approval_user_id
}

fn require_approver(group: &Group, user_id: Uuid, denial: &str) -> Result<(), AppError> {
    if is_approver(group, user_id) {
        Ok(())
    } else {
        Err(AppError::forbidden(denial))
    }
}

/// How much a request draws from the yearly balances, or None for request
/// types that are tracked but never metered.
fn quota_charge(
    vacation_type: VacationType,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
) -> Option<(BigDecimal, BigDecimal)> {
    let days = charged_days(start_time, end_time);

    match vacation_type {
        VacationType::Vacation | VacationType::PaidTimeOff => Some((days, BigDecimal::from(0))),
        VacationType::HomeOffice => Some((BigDecimal::from(0), days)),
        _ => None,
    }
}

/// A request spanning at most four hours counts as half a day; everything
/// else, including requests without times, counts as a full day.
fn charged_days(start_time: Option<NaiveTime>, end_time: Option<NaiveTime>) -> BigDecimal {
    if let (Some(start), Some(end)) = (start_time, end_time) {
        let span = end - start;
        if span > Duration::zero() && span <= Duration::hours(4) {
            return BigDecimal::new(BigInt::from(5), 1);
        }
    }

    BigDecimal::from(1)
}

async fn charge_quota(
    tx: &mut Transaction<'_, Postgres>,
    request: &VacationRequest,
    group: &Group,
    actor_id: Uuid,
) -> Result<(), AppError> {
    let Some((vacation_delta, home_office_delta)) =
        quota_charge(request.vacation_type, request.start_time, request.end_time)
    else {
        return Ok(());
    };

    let related_year = request.requested_day.year().to_string();

    quotas::ensure(
        &mut **tx,
        request.user_id,
        request.group_id,
        &related_year,
        &BigDecimal::from(group.default_vacation_days),
        &BigDecimal::from(group.default_home_office_days),
    )
    .await?;

    let updated = quotas::apply_delta(
        &mut **tx,
        request.user_id,
        request.group_id,
        &related_year,
        &vacation_delta,
        &home_office_delta,
    )
    .await?
    .ok_or_else(|| AppError::internal("Failed to update quota balance"))?;

    audit::record(
        tx,
        request.group_id,
        request.user_id,
        ChangeType::UserYearQuotas,
        format!(
            "Balance charged {} vacation / {} home office, {} vacation / {} home office left",
            vacation_delta, home_office_delta, updated.vacation_days, updated.home_office_days
        ),
        actor_id,
    )
    .await?;

    Ok(())
}

async fn restore_quota(
    tx: &mut Transaction<'_, Postgres>,
    request: &VacationRequest,
    group: &Group,
    actor_id: Uuid,
) -> Result<(), AppError> {
    let Some((vacation_delta, home_office_delta)) =
        quota_charge(request.vacation_type, request.start_time, request.end_time)
    else {
        return Ok(());
    };

    quotas::ensure(
        &mut **tx,
        request.user_id,
        request.group_id,
        &request.requested_day.year().to_string(),
        &BigDecimal::from(group.default_vacation_days),
        &BigDecimal::from(group.default_home_office_days),
    )
    .await?;

    let updated = quotas::apply_delta(
        &mut **tx,
        request.user_id,
        request.group_id,
        &request.requested_day.year().to_string(),
        &(-&vacation_delta),
        &(-&home_office_delta),
    )
    .await?
    .ok_or_else(|| AppError::internal("Failed to update quota balance"))?;

    audit::record(
        tx,
        request.group_id,
        request.user_id,
        ChangeType::UserYearQuotas,
        format!(
            "Balance restored {} vacation / {} home office, {} vacation / {} home office left",
            vacation_delta, home_office_delta, updated.vacation_days, updated.home_office_days
        ),
        actor_id,
    )
    .await?;

    Ok(())
}
