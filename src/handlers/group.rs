use actix_web::{
    HttpResponse, Result,
    web::{Data, Json, Path},
};
use uuid::Uuid;

use crate::{
    database::models::{CreateGroupInput, UpdateApproversInput, UpdateQuotaDefaultsInput},
    error::AppError,
    handlers::shared,
    services::{AuthSession, GroupDirectory},
};

const MAX_DEFAULT_DAYS: i32 = 99;

pub async fn create_group(
    session: AuthSession,
    directory: Data<GroupDirectory>,
    input: Json<CreateGroupInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    validate_create(&input)?;

    let group = directory.create_group(&session, input).await?;

    Ok(HttpResponse::Created().json(group))
}

/// Groups the calling user is an active member of.
pub async fn list_groups(
    session: AuthSession,
    directory: Data<GroupDirectory>,
) -> Result<HttpResponse> {
    let groups = directory.list_groups_for(session.user_id).await?;

    Ok(HttpResponse::Ok().json(groups))
}

pub async fn get_approvers(
    session: AuthSession,
    directory: Data<GroupDirectory>,
    path: Path<Uuid>,
) -> Result<HttpResponse> {
    let approvers = directory.approvers(&session, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(approvers))
}

pub async fn update_approvers(
    session: AuthSession,
    directory: Data<GroupDirectory>,
    path: Path<Uuid>,
    input: Json<UpdateApproversInput>,
) -> Result<HttpResponse> {
    let group = directory
        .update_approvers(&session, path.into_inner(), input.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(group))
}

pub async fn update_quota_defaults(
    session: AuthSession,
    directory: Data<GroupDirectory>,
    path: Path<Uuid>,
    input: Json<UpdateQuotaDefaultsInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();

    let mut errors = Vec::new();
    check_day_default(&mut errors, "defaultVacationDays", input.default_vacation_days);
    check_day_default(
        &mut errors,
        "defaultHomeOfficeDays",
        input.default_home_office_days,
    );
    if !errors.is_empty() {
        return Err(AppError::validation(errors).into());
    }

    let group = directory
        .update_quota_defaults(&session, path.into_inner(), input)
        .await?;

    Ok(HttpResponse::Ok().json(group))
}

pub async fn delete_group(
    session: AuthSession,
    directory: Data<GroupDirectory>,
    path: Path<Uuid>,
) -> Result<HttpResponse> {
    directory
        .soft_delete_group(&session, path.into_inner())
        .await?;

    Ok(shared::message("Group deleted"))
}

fn validate_create(input: &CreateGroupInput) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if input.group_name.trim().is_empty() {
        errors.push("groupName must not be empty".to_string());
    }
    if let Some(days) = input.default_vacation_days {
        check_day_default(&mut errors, "defaultVacationDays", days);
    }
    if let Some(days) = input.default_home_office_days {
        check_day_default(&mut errors, "defaultHomeOfficeDays", days);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(errors))
    }
}

fn check_day_default(errors: &mut Vec<String>, field: &str, value: i32) {
    if !(0..=MAX_DEFAULT_DAYS).contains(&value) {
        errors.push(format!("{field} must be between 0 and {MAX_DEFAULT_DAYS}"));
    }
}
