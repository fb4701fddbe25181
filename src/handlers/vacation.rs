use actix_web::{
    HttpResponse, Result,
    web::{Data, Json, Path, Query},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    database::models::CreateVacationInput,
    error::AppError,
    handlers::shared,
    services::{AuthSession, VacationLifecycle},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub group_id: Option<String>,
}

/// The calling user's requests for one calendar month.
pub async fn list_vacations(
    session: AuthSession,
    lifecycle: Data<VacationLifecycle>,
    query: Query<VacationQuery>,
) -> Result<HttpResponse> {
    let (year, month) = shared::resolve_calendar_window(query.year, query.month)?;
    // A group filter that is not a UUID counts as absent.
    let group_filter = query
        .group_id
        .as_deref()
        .and_then(|raw| raw.parse::<Uuid>().ok());

    let requests = lifecycle
        .list_for_user(&session, year, month, group_filter)
        .await?;

    Ok(HttpResponse::Ok().json(requests))
}

pub async fn create_vacation(
    session: AuthSession,
    lifecycle: Data<VacationLifecycle>,
    input: Json<CreateVacationInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();
    validate_times(&input)?;

    let request = lifecycle.file_request(&session, input).await?;

    Ok(HttpResponse::Created().json(request))
}

pub async fn approve_vacation(
    session: AuthSession,
    lifecycle: Data<VacationLifecycle>,
    path: Path<Uuid>,
) -> Result<HttpResponse> {
    lifecycle.approve(&session, path.into_inner()).await?;

    Ok(shared::message("Vacation approved"))
}

pub async fn reject_vacation(
    session: AuthSession,
    lifecycle: Data<VacationLifecycle>,
    path: Path<Uuid>,
) -> Result<HttpResponse> {
    lifecycle.reject(&session, path.into_inner()).await?;

    Ok(shared::message("Vacation rejected"))
}

pub async fn delete_vacation(
    session: AuthSession,
    lifecycle: Data<VacationLifecycle>,
    path: Path<Uuid>,
) -> Result<HttpResponse> {
    lifecycle.soft_delete(&session, path.into_inner()).await?;

    Ok(shared::message("Vacation deleted"))
}

fn validate_times(input: &CreateVacationInput) -> Result<(), AppError> {
    match (input.start_time, input.end_time) {
        (None, None) => Ok(()),
        (Some(start), Some(end)) if start >= end => Err(AppError::validation([
            "startTime must be before endTime",
        ])),
        (Some(_), Some(_)) => Ok(()),
        _ => Err(AppError::validation([
            "startTime and endTime must be given together",
        ])),
    }
}
