use actix_web::{
    HttpResponse, Result,
    web::{Data, Json, Path},
};
use uuid::Uuid;

use crate::{
    database::models::{IssueInviteInput, UpdateGroupUsersInput},
    error::AppError,
    handlers::shared,
    services::{AuthSession, GroupDirectory, InviteService},
};

const MAX_INVITE_EXPIRY_DAYS: i64 = 365;

/// Active members of a group.
pub async fn list_members(
    session: AuthSession,
    directory: Data<GroupDirectory>,
    path: Path<Uuid>,
) -> Result<HttpResponse> {
    let members = directory.group_members(&session, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(members))
}

/// Joins the calling user to the invite's group.
pub async fn redeem_code(
    session: AuthSession,
    invites: Data<InviteService>,
    path: Path<String>,
) -> Result<HttpResponse> {
    let membership = invites.redeem(&session, &path.into_inner()).await?;

    Ok(HttpResponse::Created().json(membership))
}

pub async fn update_members(
    session: AuthSession,
    directory: Data<GroupDirectory>,
    input: Json<UpdateGroupUsersInput>,
) -> Result<HttpResponse> {
    directory
        .update_member_permissions(&session, input.into_inner())
        .await?;

    Ok(shared::message("Group users updated successfully"))
}

pub async fn remove_member(
    session: AuthSession,
    directory: Data<GroupDirectory>,
    path: Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (group_id, user_id) = path.into_inner();
    directory.remove_member(&session, group_id, user_id).await?;

    Ok(shared::message("Group user removed"))
}

/// Issues a fresh invite code for the group. The body is optional; without
/// one the default expiry applies.
pub async fn issue_invite(
    session: AuthSession,
    invites: Data<InviteService>,
    path: Path<Uuid>,
    input: Option<Json<IssueInviteInput>>,
) -> Result<HttpResponse> {
    let input = input.map(Json::into_inner).unwrap_or_default();
    if let Some(days) = input.expires_in_days {
        if !(1..=MAX_INVITE_EXPIRY_DAYS).contains(&days) {
            return Err(AppError::validation([format!(
                "expiresInDays must be between 1 and {MAX_INVITE_EXPIRY_DAYS}"
            )])
            .into());
        }
    }

    let invite = invites.issue(&session, path.into_inner(), input).await?;

    Ok(HttpResponse::Created().json(invite))
}

pub async fn list_invites(
    session: AuthSession,
    invites: Data<InviteService>,
    path: Path<Uuid>,
) -> Result<HttpResponse> {
    let links = invites.list_for_group(&session, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(links))
}
