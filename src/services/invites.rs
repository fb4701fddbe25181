use chrono::{Duration, Utc};
use rand::{Rng, distr::Alphanumeric};
use uuid::Uuid;

use crate::{
    config::Config,
    database::{
        Database,
        models::{
            Capability, ChangeType, GroupMembership, InviteLink, IssueInviteInput,
            IssueInviteResponse,
        },
        repositories::{groups, invites, memberships},
    },
    error::AppError,
    services::{audit, auth::AuthSession},
};

const CODE_LENGTH: usize = 32;
const DEFAULT_EXPIRY_DAYS: i64 = 7;

/// Issues single-use invite codes and turns redeemed codes into controlled
/// memberships.
#[derive(Clone)]
pub struct InviteService {
    db: Database,
    config: Config,
}

impl InviteService {
    pub fn new(db: Database, config: Config) -> Self {
        Self { db, config }
    }

    fn generate_code() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(CODE_LENGTH)
            .map(char::from)
            .collect()
    }

    async fn require_admin(&self, group_id: Uuid, user_id: Uuid) -> Result<(), AppError> {
        groups::find_active(self.db.pool(), group_id)
            .await?
            .ok_or_else(|| AppError::not_found("Group not found"))?;

        let membership = memberships::find_active(self.db.pool(), group_id, user_id).await?;
        if !membership.is_some_and(|m| m.grants(Capability::Admin)) {
            return Err(AppError::forbidden("No permission for related group"));
        }

        Ok(())
    }

    pub async fn issue(
        &self,
        actor: &AuthSession,
        group_id: Uuid,
        input: IssueInviteInput,
    ) -> Result<IssueInviteResponse, AppError> {
        self.require_admin(group_id, actor.user_id).await?;

        let code = Self::generate_code();
        let expires_at =
            Utc::now() + Duration::days(input.expires_in_days.unwrap_or(DEFAULT_EXPIRY_DAYS));
        let actor_id = actor.user_id;

        let invite = self
            .db
            .transaction(|tx| {
                Box::pin(async move {
                    let invite = invites::insert(&mut **tx, group_id, &code, expires_at).await?;

                    audit::record(
                        tx,
                        group_id,
                        actor_id,
                        ChangeType::GroupUser,
                        "Invite link issued",
                        actor_id,
                    )
                    .await?;

                    Ok(invite)
                })
            })
            .await?;

        let invite_url = format!("{}/join/{}", self.config.client_base_url, invite.code);

        Ok(IssueInviteResponse {
            code: invite.code,
            invite_url,
            expires_at: invite.expires_at,
        })
    }

    /// Consumes the code and joins the caller to its group as a controlled
    /// member, all in one transaction. A spent or expired code is NotFound;
    /// redeeming into a group the caller already belongs to reports the
    /// existing membership.
    pub async fn redeem(
        &self,
        session: &AuthSession,
        code: &str,
    ) -> Result<GroupMembership, AppError> {
        let user_id = session.user_id;
        let email_confirmed_at = session.email_verified.then(Utc::now);
        let code = code.to_string();

        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let invite = invites::consume(&mut **tx, &code)
                        .await?
                        .ok_or_else(|| {
                            AppError::not_found("Invalid or expired validation code")
                        })?;

                    let membership = match memberships::insert(
                        &mut **tx,
                        invite.group_id,
                        user_id,
                        true,
                        false,
                        true,
                        email_confirmed_at,
                    )
                    .await?
                    {
                        Some(membership) => membership,
                        // Already an active member; the redemption still succeeds.
                        None => memberships::find_active(&mut **tx, invite.group_id, user_id)
                            .await?
                            .ok_or_else(|| AppError::internal("Failed to join group"))?,
                    };

                    audit::record(
                        tx,
                        invite.group_id,
                        user_id,
                        ChangeType::GroupUser,
                        "User joined group via invite",
                        user_id,
                    )
                    .await?;

                    Ok(membership)
                })
            })
            .await
    }

    pub async fn list_for_group(
        &self,
        actor: &AuthSession,
        group_id: Uuid,
    ) -> Result<Vec<InviteLink>, AppError> {
        self.require_admin(group_id, actor.user_id).await?;

        Ok(invites::list_for_group(self.db.pool(), group_id).await?)
    }
}
