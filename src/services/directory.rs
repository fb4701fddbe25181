use uuid::Uuid;

use crate::{
    database::{
        Database,
        models::{
            ApproverContact, Capability, ChangeType, CreateGroupInput, Group, GroupApprovers,
            GroupMembership, UpdateApproversInput, UpdateGroupUsersInput,
            UpdateQuotaDefaultsInput,
        },
        repositories::{groups, memberships, users},
    },
    error::AppError,
    services::{audit, auth::AuthSession},
};

/// Groups, memberships and the permission checks everything else gates on.
#[derive(Clone)]
pub struct GroupDirectory {
    db: Database,
}

impl GroupDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn membership(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupMembership>, AppError> {
        Ok(memberships::find_active(self.db.pool(), group_id, user_id).await?)
    }

    pub async fn has_permission(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        capability: Capability,
    ) -> Result<bool, AppError> {
        Ok(self
            .membership(group_id, user_id)
            .await?
            .is_some_and(|m| m.grants(capability)))
    }

    /// The caller's membership if it holds the capability, otherwise
    /// Forbidden with the route's denial message.
    pub async fn require_permission(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        capability: Capability,
        denial: &str,
    ) -> Result<GroupMembership, AppError> {
        match self.membership(group_id, user_id).await? {
            Some(membership) if membership.grants(capability) => Ok(membership),
            _ => Err(AppError::forbidden(denial)),
        }
    }

    /// Creates the group and its manager's membership in one transaction.
    /// The manager becomes the main approver unless the input names one.
    pub async fn create_group(
        &self,
        actor: &AuthSession,
        input: CreateGroupInput,
    ) -> Result<Group, AppError> {
        let manager_id = actor.user_id;

        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let group = groups::insert(
                        &mut **tx,
                        &input.group_name,
                        input.default_vacation_days.unwrap_or(20),
                        input.default_home_office_days.unwrap_or(0),
                        manager_id,
                        input.main_approval_user_id.or(Some(manager_id)),
                        input.temp_approval_user_id,
                    )
                    .await?;

                    memberships::insert(&mut **tx, group.id, manager_id, true, true, false, None)
                        .await?
                        .ok_or_else(|| AppError::internal("Failed to create group"))?;

                    audit::record(
                        tx,
                        group.id,
                        manager_id,
                        ChangeType::Group,
                        format!("Group '{}' created", group.group_name),
                        manager_id,
                    )
                    .await?;

                    Ok(group)
                })
            })
            .await
    }

    /// Active groups the user holds an active membership in.
    pub async fn list_groups_for(&self, user_id: Uuid) -> Result<Vec<Group>, AppError> {
        let group_ids = memberships::group_ids_for_user(self.db.pool(), user_id).await?;
        if group_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(groups::find_all_active(self.db.pool(), &group_ids).await?)
    }

    pub async fn group_members(
        &self,
        actor: &AuthSession,
        group_id: Uuid,
    ) -> Result<Vec<GroupMembership>, AppError> {
        self.require_permission(
            group_id,
            actor.user_id,
            Capability::View,
            "No permission for related group",
        )
        .await?;

        Ok(memberships::list_for_group(self.db.pool(), group_id).await?)
    }

    pub async fn update_member_permissions(
        &self,
        actor: &AuthSession,
        input: UpdateGroupUsersInput,
    ) -> Result<(), AppError> {
        self.require_permission(
            input.group_id,
            actor.user_id,
            Capability::Admin,
            "No permission for related group",
        )
        .await?;

        let actor_id = actor.user_id;

        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    for entry in &input.data {
                        let updated = memberships::update_permissions(
                            &mut **tx,
                            input.group_id,
                            entry.user_id,
                            entry.view_access,
                            entry.admin_access,
                            entry.controlled_user,
                        )
                        .await?
                        .ok_or_else(|| AppError::not_found("Group user not found"))?;

                        audit::record(
                            tx,
                            input.group_id,
                            entry.user_id,
                            ChangeType::GroupUser,
                            format!(
                                "Permissions updated: view={}, admin={}, controlled={}",
                                updated.view_access, updated.admin_access, updated.controlled_user
                            ),
                            actor_id,
                        )
                        .await?;
                    }

                    Ok(())
                })
            })
            .await
    }

    pub async fn remove_member(
        &self,
        actor: &AuthSession,
        group_id: Uuid,
        member_id: Uuid,
    ) -> Result<(), AppError> {
        self.require_permission(
            group_id,
            actor.user_id,
            Capability::Admin,
            "No permission for related group",
        )
        .await?;

        let actor_id = actor.user_id;

        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    memberships::soft_delete(&mut **tx, group_id, member_id)
                        .await?
                        .ok_or_else(|| AppError::not_found("Group user not found"))?;

                    audit::record(
                        tx,
                        group_id,
                        member_id,
                        ChangeType::GroupUser,
                        "Group user removed",
                        actor_id,
                    )
                    .await?;

                    Ok(())
                })
            })
            .await
    }

    pub async fn update_approvers(
        &self,
        actor: &AuthSession,
        group_id: Uuid,
        input: UpdateApproversInput,
    ) -> Result<Group, AppError> {
        self.require_permission(
            group_id,
            actor.user_id,
            Capability::Admin,
            "No permission for related group",
        )
        .await?;

        let actor_id = actor.user_id;

        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let group = groups::update_approvers(
                        &mut **tx,
                        group_id,
                        input.main_approval_user_id,
                        input.temp_approval_user_id,
                    )
                    .await?
                    .ok_or_else(|| AppError::not_found("Group not found"))?;

                    audit::record(
                        tx,
                        group_id,
                        actor_id,
                        ChangeType::Group,
                        "Group approvers updated",
                        actor_id,
                    )
                    .await?;

                    Ok(group)
                })
            })
            .await
    }

    pub async fn update_quota_defaults(
        &self,
        actor: &AuthSession,
        group_id: Uuid,
        input: UpdateQuotaDefaultsInput,
    ) -> Result<Group, AppError> {
        self.require_permission(
            group_id,
            actor.user_id,
            Capability::Admin,
            "No permission for related group",
        )
        .await?;

        let actor_id = actor.user_id;

        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let group = groups::update_quota_defaults(
                        &mut **tx,
                        group_id,
                        input.default_vacation_days,
                        input.default_home_office_days,
                    )
                    .await?
                    .ok_or_else(|| AppError::not_found("Group not found"))?;

                    audit::record(
                        tx,
                        group_id,
                        actor_id,
                        ChangeType::Group,
                        format!(
                            "Default quotas set to {} vacation / {} home office",
                            group.default_vacation_days, group.default_home_office_days
                        ),
                        actor_id,
                    )
                    .await?;

                    Ok(group)
                })
            })
            .await
    }

    /// Deleting a group is reserved for its manager.
    pub async fn soft_delete_group(
        &self,
        actor: &AuthSession,
        group_id: Uuid,
    ) -> Result<(), AppError> {
        let group = groups::find_active(self.db.pool(), group_id)
            .await?
            .ok_or_else(|| AppError::not_found("Group not found"))?;

        if group.manager_user_id != actor.user_id {
            return Err(AppError::forbidden(
                "Only the group manager may delete the group",
            ));
        }

        let actor_id = actor.user_id;

        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    groups::soft_delete(&mut **tx, group_id)
                        .await?
                        .ok_or_else(|| AppError::not_found("Group not found"))?;

                    audit::record(
                        tx,
                        group_id,
                        actor_id,
                        ChangeType::Group,
                        "Group deleted",
                        actor_id,
                    )
                    .await?;

                    Ok(())
                })
            })
            .await
    }

    pub async fn approvers(
        &self,
        actor: &AuthSession,
        group_id: Uuid,
    ) -> Result<GroupApprovers, AppError> {
        self.require_permission(
            group_id,
            actor.user_id,
            Capability::View,
            "No permission for related group",
        )
        .await?;

        resolve_approvers(&self.db, group_id)
            .await?
            .ok_or_else(|| AppError::not_found("Not able to verify approvers"))
    }
}

/// The group's approver contacts resolved against the identity directory;
/// None when the group itself is gone or deleted.
pub async fn resolve_approvers(
    db: &Database,
    group_id: Uuid,
) -> Result<Option<GroupApprovers>, AppError> {
    let Some(group) = groups::find_active(db.pool(), group_id).await? else {
        return Ok(None);
    };

    let main_approval_user = contact_for(db, group.main_approval_user_id).await?;
    let temp_approval_user = contact_for(db, group.temp_approval_user_id).await?;

    Ok(Some(GroupApprovers {
        main_approval_user,
        temp_approval_user,
    }))
}

async fn contact_for(
    db: &Database,
    user_id: Option<Uuid>,
) -> Result<Option<ApproverContact>, AppError> {
    let Some(user_id) = user_id else {
        return Ok(None);
    };

    Ok(users::find(db.pool(), user_id).await?.map(|user| ApproverContact {
        id: user.id,
        name: user.name,
        email: user.email,
    }))
}
