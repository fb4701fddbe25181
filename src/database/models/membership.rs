use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lifecycle::SoftDelete;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembership {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub view_access: bool,
    pub admin_access: bool,
    pub controlled_user: bool,
    pub email_confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,         // TIMESTAMPTZ
    pub updated_at: DateTime<Utc>,         // TIMESTAMPTZ
    pub deleted_at: Option<DateTime<Utc>>, // TIMESTAMPTZ
}

impl SoftDelete for GroupMembership {
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

/// What a member may do inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    View,
    Admin,
    Controlled,
}

impl GroupMembership {
    pub fn grants(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.view_access,
            Capability::Admin => self.admin_access,
            Capability::Controlled => self.controlled_user,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPermissionsInput {
    pub user_id: Uuid,
    pub view_access: bool,
    pub admin_access: bool,
    pub controlled_user: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupUsersInput {
    pub group_id: Uuid,
    pub data: Vec<MemberPermissionsInput>,
}
