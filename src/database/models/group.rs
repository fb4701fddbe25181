use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lifecycle::SoftDelete;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    pub group_name: String,
    pub default_vacation_days: i32,
    pub default_home_office_days: i32,
    pub manager_user_id: Uuid,              // UUID for user references
    pub main_approval_user_id: Option<Uuid>,
    pub temp_approval_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,          // TIMESTAMPTZ
    pub updated_at: DateTime<Utc>,          // TIMESTAMPTZ
    pub deleted_at: Option<DateTime<Utc>>,  // TIMESTAMPTZ
}

impl SoftDelete for Group {
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupInput {
    pub group_name: String,
    pub default_vacation_days: Option<i32>,
    pub default_home_office_days: Option<i32>,
    pub main_approval_user_id: Option<Uuid>,
    pub temp_approval_user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApproversInput {
    pub main_approval_user_id: Option<Uuid>,
    pub temp_approval_user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuotaDefaultsInput {
    pub default_vacation_days: i32,
    pub default_home_office_days: i32,
}

/// Approver identities resolved against the user directory.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupApprovers {
    pub main_approval_user: Option<ApproverContact>,
    pub temp_approval_user: Option<ApproverContact>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproverContact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}
