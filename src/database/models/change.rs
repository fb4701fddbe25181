use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

/// Append-only audit record. `user_id` is the member the change concerns,
/// `changing_user_id` the actor who made it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub change_type: ChangeType,
    pub change_detail: Option<String>,
    pub changing_user_id: Uuid,
    pub created_at: DateTime<Utc>, // TIMESTAMPTZ
    pub updated_at: DateTime<Utc>, // TIMESTAMPTZ
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum ChangeType {
        Group => "GROUP",
        GroupUser => "GROUP_USER",
        Vacation => "VACATION",
        UserYearQuotas => "USER_YEAR_QUOTAS",
    }
}
