use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InviteLink {
    pub id: Uuid,
    pub code: String,
    pub group_id: Uuid,
    pub used_at: Option<DateTime<Utc>>, // TIMESTAMPTZ
    pub expires_at: DateTime<Utc>,      // TIMESTAMPTZ
    pub created_at: DateTime<Utc>,      // TIMESTAMPTZ
    pub updated_at: DateTime<Utc>,      // TIMESTAMPTZ
}

impl InviteLink {
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueInviteInput {
    pub expires_in_days: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueInviteResponse {
    pub code: String,
    pub invite_url: String,
    pub expires_at: DateTime<Utc>, // TIMESTAMPTZ
}
