use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    database::{
        Database,
        models::{Capability, ChangeRecord, ChangeType},
        repositories::{changes, memberships},
    },
    error::AppError,
    services::auth::AuthSession,
};

/// Appends an audit record inside the caller's transaction. A failure here
/// rolls the surrounding mutation back with it.
pub async fn record(
    tx: &mut Transaction<'_, Postgres>,
    group_id: Uuid,
    user_id: Uuid,
    change_type: ChangeType,
    detail: impl Into<String>,
    changing_user_id: Uuid,
) -> Result<ChangeRecord, AppError> {
    let detail = detail.into();
    let record = changes::insert(
        &mut **tx,
        group_id,
        user_id,
        change_type,
        Some(&detail),
        changing_user_id,
    )
    .await?;

    Ok(record)
}

/// Read side of the audit trail.
#[derive(Clone)]
pub struct ChangeAudit {
    db: Database,
}

impl ChangeAudit {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// A group's history within `[start, end)`, oldest first. Reviewing the
    /// trail is an administrative concern.
    pub async fn changes_for_group(
        &self,
        actor: &AuthSession,
        group_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        user_filter: Option<Uuid>,
    ) -> Result<Vec<ChangeRecord>, AppError> {
        let membership = memberships::find_active(self.db.pool(), group_id, actor.user_id).await?;
        if !membership.is_some_and(|m| m.grants(Capability::Admin)) {
            return Err(AppError::forbidden("No permission for related group"));
        }

        Ok(changes::list_for_group(self.db.pool(), group_id, start, end, user_filter).await?)
    }
}
